//! Landing page aggregation.
//!
//! Three independent lists are fetched concurrently and committed together.
//! Any failure fails the whole aggregate; a partial result is never shown.

use std::future::{Future, poll_fn};
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::task::Poll;

use cinescope_api::tmdb::{FetchError, LocalMovieApi, MovieSummary, TimeWindow};
use futures::future::{MaybeDone, maybe_done};

use crate::state::{Commit, OnError, QueryState};
use crate::token::{RequestToken, TokenIssuer};

/// User-facing message when the landing lists fail to load.
pub const LANDING_ERROR_MESSAGE: &str = "Failed to load movies";

/// Tab selectable on the landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LandingTab {
    /// Trending movies.
    #[default]
    Trending,
    /// Popular movies.
    Popular,
    /// Top rated movies.
    TopRated,
}

/// The three landing lists, committed as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandingLists {
    /// Trending movies.
    pub trending: Vec<MovieSummary>,
    /// Popular movies.
    pub popular: Vec<MovieSummary>,
    /// Top rated movies.
    pub top_rated: Vec<MovieSummary>,
}

impl LandingLists {
    /// Returns the list shown under `tab`.
    #[must_use]
    pub fn get(&self, tab: LandingTab) -> &[MovieSummary] {
        match tab {
            LandingTab::Trending => &self.trending,
            LandingTab::Popular => &self.popular,
            LandingTab::TopRated => &self.top_rated,
        }
    }
}

/// Fetches the three landing lists concurrently.
///
/// Every call is polled at least once, so all three requests are issued
/// even when one fails immediately. The first error then resolves the
/// fan-in and the remaining calls are dropped.
///
/// # Errors
///
/// Returns the first gateway error.
pub async fn fetch_lists<G: LocalMovieApi>(
    gateway: &G,
    window: TimeWindow,
) -> Result<LandingLists, FetchError> {
    let mut trending = pin!(maybe_done(gateway.fetch_trending(window)));
    let mut popular = pin!(maybe_done(gateway.fetch_popular()));
    let mut top_rated = pin!(maybe_done(gateway.fetch_top_rated()));

    poll_fn(|cx| {
        let settled = [
            trending.as_mut().poll(cx).is_ready(),
            popular.as_mut().poll(cx).is_ready(),
            top_rated.as_mut().poll(cx).is_ready(),
        ];
        if let Some(e) = take_error(trending.as_mut())
            .or_else(|| take_error(popular.as_mut()))
            .or_else(|| take_error(top_rated.as_mut()))
        {
            return Poll::Ready(Err(e));
        }
        if settled.contains(&false) {
            return Poll::Pending;
        }
        Poll::Ready(Ok(LandingLists {
            trending: take_list(trending.as_mut()),
            popular: take_list(popular.as_mut()),
            top_rated: take_list(top_rated.as_mut()),
        }))
    })
    .await
}

fn take_error<F>(mut slot: Pin<&mut MaybeDone<F>>) -> Option<FetchError>
where
    F: Future<Output = Result<Vec<MovieSummary>, FetchError>>,
{
    if matches!(slot.as_mut().output_mut(), Some(Err(_))) {
        slot.take_output().and_then(Result::err)
    } else {
        None
    }
}

fn take_list<F>(slot: Pin<&mut MaybeDone<F>>) -> Vec<MovieSummary>
where
    F: Future<Output = Result<Vec<MovieSummary>, FetchError>>,
{
    slot.take_output().and_then(Result::ok).unwrap_or_default()
}

/// Controller for the landing screen.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct LandingController<G> {
    gateway: Arc<G>,
    window: TimeWindow,
    state: QueryState<LandingLists>,
    active_tab: LandingTab,
    tokens: TokenIssuer,
    closed: bool,
}

impl<G: LocalMovieApi> LandingController<G> {
    /// Creates an idle controller using the weekly trending window.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            window: TimeWindow::default(),
            state: QueryState::idle(),
            active_tab: LandingTab::default(),
            tokens: TokenIssuer::new(),
            closed: false,
        }
    }

    /// Sets the trending window used by subsequent loads.
    #[must_use]
    pub const fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Returns the observable state.
    #[must_use]
    pub const fn state(&self) -> &QueryState<LandingLists> {
        &self.state
    }

    /// Returns the active tab.
    #[must_use]
    pub const fn active_tab(&self) -> LandingTab {
        self.active_tab
    }

    /// Switches tabs over already-fetched lists. Issues no request.
    pub const fn select_tab(&mut self, tab: LandingTab) {
        self.active_tab = tab;
    }

    /// Returns the committed list for the active tab.
    #[must_use]
    pub fn active_movies(&self) -> &[MovieSummary] {
        self.state.items().get(self.active_tab)
    }

    /// Enters the loading phase and mints the token for a new load.
    ///
    /// Returns `None` once the controller has been torn down.
    pub fn begin_load(&mut self) -> Option<RequestToken> {
        if self.closed {
            return None;
        }
        let token = self.tokens.mint();
        self.state.begin_loading();
        tracing::debug!(%token, window = %self.window, "landing load started");
        Some(token)
    }

    /// Applies the aggregate result of the load issued with `token`.
    pub fn commit(
        &mut self,
        token: RequestToken,
        result: Result<LandingLists, FetchError>,
    ) -> Commit {
        if self.closed || !self.tokens.is_current(token) {
            tracing::debug!(%token, "discarding stale landing response");
            return Commit::Discarded;
        }
        match result {
            Ok(lists) => {
                tracing::debug!(
                    trending = lists.trending.len(),
                    popular = lists.popular.len(),
                    top_rated = lists.top_rated.len(),
                    "landing lists committed"
                );
                self.state.commit_ready(lists);
            }
            Err(e) => {
                tracing::warn!(error = %e, endpoint = %e.endpoint(), "landing load failed");
                self.state.commit_error(LANDING_ERROR_MESSAGE, OnError::KeepLastGood);
            }
        }
        Commit::Applied
    }

    /// Loads all three lists and commits them together.
    pub async fn load(&mut self) -> Commit {
        let Some(token) = self.begin_load() else {
            return Commit::Discarded;
        };
        let gateway = Arc::clone(&self.gateway);
        let result = fetch_lists(gateway.as_ref(), self.window).await;
        self.commit(token, result)
    }

    /// Invalidates the current request; later commits are ignored.
    pub const fn teardown(&mut self) {
        self.closed = true;
        self.tokens.invalidate();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]

    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::fake::{FakeApi, movie, server_error};
    use crate::state::Phase;
    use cinescope_api::tmdb::Endpoint;

    #[tokio::test]
    async fn test_load_commits_all_lists() {
        // Arrange
        let api = Arc::new(FakeApi::new());
        let mut controller = LandingController::new(Arc::clone(&api));

        // Act
        let outcome = controller.load().await;

        // Assert
        assert_eq!(outcome, Commit::Applied);
        assert_eq!(controller.state().phase(), Phase::Ready);
        assert!(controller.state().error_message().is_none());
        let lists = controller.state().items();
        assert_eq!(lists.trending[0].title, "trending");
        assert_eq!(lists.popular[0].title, "popular");
        assert_eq!(lists.top_rated[0].title, "top_rated");
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_aggregate() {
        // Arrange
        let api = Arc::new(FakeApi::new().failing("top_rated"));
        let mut controller = LandingController::new(api);

        // Act
        controller.load().await;

        // Assert
        assert_eq!(controller.state().phase(), Phase::Error);
        assert_eq!(
            controller.state().error_message(),
            Some(LANDING_ERROR_MESSAGE)
        );
        assert_eq!(controller.state().items(), &LandingLists::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_resolves_without_waiting_for_slow_calls() {
        // Arrange
        let api = Arc::new(
            FakeApi::new()
                .failing("popular")
                .delay("trending", Duration::from_secs(5))
                .delay("top_rated", Duration::from_secs(5)),
        );
        let mut controller = LandingController::new(Arc::clone(&api));
        let start = Instant::now();

        // Act
        controller.load().await;

        // Assert
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(controller.state().phase(), Phase::Error);
        assert_eq!(api.calls().len(), 3);
        assert!(controller.active_movies().is_empty());
    }

    #[tokio::test]
    async fn test_immediate_failure_still_issues_every_call() {
        // Arrange
        let api = Arc::new(FakeApi::new().failing("trending"));

        // Act
        let result = fetch_lists(api.as_ref(), TimeWindow::Week).await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.endpoint(), Endpoint::Trending(TimeWindow::Week));
        assert_eq!(api.calls(), vec!["trending", "popular", "top_rated"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lists_are_fetched_concurrently() {
        // Arrange
        let delay = Duration::from_millis(300);
        let api = Arc::new(
            FakeApi::new()
                .delay("trending", delay)
                .delay("popular", delay)
                .delay("top_rated", delay),
        );
        let mut controller = LandingController::new(api);
        let start = Instant::now();

        // Act
        controller.load().await;

        // Assert
        assert!(start.elapsed() < delay * 2);
        assert_eq!(controller.state().phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_last_good_lists() {
        // Arrange
        let mut controller = LandingController::new(Arc::new(FakeApi::new()));
        controller.load().await;
        let token = controller.begin_load().unwrap();

        // Act
        let outcome = controller.commit(token, Err(server_error(Endpoint::Popular)));

        // Assert
        assert_eq!(outcome, Commit::Applied);
        assert_eq!(controller.state().phase(), Phase::Error);
        assert_eq!(controller.active_movies()[0].title, "trending");
    }

    #[tokio::test]
    async fn test_select_tab_issues_no_request() {
        // Arrange
        let api = Arc::new(FakeApi::new());
        let mut controller = LandingController::new(Arc::clone(&api));
        controller.load().await;

        // Act
        controller.select_tab(LandingTab::TopRated);

        // Assert
        assert_eq!(controller.active_tab(), LandingTab::TopRated);
        assert_eq!(controller.active_movies()[0].title, "top_rated");
        assert_eq!(api.calls().len(), 3);
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        // Arrange
        let mut controller = LandingController::new(Arc::new(FakeApi::new()));
        let old = controller.begin_load().unwrap();
        let new = controller.begin_load().unwrap();
        let lists = LandingLists {
            trending: vec![movie(1, "old")],
            ..LandingLists::default()
        };

        // Act
        let outcome = controller.commit(old, Ok(lists));

        // Assert
        assert_eq!(outcome, Commit::Discarded);
        assert_eq!(controller.state().phase(), Phase::Loading);
        assert!(controller.active_movies().is_empty());
        assert_ne!(old, new);
    }

    #[test]
    fn test_teardown_suppresses_late_response() {
        // Arrange
        let mut controller = LandingController::new(Arc::new(FakeApi::new()));
        let token = controller.begin_load().unwrap();

        // Act
        controller.teardown();
        let outcome = controller.commit(token, Ok(LandingLists::default()));

        // Assert
        assert_eq!(outcome, Commit::Discarded);
        assert!(controller.begin_load().is_none());
    }

    #[tokio::test]
    async fn test_load_after_teardown_makes_no_request() {
        // Arrange
        let api = Arc::new(FakeApi::new());
        let mut controller = LandingController::new(Arc::clone(&api));
        controller.teardown();

        // Act
        let outcome = controller.load().await;

        // Assert
        assert_eq!(outcome, Commit::Discarded);
        assert!(api.calls().is_empty());
    }
}
