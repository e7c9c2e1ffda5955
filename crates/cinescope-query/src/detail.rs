//! Movie detail screen.

use std::sync::Arc;

use cinescope_api::tmdb::{FetchError, LocalMovieApi, MovieDetail};

use crate::state::{Commit, OnError, QueryState};
use crate::token::{RequestToken, TokenIssuer};

/// User-facing message when a detail load fails.
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load movie details";

/// Controller for a single movie's detail view.
///
/// Every load re-fetches; nothing is cached between navigations.
#[derive(Debug)]
pub struct DetailController<G> {
    gateway: Arc<G>,
    state: QueryState<Option<MovieDetail>>,
    tokens: TokenIssuer,
    closed: bool,
}

impl<G: LocalMovieApi> DetailController<G> {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: QueryState::idle(),
            tokens: TokenIssuer::new(),
            closed: false,
        }
    }

    /// Returns the observable state.
    #[must_use]
    pub const fn state(&self) -> &QueryState<Option<MovieDetail>> {
        &self.state
    }

    /// Returns the committed detail, if any.
    #[must_use]
    pub const fn detail(&self) -> Option<&MovieDetail> {
        self.state.items().as_ref()
    }

    /// Enters the loading phase for `movie_id`.
    ///
    /// Returns `None` once the controller has been torn down.
    pub fn begin_load(&mut self, movie_id: u64) -> Option<RequestToken> {
        if self.closed {
            return None;
        }
        let token = self.tokens.mint();
        self.state.begin_loading();
        tracing::debug!(%token, movie_id, "detail load started");
        Some(token)
    }

    /// Applies the result of the load issued with `token`.
    pub fn commit(
        &mut self,
        token: RequestToken,
        result: Result<MovieDetail, FetchError>,
    ) -> Commit {
        if self.closed || !self.tokens.is_current(token) {
            tracing::debug!(%token, "discarding stale detail response");
            return Commit::Discarded;
        }
        match result {
            Ok(detail) => self.state.commit_ready(Some(detail)),
            Err(e) => {
                tracing::warn!(error = %e, endpoint = %e.endpoint(), "detail load failed");
                self.state.commit_error(DETAIL_ERROR_MESSAGE, OnError::Clear);
            }
        }
        Commit::Applied
    }

    /// Fetches and commits the detail for `movie_id`.
    pub async fn load(&mut self, movie_id: u64) -> Commit {
        let Some(token) = self.begin_load(movie_id) else {
            return Commit::Discarded;
        };
        let gateway = Arc::clone(&self.gateway);
        let result = gateway.fetch_detail(movie_id).await;
        self.commit(token, result)
    }

    /// Invalidates the current request; later commits are ignored.
    pub const fn teardown(&mut self) {
        self.closed = true;
        self.tokens.invalidate();
    }
}
