//! Debounced free-text search.
//!
//! [`SearchController`] is a synchronous state machine. It never performs
//! I/O: it hands out [`SearchRequest`]s and accepts the matching
//! [`SearchResponse`]s, which keeps it deterministic under logical time.
//! [`crate::session::SearchSession`] wires it to a gateway and a clock.

use std::time::Duration;

use cinescope_api::tmdb::{FetchError, LocalMovieApi, MovieSummary};
use tokio::time::Instant;

use crate::debounce::{DEFAULT_SEARCH_DEBOUNCE, Debouncer};
use crate::state::{Commit, OnError, QueryState};
use crate::token::{RequestToken, TokenIssuer};

/// User-facing message when a search fails.
pub const SEARCH_ERROR_MESSAGE: &str = "Failed to search movies";

/// A search the caller must execute against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Identity used to reconcile the response.
    pub token: RequestToken,
    /// Query as typed.
    pub query: String,
}

/// Result of an executed [`SearchRequest`].
#[derive(Debug)]
pub struct SearchResponse {
    /// Token of the request that produced this result.
    pub token: RequestToken,
    /// Gateway outcome.
    pub result: Result<Vec<MovieSummary>, FetchError>,
}

/// Executes `request` against `gateway`.
pub async fn execute<G: LocalMovieApi>(gateway: &G, request: SearchRequest) -> SearchResponse {
    let result = gateway.search_by_title(&request.query).await;
    SearchResponse {
        token: request.token,
        result,
    }
}

/// Everything a search view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Current query text.
    pub query: String,
    /// Results, phase and error message.
    pub state: QueryState<Vec<MovieSummary>>,
    /// Whether a search was dispatched since the query was last cleared.
    pub has_searched: bool,
}

/// Debounced search state machine.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchController {
    query: String,
    state: QueryState<Vec<MovieSummary>>,
    debouncer: Debouncer,
    tokens: TokenIssuer,
    has_searched: bool,
    closed: bool,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchController {
    /// Creates an idle controller with the given debounce delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            query: String::new(),
            state: QueryState::idle(),
            debouncer: Debouncer::new(delay),
            tokens: TokenIssuer::new(),
            has_searched: false,
            closed: false,
        }
    }

    /// Returns the current query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the observable state.
    #[must_use]
    pub const fn state(&self) -> &QueryState<Vec<MovieSummary>> {
        &self.state
    }

    /// Whether a search was dispatched since the query was last cleared.
    #[must_use]
    pub const fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Whether [`Self::teardown`] has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the armed debounce deadline.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Captures the renderable state.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            state: self.state.clone(),
            has_searched: self.has_searched,
        }
    }

    /// Records a new query value observed at `now`.
    ///
    /// A blank query resets to idle immediately. Any other change restarts
    /// the debounce window and supersedes the in-flight request.
    pub fn set_query(&mut self, query: &str, now: Instant) {
        if self.closed {
            return;
        }
        if query.trim().is_empty() {
            self.query = String::from(query);
            self.debouncer.cancel();
            self.tokens.invalidate();
            self.state.reset();
            self.has_searched = false;
            return;
        }
        if query == self.query {
            return;
        }
        self.query = String::from(query);
        self.debouncer.arm(now);
        self.tokens.invalidate();
        self.state.mark_pending();
    }

    /// Dispatches the debounced search once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        if self.closed || !self.debouncer.fire_if_due(now) {
            return None;
        }
        Some(self.dispatch())
    }

    /// Searches immediately, skipping the debounce window.
    ///
    /// A blank query goes idle and issues nothing.
    pub fn submit(&mut self) -> Option<SearchRequest> {
        if self.closed {
            return None;
        }
        self.debouncer.cancel();
        if self.query.trim().is_empty() {
            self.tokens.invalidate();
            self.state.reset();
            self.has_searched = false;
            return None;
        }
        Some(self.dispatch())
    }

    fn dispatch(&mut self) -> SearchRequest {
        let token = self.tokens.mint();
        self.state.begin_loading();
        self.has_searched = true;
        tracing::debug!(%token, query = %self.query, "search dispatched");
        SearchRequest {
            token,
            query: self.query.clone(),
        }
    }

    /// Applies the result of the request issued with `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<Vec<MovieSummary>, FetchError>,
    ) -> Commit {
        if self.closed || !self.tokens.is_current(token) {
            tracing::debug!(%token, "discarding stale search response");
            return Commit::Discarded;
        }
        match result {
            Ok(movies) => {
                tracing::debug!(%token, count = movies.len(), "search results committed");
                self.state.commit_ready(movies);
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %self.query, "search failed");
                self.state.commit_error(SEARCH_ERROR_MESSAGE, OnError::Clear);
            }
        }
        Commit::Applied
    }

    /// Applies an executed [`SearchResponse`].
    pub fn apply(&mut self, response: SearchResponse) -> Commit {
        self.complete(response.token, response.result)
    }

    /// Clears the query and results.
    pub fn clear(&mut self) {
        self.set_query("", Instant::now());
    }

    /// Cancels the debounce timer and ignores everything afterwards.
    pub const fn teardown(&mut self) {
        self.closed = true;
        self.debouncer.cancel();
        self.tokens.invalidate();
    }
}
