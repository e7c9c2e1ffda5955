//! In-memory gateway used by controller tests.
#![allow(clippy::unwrap_used)]
#![allow(clippy::future_not_send)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use cinescope_api::tmdb::{
    Endpoint, FetchCause, FetchError, LocalMovieApi, MovieDetail, MovieSummary, StatusCode,
    TimeWindow,
};

/// Builds a minimal movie summary.
pub fn movie(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: String::from(title),
        poster_path: None,
        release_date: None,
        vote_average: None,
        overview: None,
    }
}

/// Builds a minimal movie detail.
pub fn detail(id: u64, title: &str) -> MovieDetail {
    MovieDetail {
        summary: movie(id, title),
        backdrop_path: None,
        runtime_minutes: Some(120),
        genres: Vec::new(),
        budget: 0,
        revenue: 0,
        status: Some(String::from("Released")),
        tagline: None,
        vote_count: 0,
        credits: cinescope_api::tmdb::Credits::default(),
        videos: cinescope_api::tmdb::VideoList::default(),
    }
}

/// Builds the error a failing fake endpoint returns.
pub fn server_error(endpoint: Endpoint) -> FetchError {
    FetchError::FetchFailed {
        endpoint,
        cause: FetchCause::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("fake failure"),
        },
    }
}

/// Scriptable gateway that records every call.
#[derive(Debug, Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    failing: HashSet<&'static str>,
    delays: HashMap<String, Duration>,
    failing_queries: HashSet<String>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the named list endpoint ("trending", "popular", "top_rated", "detail") fail.
    pub fn failing(mut self, name: &'static str) -> Self {
        self.failing.insert(name);
        self
    }

    /// Delays the call recorded under `key` (e.g. "popular", "search:bat").
    pub fn delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(String::from(key), delay);
        self
    }

    /// Makes searches for `query` fail.
    pub fn failing_query(mut self, query: &str) -> Self {
        self.failing_queries.insert(String::from(query));
        self
    }

    /// Returns the recorded calls in issue order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns only the recorded search calls.
    pub fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("search:"))
            .collect()
    }

    async fn record(&self, key: String) {
        let delay = self.delays.get(&key).copied();
        self.calls.lock().unwrap().push(key);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn list(
        &self,
        name: &'static str,
        endpoint: Endpoint,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        if self.failing.contains(name) {
            return Err(server_error(endpoint));
        }
        Ok(vec![movie(1, name), movie(2, name)])
    }
}

impl LocalMovieApi for FakeApi {
    async fn fetch_trending(&self, window: TimeWindow) -> Result<Vec<MovieSummary>, FetchError> {
        self.record(String::from("trending")).await;
        self.list("trending", Endpoint::Trending(window))
    }

    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, FetchError> {
        self.record(String::from("popular")).await;
        self.list("popular", Endpoint::Popular)
    }

    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>, FetchError> {
        self.record(String::from("top_rated")).await;
        self.list("top_rated", Endpoint::TopRated)
    }

    async fn fetch_detail(&self, movie_id: u64) -> Result<MovieDetail, FetchError> {
        self.record(format!("detail:{movie_id}")).await;
        if self.failing.contains("detail") {
            return Err(server_error(Endpoint::Detail(movie_id)));
        }
        Ok(detail(movie_id, "Detail"))
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.record(format!("search:{query}")).await;
        if self.failing_queries.contains(query) {
            return Err(server_error(Endpoint::Search));
        }
        Ok(vec![movie(10, query)])
    }
}
