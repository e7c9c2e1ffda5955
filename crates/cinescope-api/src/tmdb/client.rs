//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalMovieApi;
use super::error::{BuildError, Endpoint, FetchCause, FetchError};
use super::types::{MovieDetail, MovieSummary, PagedResponse, TimeWindow, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Extra data appended to the detail response.
const DETAIL_APPEND: &str = "credits,videos";

/// TMDB API client.
///
/// Each gateway call is a single GET; failures are returned as typed
/// [`FetchError`] values and never retried.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Static API key sent as the `api_key` query parameter.
    api_key: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    ///
    /// The URL must end with `/` so endpoint paths join beneath it.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient, BuildError> {
        let api_key = self.api_key.ok_or(BuildError::MissingField("api_key"))?;
        let user_agent = self
            .user_agent
            .ok_or(BuildError::MissingField("user_agent"))?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL)?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and query params, then decodes the JSON body.
    #[instrument(skip_all, fields(endpoint = %endpoint))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let fail = |cause: FetchCause| FetchError::FetchFailed { endpoint, cause };

        let url = self
            .base_url
            .join(&endpoint.path())
            .map_err(|e| fail(e.into()))?;

        let request = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .build()
            .map_err(|e| fail(e.into()))?;

        // The full URL carries the API key, so only the endpoint is logged.
        tracing::debug!("TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| fail(e.into()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| fail(e.into()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TmdbErrorResponse>(&body) {
                Ok(error_response) => {
                    tracing::debug!(
                        status_code = error_response.status_code,
                        "TMDB API error response"
                    );
                    error_response.status_message
                }
                Err(_) => body,
            };
            return Err(fail(FetchCause::Status { status, message }));
        }

        serde_json::from_str(&body).map_err(|source| FetchError::DecodeFailed { endpoint, source })
    }

    /// Fetches a paged list endpoint and extracts its `results`.
    async fn get_results(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<Vec<MovieSummary>, FetchError> {
        let page: PagedResponse<MovieSummary> = self.get_json(endpoint, query).await?;
        tracing::debug!(
            results = page.results.len(),
            total_results = page.total_results,
            "TMDB list decoded"
        );
        Ok(page.results)
    }
}

impl LocalMovieApi for TmdbClient {
    #[instrument(skip_all)]
    async fn fetch_trending(&self, window: TimeWindow) -> Result<Vec<MovieSummary>, FetchError> {
        self.get_results(Endpoint::Trending(window), &[]).await
    }

    #[instrument(skip_all)]
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, FetchError> {
        self.get_results(Endpoint::Popular, &[]).await
    }

    #[instrument(skip_all)]
    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>, FetchError> {
        self.get_results(Endpoint::TopRated, &[]).await
    }

    #[instrument(skip_all)]
    async fn fetch_detail(&self, movie_id: u64) -> Result<MovieDetail, FetchError> {
        let query = [("append_to_response", String::from(DETAIL_APPEND))];
        self.get_json(Endpoint::Detail(movie_id), &query).await
    }

    #[instrument(skip_all)]
    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.get_results(Endpoint::Search, &[("query", String::from(query))])
            .await
    }
}
