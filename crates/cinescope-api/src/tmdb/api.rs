//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchError;
use super::types::{MovieDetail, MovieSummary, TimeWindow};

/// Movie request gateway.
///
/// Abstracts API operations for fake substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
/// Every operation makes at most one HTTP request and never retries.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches trending movies for the given window.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` on transport or HTTP failure, `DecodeFailed`
    /// if the body cannot be parsed.
    async fn fetch_trending(&self, window: TimeWindow) -> Result<Vec<MovieSummary>, FetchError>;

    /// Fetches popular movies.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` on transport or HTTP failure, `DecodeFailed`
    /// if the body cannot be parsed.
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, FetchError>;

    /// Fetches top rated movies.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` on transport or HTTP failure, `DecodeFailed`
    /// if the body cannot be parsed.
    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>, FetchError>;

    /// Fetches movie details with credits and videos appended.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` on transport or HTTP failure, `DecodeFailed`
    /// if the body cannot be parsed.
    async fn fetch_detail(&self, movie_id: u64) -> Result<MovieDetail, FetchError>;

    /// Searches movies by title.
    ///
    /// A blank query yields an empty list without a request.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` on transport or HTTP failure, `DecodeFailed`
    /// if the body cannot be parsed.
    async fn search_by_title(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError>;
}
