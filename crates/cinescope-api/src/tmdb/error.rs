//! Gateway error taxonomy.

use std::fmt;

use thiserror::Error;

use super::types::TimeWindow;

/// Endpoint a request was addressed to.
///
/// Displays as the request path relative to the API base, which keeps
/// the API key out of error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `trending/movie/{window}`.
    Trending(TimeWindow),
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/{movie_id}`.
    Detail(u64),
    /// `search/movie`.
    Search,
}

impl Endpoint {
    /// Returns the request path relative to the API base URL.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Trending(window) => format!("trending/movie/{window}"),
            Self::Popular => String::from("movie/popular"),
            Self::TopRated => String::from("movie/top_rated"),
            Self::Detail(id) => format!("movie/{id}"),
            Self::Search => String::from("search/movie"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Underlying reason a request did not produce a response body.
#[derive(Debug, Error)]
pub enum FetchCause {
    /// DNS, connect, timeout, or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status.
        status: reqwest::StatusCode,
        /// TMDB `status_message`, or the raw body when it is not a TMDB error object.
        message: String,
    },
    /// The request URL could not be built.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Error returned by every gateway operation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or HTTP-layer failure.
    #[error("TMDB request failed: {endpoint}")]
    FetchFailed {
        /// Endpoint that was requested.
        endpoint: Endpoint,
        /// Underlying cause.
        #[source]
        cause: FetchCause,
    },
    /// Response body did not match the expected shape.
    #[error("failed to decode TMDB response: {endpoint}")]
    DecodeFailed {
        /// Endpoint that was requested.
        endpoint: Endpoint,
        /// JSON decoding error.
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when a `TmdbClient` cannot be built.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required builder field was not set.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The default base URL failed to parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The underlying HTTP client failed to build.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Returns the endpoint the failing request was addressed to.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::FetchFailed { endpoint, .. } | Self::DecodeFailed { endpoint, .. } => *endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_endpoint_paths() {
        // Arrange & Act & Assert
        assert_eq!(
            Endpoint::Trending(TimeWindow::Day).path(),
            "trending/movie/day"
        );
        assert_eq!(Endpoint::Popular.path(), "movie/popular");
        assert_eq!(Endpoint::TopRated.path(), "movie/top_rated");
        assert_eq!(Endpoint::Detail(550).path(), "movie/550");
        assert_eq!(Endpoint::Search.to_string(), "search/movie");
    }

    #[test]
    fn test_fetch_failed_exposes_cause() {
        // Arrange
        let err = FetchError::FetchFailed {
            endpoint: Endpoint::Popular,
            cause: FetchCause::Status {
                status: reqwest::StatusCode::UNAUTHORIZED,
                message: String::from("Invalid API key"),
            },
        };

        // Act
        let source = err.source().unwrap().to_string();

        // Assert
        assert_eq!(err.to_string(), "TMDB request failed: movie/popular");
        assert!(source.contains("401"));
        assert!(source.contains("Invalid API key"));
        assert_eq!(err.endpoint(), Endpoint::Popular);
    }

    #[test]
    fn test_decode_failed_names_endpoint() {
        // Arrange
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();

        // Act
        let err = FetchError::DecodeFailed {
            endpoint: Endpoint::Detail(7),
            source: json_err,
        };

        // Assert
        assert!(err.to_string().contains("movie/7"));
    }
}
