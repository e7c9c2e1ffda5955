//! TMDB API response types and movie data model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Lowest valid vote average.
const VOTE_MIN: f64 = 0.0;

/// Highest valid vote average.
const VOTE_MAX: f64 = 10.0;

// --- Trending window ---

/// Time window for the `trending/movie/{window}` endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    /// Trending over the last day.
    Day,
    /// Trending over the last week.
    #[default]
    Week,
}

impl TimeWindow {
    /// Returns the path segment used by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Paged list envelope ---

/// Envelope shared by the list and search endpoints.
///
/// Only `results` is surfaced to callers; the paging counters are kept
/// for completeness and default to zero when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Result list.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- Movie summary ---

/// A movie as it appears in list and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date (empty strings decode as `None`).
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    /// Vote average in `[0, 10]`.
    #[serde(default, deserialize_with = "deserialize_vote_average")]
    pub vote_average: Option<f64>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieSummary {
    /// Returns the release year, if the release date is known.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| chrono::Datelike::year(&d))
    }
}

// --- Movie details ---

/// Response from `movie/{movie_id}?append_to_response=credits,videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Summary fields shared with list results.
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Runtime in minutes.
    #[serde(default, rename = "runtime")]
    pub runtime_minutes: Option<u32>,
    /// Genres in display order.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Budget in USD (0 when unknown).
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD (0 when unknown).
    #[serde(default)]
    pub revenue: u64,
    /// Release status (e.g., "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Appended credits.
    #[serde(default)]
    pub credits: Credits,
    /// Appended videos.
    #[serde(default)]
    pub videos: VideoList,
}

impl MovieDetail {
    /// Returns the billed cast in order.
    #[must_use]
    pub fn cast(&self) -> &[CastMember] {
        &self.credits.cast
    }

    /// Returns the first YouTube trailer, if any.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .results
            .iter()
            .find(|v| v.kind == "Trailer" && v.site == "YouTube")
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Credits block appended to movie details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    /// Cast members in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// A single cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Videos block appended to movie details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoList {
    /// Videos.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A single video entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Site-specific key (e.g., YouTube video ID).
    pub key: String,
    /// Video title.
    pub name: String,
    /// Hosting site.
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub kind: String,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Field decoders ---

/// Decodes `"YYYY-MM-DD"`, mapping `null`, `""` and unparsable values to `None`.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

/// Decodes a vote average, dropping values outside `[0, 10]`.
fn deserialize_vote_average<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|v| v.is_finite() && (VOTE_MIN..=VOTE_MAX).contains(v)))
}
