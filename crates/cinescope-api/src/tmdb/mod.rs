//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! and decodes list, detail, and search payloads.

mod api;
mod client;
mod error;
mod image;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use error::{BuildError, Endpoint, FetchCause, FetchError};
pub use image::{IMAGE_BASE_URL, ImageSize, PLACEHOLDER_IMAGE, image_url};
pub use reqwest::StatusCode;
pub use types::{
    CastMember, Credits, Genre, MovieDetail, MovieSummary, PagedResponse, TimeWindow, Video,
    VideoList,
};
