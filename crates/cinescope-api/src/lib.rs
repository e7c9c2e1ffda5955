//! Request gateway for cinescope.
//!
//! Provides a typed client for the TMDB v3 movie endpoints, the movie
//! data model, and image URL construction.

/// TMDB API client.
pub mod tmdb;
