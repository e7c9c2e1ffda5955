//! TMDB image URL construction.

use std::fmt;

/// Base URL of the TMDB image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Local placeholder reference used when an image path is absent.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.png";

/// Image size token accepted by the CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// 92px wide.
    W92,
    /// 154px wide.
    W154,
    /// 185px wide (cast profiles).
    W185,
    /// 342px wide.
    W342,
    /// 500px wide (posters).
    #[default]
    W500,
    /// 780px wide.
    W780,
    /// Original upload (backdrops).
    Original,
}

impl ImageSize {
    /// Returns the size token as it appears in the URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds an image URL for `path` at `size`.
///
/// Returns [`PLACEHOLDER_IMAGE`] when `path` is absent or empty.
///
/// # Examples
///
/// ```
/// use cinescope_api::tmdb::{ImageSize, image_url};
///
/// assert_eq!(
///     image_url(Some("/abc.jpg"), ImageSize::W500),
///     "https://image.tmdb.org/t/p/w500/abc.jpg"
/// );
/// assert_eq!(image_url(None, ImageSize::W500), "/placeholder-movie.png");
/// ```
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{IMAGE_BASE_URL}/{size}{p}"),
        None => String::from(PLACEHOLDER_IMAGE),
    }
}
