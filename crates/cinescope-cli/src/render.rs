//! Text rendering of controller state through `tracing`.

use cinescope_api::tmdb::{ImageSize, MovieDetail, MovieSummary, image_url};
use cinescope_query::{Phase, SearchSnapshot};

/// Number of cast members shown on the detail view.
const CAST_LIMIT: usize = 6;

/// Watch URL prefix for YouTube trailers.
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Formats a runtime as `"2h 19m"`.
#[allow(clippy::arithmetic_side_effects)]
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Formats a whole-dollar amount as `"$63,000,000"`.
#[allow(clippy::arithmetic_side_effects)]
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a vote average as `"8.4/10"`, or `"N/A"` when unrated.
pub fn format_rating(vote_average: Option<f64>) -> String {
    vote_average
        .filter(|v| *v > 0.0)
        .map_or_else(|| String::from("N/A"), |v| format!("{v:.1}/10"))
}

fn year_or_dash(movie: &MovieSummary) -> String {
    movie
        .release_year()
        .map_or_else(|| String::from("-"), |y| y.to_string())
}

/// Logs a movie list as a table.
pub fn log_movies(movies: &[MovieSummary]) {
    tracing::info!("ID\tYear\tRating\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.id,
            year_or_dash(movie),
            format_rating(movie.vote_average),
            movie.title,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Logs a movie detail.
pub fn log_detail(detail: &MovieDetail) {
    let movie = &detail.summary;
    tracing::info!("{} ({})", movie.title, year_or_dash(movie));
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("\"{tagline}\"");
    }
    tracing::info!(
        "Rating:\t\t{} ({} votes)",
        format_rating(movie.vote_average),
        detail.vote_count
    );
    if let Some(date) = movie.release_date {
        tracing::info!("Released:\t{date}");
    }
    if let Some(minutes) = detail.runtime_minutes.filter(|m| *m > 0) {
        tracing::info!("Runtime:\t{}", format_runtime(minutes));
    }
    if let Some(status) = detail.status.as_deref() {
        tracing::info!("Status:\t\t{status}");
    }
    if !detail.genres.is_empty() {
        let names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        tracing::info!("Genres:\t\t{}", names.join(", "));
    }
    if detail.budget > 0 {
        tracing::info!("Budget:\t\t{}", format_usd(detail.budget));
    }
    if detail.revenue > 0 {
        tracing::info!("Revenue:\t{}", format_usd(detail.revenue));
    }
    tracing::info!(
        "Poster:\t\t{}",
        image_url(movie.poster_path.as_deref(), ImageSize::W500)
    );
    if detail.backdrop_path.is_some() {
        tracing::info!(
            "Backdrop:\t{}",
            image_url(detail.backdrop_path.as_deref(), ImageSize::Original)
        );
    }
    if let Some(trailer) = detail.trailer() {
        tracing::info!("Trailer:\t{YOUTUBE_WATCH_URL}{}", trailer.key);
    }
    tracing::info!(
        "Overview:\t{}",
        movie
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or("No overview available.")
    );

    let cast = detail.cast();
    if !cast.is_empty() {
        tracing::info!("Cast:");
        for member in cast.iter().take(CAST_LIMIT) {
            tracing::info!(
                "  {}\t{}\t{}",
                member.name,
                if member.character.is_empty() {
                    "-"
                } else {
                    member.character.as_str()
                },
                image_url(member.profile_path.as_deref(), ImageSize::W185),
            );
        }
    }
}

/// Logs a search snapshot; idle and pending states print nothing.
pub fn log_search(snapshot: &SearchSnapshot) {
    let query = snapshot.query.trim();
    match snapshot.state.phase() {
        Phase::Idle | Phase::Pending => {}
        Phase::Loading => tracing::info!("Searching \"{query}\"..."),
        Phase::Ready if snapshot.state.items().is_empty() => {
            tracing::info!("No movies found for \"{query}\"");
        }
        Phase::Ready => log_movies(snapshot.state.items()),
        Phase::Error => {
            tracing::info!("{}", snapshot.state.error_message().unwrap_or_default());
        }
    }
}
