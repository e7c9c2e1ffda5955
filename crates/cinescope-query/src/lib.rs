//! Query controllers for cinescope.
//!
//! Each controller owns the observable state of one screen, decides when
//! to call the injected gateway, and reconciles responses against the
//! request token that issued them so that only the latest request may
//! commit.

/// Debounce timer driven by explicit instants.
pub mod debounce;
/// Movie detail controller.
pub mod detail;
/// Landing page aggregation controller.
pub mod landing;
/// Debounced search controller.
pub mod search;
/// Async driver for the search controller.
pub mod session;
/// Observable screen state.
pub mod state;
/// Request identity tokens.
pub mod token;

#[cfg(test)]
mod fake;

pub use debounce::{DEFAULT_SEARCH_DEBOUNCE, Debouncer};
pub use detail::DetailController;
pub use landing::{LandingController, LandingLists, LandingTab};
pub use search::{SearchController, SearchRequest, SearchResponse, SearchSnapshot};
pub use session::{SearchInput, SearchSession};
pub use state::{Commit, Phase, QueryState};
pub use token::{RequestToken, TokenIssuer};
