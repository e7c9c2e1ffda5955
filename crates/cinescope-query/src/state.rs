//! Observable screen state shared by all controllers.

/// Lifecycle phase of a screen's data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing requested (search: query is blank).
    #[default]
    Idle,
    /// A debounced request is scheduled but not yet issued (search only).
    Pending,
    /// A request is in flight.
    Loading,
    /// The latest request committed successfully.
    Ready,
    /// The latest request failed.
    Error,
}

/// Outcome of handing a response to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The response matched the current token and mutated state.
    Applied,
    /// The response was stale (or the controller was torn down) and was ignored.
    Discarded,
}

/// What happens to the committed items when a request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnError {
    /// Reset items to their empty value.
    Clear,
    /// Leave the last committed items in place.
    KeepLastGood,
}

/// Items, phase, and error message for one screen.
///
/// Fields are private; controllers move between phases through the
/// crate-internal transition methods so that the following always hold:
///
/// - `Loading`/`Pending` never carry an error message and never expose a
///   partial result.
/// - `Ready` never carries an error message.
/// - `Error` always carries one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState<T> {
    items: T,
    phase: Phase,
    error_message: Option<String>,
}

impl<T: Default> QueryState<T> {
    /// Creates an idle state with empty items.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Returns the committed items.
    #[must_use]
    pub const fn items(&self) -> &T {
        &self.items
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the user-facing error message, set only in [`Phase::Error`].
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub(crate) fn mark_pending(&mut self) {
        self.phase = Phase::Pending;
        self.error_message = None;
    }

    pub(crate) fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
        self.error_message = None;
    }

    pub(crate) fn commit_ready(&mut self, items: T) {
        self.items = items;
        self.phase = Phase::Ready;
        self.error_message = None;
    }

    pub(crate) fn commit_error(&mut self, message: &str, on_error: OnError) {
        if on_error == OnError::Clear {
            self.items = T::default();
        }
        self.phase = Phase::Error;
        self.error_message = Some(String::from(message));
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
