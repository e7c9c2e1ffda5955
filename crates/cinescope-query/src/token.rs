//! Request identity tokens.

use std::fmt;

/// Opaque identity of one issued request.
///
/// Tokens from a single [`TokenIssuer`] are strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mints tokens and remembers which one is current.
#[derive(Debug, Default)]
pub struct TokenIssuer {
    /// Last minted value.
    minted: u64,
    /// Token whose response may still commit.
    current: Option<RequestToken>,
}

impl TokenIssuer {
    /// Creates an issuer with no current token.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            minted: 0,
            current: None,
        }
    }

    /// Mints a new token and makes it current, superseding any earlier one.
    pub const fn mint(&mut self) -> RequestToken {
        self.minted = self.minted.saturating_add(1);
        let token = RequestToken(self.minted);
        self.current = Some(token);
        token
    }

    /// Makes no token current; every outstanding response becomes stale.
    pub const fn invalidate(&mut self) {
        self.current = None;
    }

    /// Whether `token` is the current one.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Returns the current token, if any.
    #[must_use]
    pub const fn current(&self) -> Option<RequestToken> {
        self.current
    }
}
