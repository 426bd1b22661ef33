//! Internal token authorization
//!
//! Non-public endpoints are gated by a shared-secret token. Enforcement is
//! configured per process at startup and carried in service state as a
//! [`TokenPolicy`] value.
//!
//! # Rules
//!
//! - Enforcement disabled: every request passes
//! - Enforcement enabled: the expected token must be configured (non-empty)
//!   and the provided token must match it exactly
//!
//! No HTTP framework dependencies; the services extract the provided token
//! from the query string, header or body themselves.

/// Query parameter carrying the internal token
pub const INTERNAL_TOKEN_PARAM: &str = "internal_token";

/// Header carrying the internal token
pub const INTERNAL_TOKEN_HEADER: &str = "x-internal-token";

/// Internal token check, fixed at construction time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPolicy {
    enforce: bool,
    expected: Option<String>,
}

impl TokenPolicy {
    /// Policy that lets every request through
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Policy that requires `expected` on every gated request
    pub fn enforced(expected: impl Into<String>) -> Self {
        Self {
            enforce: true,
            expected: Some(expected.into()),
        }
    }

    /// Build from resolved configuration values
    ///
    /// An enforced policy without a configured token rejects everything.
    pub fn new(enforce: bool, expected: Option<String>) -> Self {
        Self {
            enforce,
            expected: expected.filter(|t| !t.is_empty()),
        }
    }

    /// Whether tokens are checked at all
    pub fn is_enforced(&self) -> bool {
        self.enforce
    }

    /// Check a provided token against the policy
    ///
    /// # Examples
    ///
    /// ```
    /// use reading_common::api::auth::TokenPolicy;
    ///
    /// assert!(TokenPolicy::disabled().check(None));
    ///
    /// let policy = TokenPolicy::enforced("s3cret");
    /// assert!(policy.check(Some("s3cret")));
    /// assert!(!policy.check(Some("wrong")));
    /// assert!(!policy.check(None));
    /// ```
    pub fn check(&self, provided: Option<&str>) -> bool {
        if !self.enforce {
            return true;
        }

        match (self.expected.as_deref(), provided) {
            (Some(expected), Some(provided)) => expected == provided,
            _ => false,
        }
    }
}
