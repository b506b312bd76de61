//! Shared-secret bearer authentication.
//!
//! Every request must present `Authorization: Bearer <token>` where the
//! token equals the configured API token. There are no per-user identities.

mod middleware;

pub use middleware::auth_middleware;

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    api_token: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// Check a presented token against the secret.
    ///
    /// Runs in time independent of where the first differing byte is. An
    /// empty secret authorizes nothing.
    pub fn authorizes(&self, token: &str) -> bool {
        let expected = self.api_token.as_bytes();
        let given = token.as_bytes();

        if expected.is_empty() || expected.len() != given.len() {
            return false;
        }

        expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
