use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::AuthError;
use crate::provider::AuthProvider;

/// Sends a fixed bearer token on every call.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

impl AuthProvider for StaticTokenProvider {
    fn authorization_header(&self) -> Result<String, AuthError> {
        let token = self.token.expose_secret();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(format!("Bearer {token}"))
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn returns_bearer_header() {
        let provider = StaticTokenProvider::new("abc123");
        assert_eq!(provider.authorization_header().unwrap(), "Bearer abc123");
    }

    #[test]
    fn empty_token_is_rejected_at_call_time() {
        let provider = StaticTokenProvider::new("");
        assert_eq!(
            provider.authorization_header().unwrap_err(),
            AuthError::EmptyToken
        );
    }

    #[test]
    fn debug_is_redacted() {
        let provider = StaticTokenProvider::new("top-secret-token");
        let debug = format!("{provider:?}");
        assert!(!debug.contains("top-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
