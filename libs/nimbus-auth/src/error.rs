use thiserror::Error;

/// Errors raised while resolving an `Authorization` header.
///
/// Messages name the offending variable or field but never carry the secret
/// value itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("static token is empty")]
    EmptyToken,

    #[error("access key must be 20 uppercase alphanumeric characters")]
    InvalidAccessKey,

    #[error("secret key must be a 44-character URL-safe Base64 string without padding")]
    InvalidSecretKey,

    #[error("session token is invalid: {reason}")]
    InvalidSessionToken { reason: String },

    #[error("profile \"{0}\" is invalid: expected 1-16 characters matching [A-Z0-9_]")]
    InvalidProfile(String),

    #[error("missing environment variable, expected one of: {}", .candidates.join(", "))]
    MissingVariable { candidates: Vec<String> },

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidVariable { name: String, reason: String },

    #[error("at least one auth provider must be configured")]
    NoProviders,

    #[error("no authentication provider was able to supply credentials")]
    Exhausted,

    /// Failure from a provider outside this crate that is not a credential
    /// problem (I/O, IPC with a credential helper, ...).
    #[error("auth provider failed: {0}")]
    Provider(String),
}

impl AuthError {
    /// Whether this error describes missing, malformed or rejected credentials.
    ///
    /// [`AuthProviderChain`](crate::AuthProviderChain) surfaces the last error
    /// for which this is `true` once every provider has failed.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        !matches!(self, Self::Provider(_))
    }
}
