use std::sync::Arc;

use crate::error::AuthError;

/// Supplies the value of the `Authorization` header for outgoing calls.
///
/// Implementations are consulted on every invocation so that rotated
/// credentials are picked up without rebuilding the client.
pub trait AuthProvider: Send + Sync {
    /// Resolve the full header value, scheme included (`Bearer ...`, `Basic ...`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when no usable credentials are available.
    fn authorization_header(&self) -> Result<String, AuthError>;
}

impl<T: AuthProvider + ?Sized> AuthProvider for Box<T> {
    fn authorization_header(&self) -> Result<String, AuthError> {
        (**self).authorization_header()
    }
}

impl<T: AuthProvider + ?Sized> AuthProvider for Arc<T> {
    fn authorization_header(&self) -> Result<String, AuthError> {
        (**self).authorization_header()
    }
}
