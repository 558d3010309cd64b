//! Access key / secret key credentials supplied directly by the caller.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::credentials::{
    check_session_token, is_valid_access_key, is_valid_secret_key, key_pair_header,
};
use crate::error::AuthError;
use crate::provider::AuthProvider;

/// Serialized form of a static key pair, as it appears in application config.
///
/// ```json
/// { "accessKey": "AKIA...", "secretKey": "...", "sessionToken": "eyJ..." }
/// ```
///
/// `Debug` redacts the secret key and session token.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StaticKeyConfig {
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl fmt::Debug for StaticKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticKeyConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

/// A validated key pair with an optional session token.
#[derive(Clone)]
pub struct StaticKeyCredentials {
    access_key: String,
    secret_key: SecretString,
    session_token: Option<SecretString>,
}

impl StaticKeyCredentials {
    /// Validate and wrap a key pair.
    ///
    /// An empty session token is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidAccessKey`], [`AuthError::InvalidSecretKey`]
    /// or [`AuthError::InvalidSessionToken`] when a value has the wrong format.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Result<Self, AuthError> {
        let access_key = access_key.into();
        if !is_valid_access_key(&access_key) {
            return Err(AuthError::InvalidAccessKey);
        }

        let secret_key = SecretString::from(secret_key.into());
        if !is_valid_secret_key(secret_key.expose_secret()) {
            return Err(AuthError::InvalidSecretKey);
        }

        let session_token = match session_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                check_session_token(&token)
                    .map_err(|reason| AuthError::InvalidSessionToken { reason })?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        Ok(Self {
            access_key,
            secret_key,
            session_token,
        })
    }

    /// # Errors
    ///
    /// Same as [`StaticKeyCredentials::new`].
    pub fn from_config(config: StaticKeyConfig) -> Result<Self, AuthError> {
        Self::new(config.access_key, config.secret_key, config.session_token)
    }

    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    #[must_use]
    pub fn has_session_token(&self) -> bool {
        self.session_token.is_some()
    }

    /// `Bearer <session>` when a session token is set, else `Basic ...`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        key_pair_header(
            &self.access_key,
            &self.secret_key,
            self.session_token.as_ref(),
        )
    }
}

impl fmt::Debug for StaticKeyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticKeyCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("has_session_token", &self.has_session_token())
            .finish_non_exhaustive()
    }
}

/// Provider over a fixed, pre-validated key pair.
#[derive(Debug, Clone)]
pub struct StaticKeyCredentialProvider {
    credentials: StaticKeyCredentials,
}

impl StaticKeyCredentialProvider {
    #[must_use]
    pub fn new(credentials: StaticKeyCredentials) -> Self {
        Self { credentials }
    }

    /// # Errors
    ///
    /// Same as [`StaticKeyCredentials::new`].
    pub fn from_config(config: StaticKeyConfig) -> Result<Self, AuthError> {
        StaticKeyCredentials::from_config(config).map(Self::new)
    }
}

impl AuthProvider for StaticKeyCredentialProvider {
    fn authorization_header(&self) -> Result<String, AuthError> {
        Ok(self.credentials.authorization_header())
    }
}
