//! Credentials read from `NIMBUS_*` environment variables.
//!
//! Resolution runs on every call, so rotated variables are picked up without
//! rebuilding the provider. With `NIMBUS_PROFILE=DEV`, each value is looked up
//! as `NIMBUS_PROFILE_DEV_<SUFFIX>` first and `NIMBUS_<SUFFIX>` second.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use crate::credentials::{
    ACCESS_KEY_RULE, REGION_RULE, SECRET_KEY_RULE, check_session_token, is_valid_access_key,
    is_valid_region, is_valid_secret_key, key_pair_header,
};
use crate::error::AuthError;
use crate::provider::AuthProvider;
use crate::scope::{CredentialScope, PROFILE_VAR};

const ACCESS_KEY_SUFFIX: &str = "ACCESS_KEY";
const SECRET_KEY_SUFFIX: &str = "SECRET_KEY";
const REGION_SUFFIX: &str = "REGION";
const SESSION_TOKEN_SUFFIX: &str = "SESSION_TOKEN";

/// Read-only view of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Credentials resolved for one call.
pub struct ResolvedCredentials {
    pub scope: CredentialScope,
    pub access_key: String,
    pub secret_key: SecretString,
    pub region: String,
    pub session_token: Option<SecretString>,
}

impl ResolvedCredentials {
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

impl fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("scope", &self.scope)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("has_session_token", &self.session_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Resolves a key pair from the environment on every call.
#[derive(Clone)]
pub struct EnvironmentCredentialProvider {
    source: Arc<dyn EnvSource>,
}

impl EnvironmentCredentialProvider {
    /// Provider over the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(ProcessEnv)
    }

    #[must_use]
    pub fn with_source(source: impl EnvSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Provider over a fixed set of variables.
    #[must_use]
    pub fn from_map<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::with_source(map)
    }

    /// Read and validate the current credentials.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidProfile`] if `NIMBUS_PROFILE` is malformed
    /// - [`AuthError::MissingVariable`] if a required value is absent from
    ///   every candidate variable
    /// - [`AuthError::InvalidVariable`] if the first candidate present is
    ///   malformed
    pub fn resolve(&self) -> Result<ResolvedCredentials, AuthError> {
        let profile = self.source.var(PROFILE_VAR);
        let scope = CredentialScope::from_profile(profile.as_deref())?;

        let access_key = self.read_required(&scope, ACCESS_KEY_SUFFIX, |v| {
            is_valid_access_key(v)
                .then_some(())
                .ok_or_else(|| ACCESS_KEY_RULE.to_owned())
        })?;
        let secret_key = SecretString::from(self.read_required(&scope, SECRET_KEY_SUFFIX, |v| {
            is_valid_secret_key(v)
                .then_some(())
                .ok_or_else(|| SECRET_KEY_RULE.to_owned())
        })?);
        let region = self.read_required(&scope, REGION_SUFFIX, |v| {
            is_valid_region(v)
                .then_some(())
                .ok_or_else(|| REGION_RULE.to_owned())
        })?;
        let session_token = self
            .read_optional(&scope, SESSION_TOKEN_SUFFIX, check_session_token)?
            .map(SecretString::from);

        tracing::debug!(
            scope = %scope,
            region = %region,
            session = session_token.is_some(),
            "resolved credentials from environment"
        );

        Ok(ResolvedCredentials {
            scope,
            access_key,
            secret_key,
            region,
            session_token,
        })
    }

    fn read_required(
        &self,
        scope: &CredentialScope,
        suffix: &str,
        validate: impl Fn(&str) -> Result<(), String>,
    ) -> Result<String, AuthError> {
        let candidates = scope.candidate_keys(suffix);
        match self.first_present(&candidates, validate)? {
            Some(value) => Ok(value),
            None => Err(AuthError::MissingVariable { candidates }),
        }
    }

    fn read_optional(
        &self,
        scope: &CredentialScope,
        suffix: &str,
        validate: impl Fn(&str) -> Result<(), String>,
    ) -> Result<Option<String>, AuthError> {
        self.first_present(&scope.candidate_keys(suffix), validate)
    }

    /// The first non-blank candidate wins and is validated; later candidates
    /// are not consulted even if the winner is malformed.
    fn first_present(
        &self,
        candidates: &[String],
        validate: impl Fn(&str) -> Result<(), String>,
    ) -> Result<Option<String>, AuthError> {
        for name in candidates {
            let Some(raw) = self.source.var(name) else {
                continue;
            };
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            validate(value).map_err(|reason| AuthError::InvalidVariable {
                name: name.clone(),
                reason,
            })?;
            return Ok(Some(value.to_owned()));
        }
        Ok(None)
    }
}

impl Default for EnvironmentCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvironmentCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentCredentialProvider")
            .finish_non_exhaustive()
    }
}

impl AuthProvider for EnvironmentCredentialProvider {
    fn authorization_header(&self) -> Result<String, AuthError> {
        self.resolve().map(|creds| creds.authorization_header())
    }
}
