use crate::env::EnvironmentCredentialProvider;
use crate::error::AuthError;
use crate::provider::AuthProvider;

/// Tries each provider in order and returns the first header produced.
pub struct AuthProviderChain {
    providers: Vec<Box<dyn AuthProvider>>,
}

impl AuthProviderChain {
    /// # Errors
    ///
    /// Returns [`AuthError::NoProviders`] if `providers` is empty.
    pub fn new(providers: Vec<Box<dyn AuthProvider>>) -> Result<Self, AuthError> {
        if providers.is_empty() {
            return Err(AuthError::NoProviders);
        }
        Ok(Self { providers })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Always `false`: construction rejects an empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl AuthProvider for AuthProviderChain {
    fn authorization_header(&self) -> Result<String, AuthError> {
        let mut last_credential_error = None;

        for (index, provider) in self.providers.iter().enumerate() {
            match provider.authorization_header() {
                Ok(header) => return Ok(header),
                Err(err) => {
                    tracing::debug!(provider = index, error = %err, "auth provider failed, trying next");
                    if err.is_credential_error() {
                        last_credential_error = Some(err);
                    }
                }
            }
        }

        Err(last_credential_error.unwrap_or(AuthError::Exhausted))
    }
}

impl std::fmt::Debug for AuthProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProviderChain")
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// Provider set used when the caller does not configure one.
pub struct DefaultAuthChain;

impl DefaultAuthChain {
    /// The environment provider, unless disabled.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoProviders`] when `disable_env_provider` is set.
    pub fn build(disable_env_provider: bool) -> Result<Box<dyn AuthProvider>, AuthError> {
        let mut providers: Vec<Box<dyn AuthProvider>> = Vec::new();
        if !disable_env_provider {
            providers.push(Box::new(EnvironmentCredentialProvider::new()));
        }
        Ok(Box::new(AuthProviderChain::new(providers)?))
    }
}
