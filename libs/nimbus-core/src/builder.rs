use std::sync::Arc;

use nimbus_auth::{AuthProvider, DefaultAuthChain};

use crate::client::NimbusClient;
use crate::config::{HttpTransportConfig, NimbusClientConfig, WaiterConfig};
use crate::error::NimbusError;
use crate::idempotency::{IdempotencyTokenProvider, UuidTokenProvider};
use crate::lro::{NoopOperationStatusClient, OperationStatusClient};
use crate::transport::{HttpTransport, Transport};

/// Builder for [`NimbusClient`].
///
/// Anything left unset falls back to a default: environment credentials for
/// auth, an [`HttpTransport`] for the endpoint, UUID idempotency keys and a
/// status client that never advances.
///
/// Settings made through the individual setters take precedence over a
/// configuration passed to [`with_config`](Self::with_config), whatever the
/// call order.
#[derive(Default)]
pub struct NimbusClientBuilder {
    config: NimbusClientConfig,
    endpoint: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    idempotency: Option<Arc<dyn IdempotencyTokenProvider>>,
    lro: Option<Arc<dyn OperationStatusClient>>,
    disable_env_provider: Option<bool>,
    http_config: Option<HttpTransportConfig>,
    waiter_config: Option<WaiterConfig>,
}

impl NimbusClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a deserialized configuration for every setting not set explicitly.
    ///
    /// Explicit settings made before or after this call are kept. A second
    /// call replaces the first configuration.
    #[must_use]
    pub fn with_config(mut self, config: NimbusClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Base URL for the default transport. Ignored when a transport is set.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn idempotency(mut self, provider: Arc<dyn IdempotencyTokenProvider>) -> Self {
        self.idempotency = Some(provider);
        self
    }

    #[must_use]
    pub fn lro_client(mut self, client: Arc<dyn OperationStatusClient>) -> Self {
        self.lro = Some(client);
        self
    }

    /// Do not fall back to environment credentials when no auth is set.
    #[must_use]
    pub fn disable_env_provider(mut self, disable: bool) -> Self {
        self.disable_env_provider = Some(disable);
        self
    }

    #[must_use]
    pub fn http_config(mut self, config: HttpTransportConfig) -> Self {
        self.http_config = Some(config);
        self
    }

    #[must_use]
    pub fn waiter_config(mut self, config: WaiterConfig) -> Self {
        self.waiter_config = Some(config);
        self
    }

    /// # Errors
    ///
    /// - [`NimbusError::Build`] if no auth provider is set and the environment
    ///   provider is disabled, or if neither a transport nor an endpoint is set
    /// - [`NimbusError::Transport`] if the default transport rejects the endpoint
    pub fn build(self) -> Result<NimbusClient, NimbusError> {
        let config = self.config;
        let disable_env_provider = self
            .disable_env_provider
            .unwrap_or(config.disable_env_provider);
        let waiter_config = self.waiter_config.unwrap_or(config.waiter);

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(auth) => auth,
            None => DefaultAuthChain::build(disable_env_provider)
                .map(Arc::from)
                .map_err(|_| NimbusError::Build("auth provider is required".to_owned()))?,
        };

        let endpoint = self.endpoint.or(config.endpoint);
        let transport: Arc<dyn Transport> = match (self.transport, endpoint) {
            (Some(transport), _) => transport,
            (None, Some(endpoint)) => {
                let http_config = self.http_config.unwrap_or(config.http);
                Arc::new(HttpTransport::new(endpoint, http_config)?)
            }
            (None, None) => {
                return Err(NimbusError::Build(
                    "either endpoint or transport must be provided".to_owned(),
                ));
            }
        };

        tracing::debug!(
            poll_interval = ?waiter_config.poll_interval,
            max_attempts = waiter_config.max_attempts,
            "nimbus client built"
        );

        Ok(NimbusClient {
            transport,
            auth,
            idempotency: self
                .idempotency
                .unwrap_or_else(|| Arc::new(UuidTokenProvider)),
            lro: self
                .lro
                .unwrap_or_else(|| Arc::new(NoopOperationStatusClient)),
            waiter_config,
        })
    }
}
