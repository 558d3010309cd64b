//! Serde-friendly configuration for the client, its default transport and
//! the operation waiter.
//!
//! Durations use humantime strings (`"30s"`, `"1500ms"`), so these structs
//! can be embedded in an application's own config file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default `User-Agent` sent by [`HttpTransport`](crate::HttpTransport).
pub const DEFAULT_USER_AGENT: &str = concat!("nimbus-sdk/", env!("CARGO_PKG_VERSION"));

/// Default maximum response body size (10 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Settings for the default HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpTransportConfig {
    /// Timeout for a single request, response body included (default: 30s)
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    pub user_agent: String,

    /// Responses with larger bodies fail with `BodyTooLarge`
    pub max_body_size: usize,

    /// Permit `http://` endpoints. Intended for local mock servers only.
    pub allow_insecure_http: bool,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            allow_insecure_http: false,
        }
    }
}

/// Polling cadence for [`LroWaiter`](crate::LroWaiter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaiterConfig {
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Everything [`NimbusClientBuilder::with_config`](crate::NimbusClientBuilder::with_config)
/// can take from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NimbusClientConfig {
    /// Base URL of the service, e.g. `https://compute.eu-north-2.nimbus.cloud`
    pub endpoint: Option<String>,

    /// Skip the environment credential provider when no explicit auth is set
    pub disable_env_provider: bool,

    pub http: HttpTransportConfig,

    pub waiter: WaiterConfig,
}
