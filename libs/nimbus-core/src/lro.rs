//! Long-running operations: handles returned by the service and a bounded
//! poller that waits for them to settle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use crate::config::WaiterConfig;
use crate::error::NimbusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Pending,
    Succeeded,
    Failed,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

/// Snapshot of a server-side operation.
///
/// Handles are never updated in place: polling yields a new handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationHandle {
    id: String,
    status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<Map<String, Value>>,
}

impl OperationHandle {
    #[must_use]
    pub fn new(id: impl Into<String>, status: OperationStatus) -> Self {
        Self {
            id: id.into(),
            status,
            metadata: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Map<String, Value>) -> Self {
        self.error = Some(error);
        self
    }

    /// Decode a handle from a response body shaped `{id, status, metadata?, error?}`.
    ///
    /// # Errors
    ///
    /// Returns [`NimbusError::InvalidOperationHandle`] if `id` or `status` is
    /// missing, or `status` is not one of `pending`, `succeeded`, `failed`.
    pub fn from_value(body: Value) -> Result<Self, NimbusError> {
        serde_json::from_value(body).map_err(NimbusError::InvalidOperationHandle)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }

    /// Structured error reported by the service for a failed operation.
    #[must_use]
    pub fn error(&self) -> Option<&Map<String, Value>> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

/// Fetches the current state of an operation.
#[async_trait]
pub trait OperationStatusClient: Send + Sync {
    /// # Errors
    ///
    /// Any error is propagated unchanged by [`LroWaiter::wait`].
    async fn poll(&self, handle: &OperationHandle) -> Result<OperationHandle, NimbusError>;
}

/// Returns the handle it is given. Used when no status client is configured,
/// so a pending handle simply runs out of attempts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOperationStatusClient;

#[async_trait]
impl OperationStatusClient for NoopOperationStatusClient {
    async fn poll(&self, handle: &OperationHandle) -> Result<OperationHandle, NimbusError> {
        Ok(handle.clone())
    }
}

/// Polls an operation at a fixed interval until it leaves `pending` or the
/// attempt budget runs out.
#[derive(Clone)]
pub struct LroWaiter {
    client: Arc<dyn OperationStatusClient>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl LroWaiter {
    /// Waiter with the default cadence (every 2s, at most 30 polls).
    #[must_use]
    pub fn new(client: Arc<dyn OperationStatusClient>) -> Self {
        Self::from_config(client, WaiterConfig::default())
    }

    #[must_use]
    pub fn from_config(client: Arc<dyn OperationStatusClient>, config: WaiterConfig) -> Self {
        Self {
            client,
            poll_interval: config.poll_interval,
            max_attempts: config.max_attempts,
        }
    }

    /// A new waiter sharing this one's status client.
    #[must_use]
    pub fn with_backoff(&self, poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            client: Arc::clone(&self.client),
            poll_interval,
            max_attempts,
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Poll until the operation succeeds or fails.
    ///
    /// The status client is consulted at least once, even for a handle that is
    /// already terminal, and the handle it returns is the result. No sleep
    /// follows the final attempt.
    ///
    /// # Errors
    ///
    /// - [`NimbusError::OperationTimeout`] if the operation is still pending
    ///   after `max_attempts` polls
    /// - any error returned by the status client
    pub async fn wait(&self, handle: OperationHandle) -> Result<OperationHandle, NimbusError> {
        let span = tracing::debug_span!("lro.wait", operation_id = %handle.id());
        self.poll_until_done(handle).instrument(span).await
    }

    async fn poll_until_done(
        &self,
        initial: OperationHandle,
    ) -> Result<OperationHandle, NimbusError> {
        let mut current = initial.clone();

        for attempt in 1..=self.max_attempts {
            let next = self.client.poll(&current).await?;
            tracing::debug!(attempt, status = %next.status(), "polled operation");

            if next.is_terminal() {
                return Ok(next);
            }
            current = next;

            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        tracing::debug!(attempts = self.max_attempts, "operation still pending");
        Err(NimbusError::OperationTimeout {
            id: initial.id,
            attempts: self.max_attempts,
        })
    }
}

impl fmt::Debug for LroWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LroWaiter")
            .field("poll_interval", &self.poll_interval)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
