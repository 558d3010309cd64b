//! The invocation pipeline.
//!
//! Every call goes through the same steps: render the path, assemble headers
//! (idempotency key, pagination cursor, authorization), dispatch through the
//! transport, and validate the status against the descriptor.

use std::fmt;
use std::sync::Arc;

use http::header::{AUTHORIZATION, HeaderName};
use http::{HeaderMap, HeaderValue};
use nimbus_auth::AuthProvider;
use nimbus_errors::ProblemDetails;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;

use crate::builder::NimbusClientBuilder;
use crate::config::WaiterConfig;
use crate::descriptor::OperationDescriptor;
use crate::error::NimbusError;
use crate::idempotency::{IDEMPOTENCY_KEY_HEADER, IdempotencyTokenProvider};
use crate::lro::{LroWaiter, OperationHandle, OperationStatusClient};
use crate::paginator::Paginator;
use crate::path::{PathParams, render_path};
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Outcome of an accepted call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub status: u16,
    pub body: Value,
    /// Cursor for the next page; `None` when the operation is not paginated
    /// or this was the last page.
    pub next_cursor: Option<String>,
}

impl InvocationResult {
    /// Deserialize the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`NimbusError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NimbusError> {
        T::deserialize(&self.body).map_err(NimbusError::Decode)
    }

    /// # Errors
    ///
    /// Returns [`NimbusError::Decode`] if the body does not match `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, NimbusError> {
        serde_json::from_value(self.body).map_err(NimbusError::Decode)
    }
}

/// Entry point for calling Nimbus services.
///
/// Cheap to clone; clones share the transport and providers.
#[derive(Clone)]
pub struct NimbusClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) auth: Arc<dyn AuthProvider>,
    pub(crate) idempotency: Arc<dyn IdempotencyTokenProvider>,
    pub(crate) lro: Arc<dyn OperationStatusClient>,
    pub(crate) waiter_config: WaiterConfig,
}

impl NimbusClient {
    #[must_use]
    pub fn builder() -> NimbusClientBuilder {
        NimbusClientBuilder::new()
    }

    /// Invoke one operation.
    ///
    /// `cursor` is only sent when the descriptor declares pagination.
    ///
    /// # Errors
    ///
    /// - [`NimbusError::MissingPathParameter`] if a placeholder has no value
    /// - [`NimbusError::InvalidHeaderName`] / [`NimbusError::InvalidHeaderValue`]
    ///   if a header cannot be encoded
    /// - [`NimbusError::Auth`] if no credentials are available
    /// - [`NimbusError::Transport`] if the transport fails
    /// - [`NimbusError::Problem`] if the status is not accepted and the body
    ///   is Problem Details
    /// - [`NimbusError::UnexpectedStatus`] if the status is not accepted
    ///   otherwise
    pub async fn invoke(
        &self,
        descriptor: &OperationDescriptor,
        params: &PathParams,
        body: Option<Value>,
        cursor: Option<&str>,
    ) -> Result<InvocationResult, NimbusError> {
        let span = tracing::debug_span!("nimbus.invoke", operation = descriptor.name());
        self.invoke_inner(descriptor, params, body, cursor)
            .instrument(span)
            .await
    }

    async fn invoke_inner(
        &self,
        descriptor: &OperationDescriptor,
        params: &PathParams,
        body: Option<Value>,
        cursor: Option<&str>,
    ) -> Result<InvocationResult, NimbusError> {
        let path = render_path(descriptor.uri(), params)?;
        let headers = self.request_headers(descriptor, cursor)?;

        let request = TransportRequest {
            method: descriptor.method().clone(),
            path,
            headers,
            body,
        };

        tracing::debug!(method = %request.method, path = %request.path, "dispatching");
        let response = self.transport.execute(request).await?;
        let status = response.status.as_u16();

        if !descriptor.accepts(status) {
            return Err(reject(descriptor, status, response.body));
        }

        let next_cursor = next_cursor(descriptor, &response);
        tracing::debug!(status, has_next = next_cursor.is_some(), "accepted");

        Ok(InvocationResult {
            status,
            body: response.body,
            next_cursor,
        })
    }

    /// Headers in the order they are resolved: idempotency key, cursor,
    /// then authorization last.
    fn request_headers(
        &self,
        descriptor: &OperationDescriptor,
        cursor: Option<&str>,
    ) -> Result<HeaderMap, NimbusError> {
        let mut headers = HeaderMap::new();

        if descriptor.is_idempotent() {
            let token = self.idempotency.next_token();
            insert_header(&mut headers, IDEMPOTENCY_KEY_HEADER, &token)?;
        }

        if let (Some(cursor), Some(pagination)) = (cursor, descriptor.pagination()) {
            let name = pagination.request_header.to_ascii_lowercase();
            insert_header(&mut headers, &name, cursor)?;
        }

        let authorization = self.auth.authorization_header()?;
        let mut value = HeaderValue::from_str(&authorization).map_err(|source| {
            NimbusError::InvalidHeaderValue {
                name: AUTHORIZATION.as_str().to_owned(),
                source,
            }
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        Ok(headers)
    }

    /// A restartable page stream over a paginated operation.
    #[must_use]
    pub fn paginator(&self, descriptor: &OperationDescriptor, params: PathParams) -> Paginator {
        Paginator::new(self.clone(), descriptor.clone(), params)
    }

    /// A waiter using the configured status client and cadence.
    #[must_use]
    pub fn waiter(&self) -> LroWaiter {
        LroWaiter::from_config(Arc::clone(&self.lro), self.waiter_config)
    }

    /// Invoke a long-running operation and decode the returned handle.
    ///
    /// # Errors
    ///
    /// Everything [`invoke`](Self::invoke) returns, plus
    /// [`NimbusError::InvalidOperationHandle`] if the body is not a handle.
    pub async fn invoke_lro(
        &self,
        descriptor: &OperationDescriptor,
        params: &PathParams,
        body: Option<Value>,
    ) -> Result<OperationHandle, NimbusError> {
        if !descriptor.is_long_running() {
            tracing::warn!(
                operation = descriptor.name(),
                "decoding an operation handle from a descriptor not marked long-running"
            );
        }
        let result = self.invoke(descriptor, params, body, None).await?;
        OperationHandle::from_value(result.body)
    }

    /// [`invoke_lro`](Self::invoke_lro) followed by [`LroWaiter::wait`].
    ///
    /// # Errors
    ///
    /// Everything [`invoke_lro`](Self::invoke_lro) and [`LroWaiter::wait`]
    /// return.
    pub async fn invoke_and_wait(
        &self,
        descriptor: &OperationDescriptor,
        params: &PathParams,
        body: Option<Value>,
    ) -> Result<OperationHandle, NimbusError> {
        let handle = self.invoke_lro(descriptor, params, body).await?;
        self.waiter().wait(handle).await
    }
}

impl fmt::Debug for NimbusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NimbusClient")
            .field("waiter_config", &self.waiter_config)
            .finish_non_exhaustive()
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), NimbusError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|source| NimbusError::InvalidHeaderName {
            name: name.to_owned(),
            source,
        })?;
    let header_value =
        HeaderValue::from_str(value).map_err(|source| NimbusError::InvalidHeaderValue {
            name: name.to_owned(),
            source,
        })?;
    headers.insert(header_name, header_value);
    Ok(())
}

/// Map a rejected response to a problem error when the body qualifies,
/// otherwise to a plain status error.
fn reject(descriptor: &OperationDescriptor, status: u16, body: Value) -> NimbusError {
    match ProblemDetails::try_from(body) {
        Ok(problem) => {
            if problem.status().as_u64() != Some(u64::from(status)) {
                tracing::warn!(
                    http_status = status,
                    problem_status = %problem.status(),
                    "problem details status does not match response status"
                );
            }
            tracing::debug!(
                status,
                problem_type = problem.type_url(),
                "rejected with problem details"
            );
            NimbusError::Problem { status, problem }
        }
        Err(_) => {
            tracing::debug!(status, "rejected with unexpected status");
            NimbusError::UnexpectedStatus {
                operation: descriptor.name(),
                status,
            }
        }
    }
}

fn next_cursor(descriptor: &OperationDescriptor, response: &TransportResponse) -> Option<String> {
    let pagination = descriptor.pagination()?;
    response
        .header(&pagination.response_header.to_ascii_lowercase())
        .filter(|cursor| !cursor.is_empty())
        .map(str::to_owned)
}
