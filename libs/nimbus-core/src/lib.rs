#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Nimbus SDK invocation core
//!
//! Service clients describe each API operation with a static
//! [`OperationDescriptor`] and hand it to [`NimbusClient::invoke`], which
//! renders the path, attaches idempotency, pagination and authorization
//! headers, sends the request through a [`Transport`] and validates the
//! status.
//!
//! On top of single calls:
//! - [`Paginator`] walks header-cursor paginated operations as a stream
//! - [`LroWaiter`] polls long-running operations until they settle
//!
//! ```rust,ignore
//! use nimbus_core::{NimbusClient, OperationDescriptor, PathParams};
//!
//! const GET_VM: OperationDescriptor =
//!     OperationDescriptor::new("GetVm", http::Method::GET, "/v1/vms/{id}", 200);
//!
//! let client = NimbusClient::builder()
//!     .endpoint("https://compute.eu-north-2.nimbus.cloud")
//!     .build()?;
//! let vm = client.invoke(&GET_VM, &PathParams::from([("id", "vm-1")]), None, None).await?;
//! ```

mod builder;
mod client;
mod config;
mod descriptor;
mod error;
mod idempotency;
mod lro;
mod paginator;
mod path;
mod transport;

pub use builder::NimbusClientBuilder;
pub use client::{InvocationResult, NimbusClient};
pub use config::{
    DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpTransportConfig, NimbusClientConfig,
    WaiterConfig,
};
pub use descriptor::{AdditionalSuccess, OperationDescriptor, PaginationSpec};
pub use error::{BoxError, NimbusError, TransportError};
pub use idempotency::{IDEMPOTENCY_KEY_HEADER, IdempotencyTokenProvider, UuidTokenProvider};
pub use lro::{
    LroWaiter, NoopOperationStatusClient, OperationHandle, OperationStatus, OperationStatusClient,
};
pub use paginator::{CursorPages, Paginator};
pub use path::{PathParams, render_path};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};

pub use nimbus_auth as auth;
pub use nimbus_errors::ProblemDetails;
