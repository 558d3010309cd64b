//! Static metadata describing one remote operation.
//!
//! Service facades declare descriptors as `pub const` items:
//!
//! ```
//! use http::Method;
//! use nimbus_core::OperationDescriptor;
//!
//! pub const LIST_NETWORKS: OperationDescriptor =
//!     OperationDescriptor::new("ListNetworks", Method::GET, "/v1/projects/{project}/networks", 200)
//!         .paginated("Range", "Content-Range");
//! ```

use http::Method;

/// A status code accepted in addition to the primary success code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditionalSuccess {
    pub code: u16,
    /// Whether a response with this status carries a body.
    pub has_body: bool,
}

impl AdditionalSuccess {
    #[must_use]
    pub const fn new(code: u16, has_body: bool) -> Self {
        Self { code, has_body }
    }
}

/// Header names used to exchange pagination cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSpec {
    /// Request header carrying the cursor of the page to fetch.
    pub request_header: &'static str,
    /// Response header carrying the cursor of the next page.
    pub response_header: &'static str,
}

/// Immutable description of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    name: &'static str,
    method: Method,
    uri: &'static str,
    success_code: u16,
    additional_success: &'static [AdditionalSuccess],
    idempotent: bool,
    pagination: Option<PaginationSpec>,
    lro: bool,
}

impl OperationDescriptor {
    /// `uri` may contain `{name}` placeholders, percent-encoded on
    /// rendering, and `{*name}` placeholders, inserted verbatim.
    #[must_use]
    pub const fn new(
        name: &'static str,
        method: Method,
        uri: &'static str,
        success_code: u16,
    ) -> Self {
        Self {
            name,
            method,
            uri,
            success_code,
            additional_success: &[],
            idempotent: false,
            pagination: None,
            lro: false,
        }
    }

    #[must_use]
    pub const fn with_additional_success(mut self, codes: &'static [AdditionalSuccess]) -> Self {
        self.additional_success = codes;
        self
    }

    /// Send a fresh `idempotency-key` header on every call.
    #[must_use]
    pub const fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    #[must_use]
    pub const fn paginated(mut self, request_header: &'static str, response_header: &'static str) -> Self {
        self.pagination = Some(PaginationSpec {
            request_header,
            response_header,
        });
        self
    }

    /// The response body is an operation handle to be polled.
    #[must_use]
    pub const fn long_running(mut self) -> Self {
        self.lro = true;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn uri(&self) -> &'static str {
        self.uri
    }

    #[must_use]
    pub const fn success_code(&self) -> u16 {
        self.success_code
    }

    #[must_use]
    pub const fn additional_success(&self) -> &'static [AdditionalSuccess] {
        self.additional_success
    }

    #[must_use]
    pub const fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    #[must_use]
    pub const fn pagination(&self) -> Option<&PaginationSpec> {
        self.pagination.as_ref()
    }

    #[must_use]
    pub const fn is_long_running(&self) -> bool {
        self.lro
    }

    /// Whether `status` counts as success for this operation.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        status == self.success_code || self.additional_success.iter().any(|s| s.code == status)
    }

    /// Whether a successful response with `status` is expected to carry a body.
    ///
    /// `None` if the status is not accepted at all.
    #[must_use]
    pub fn expects_body(&self, status: u16) -> Option<bool> {
        if status == self.success_code {
            return Some(true);
        }
        self.additional_success
            .iter()
            .find(|s| s.code == status)
            .map(|s| s.has_body)
    }
}
