use std::time::Duration;

use nimbus_auth::AuthError;
use nimbus_errors::ProblemDetails;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures raised by a [`Transport`](crate::Transport) before a response
/// status is available.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// Base URL or joined request URL could not be parsed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Plain HTTP used without opting in
    #[error("URL scheme '{scheme}' not allowed: use https or enable allow_insecure_http")]
    InsecureScheme { scheme: String },

    #[error("TLS error: {0}")]
    Tls(#[source] BoxError),

    /// Single request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network failure: connect, reset, protocol error
    #[error("Connection error: {0}")]
    Connect(#[source] BoxError),

    #[error("Response body too large: limit {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Request body could not be serialized
    #[error("JSON encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// Failure from a caller-supplied transport
    #[error("Transport error: {0}")]
    Other(#[source] BoxError),
}

impl From<hyper_util::client::legacy::Error> for TransportError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        TransportError::Connect(Box::new(err))
    }
}

/// Errors returned by [`NimbusClient`](crate::NimbusClient) operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NimbusError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Missing path parameter: {0}")]
    MissingPathParameter(String),

    #[error("Invalid header name '{name}': {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },

    #[error("Invalid value for header '{name}': {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service rejected the call with a Problem Details body.
    ///
    /// `status` is the HTTP status of the response; the payload's own
    /// `status` member may differ.
    #[error("{problem}")]
    Problem { status: u16, problem: ProblemDetails },

    /// The service rejected the call without a recognizable error body.
    #[error("Unexpected status for {operation}: {status}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
    },

    #[error("Operation {id} timed out after {attempts} attempts")]
    OperationTimeout { id: String, attempts: u32 },

    #[error("Response is not a valid operation handle: {0}")]
    InvalidOperationHandle(#[source] serde_json::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Build(String),
}

impl NimbusError {
    /// Credentials were missing, malformed or rejected locally.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The request could not be built from the caller's input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingPathParameter(_)
                | Self::InvalidHeaderName { .. }
                | Self::InvalidHeaderValue { .. }
        )
    }

    /// The Problem Details payload, when the service returned one.
    #[must_use]
    pub fn problem(&self) -> Option<&ProblemDetails> {
        match self {
            Self::Problem { problem, .. } => Some(problem),
            _ => None,
        }
    }

    /// HTTP status of a rejected response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Problem { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error as _;

    #[test]
    fn problem_error_displays_title_and_detail() {
        let problem = ProblemDetails::try_from(json!({
            "type": "about:blank",
            "title": "Rate limited",
            "status": 429,
            "detail": "Too many tokens issued"
        }))
        .unwrap();
        let err = NimbusError::Problem {
            status: 429,
            problem,
        };

        assert_eq!(err.to_string(), "Rate limited: Too many tokens issued");
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.problem().unwrap().title(), "Rate limited");
    }

    #[test]
    fn unexpected_status_names_operation() {
        let err = NimbusError::UnexpectedStatus {
            operation: "ListNetworks",
            status: 503,
        };
        assert_eq!(err.to_string(), "Unexpected status for ListNetworks: 503");
        assert!(err.problem().is_none());
    }

    #[test]
    fn classification_helpers() {
        assert!(NimbusError::from(AuthError::EmptyToken).is_auth());
        assert!(NimbusError::MissingPathParameter("id".to_owned()).is_validation());
        assert!(!NimbusError::Build("x".to_owned()).is_validation());
        assert!(!NimbusError::Build("x".to_owned()).is_auth());
    }

    #[test]
    fn transport_errors_keep_their_source() {
        let err = NimbusError::from(TransportError::Other("socket closed".into()));
        assert_eq!(err.to_string(), "Transport error: socket closed");
        assert!(err.source().is_some());
    }

    #[test]
    fn operation_timeout_message() {
        let err = NimbusError::OperationTimeout {
            id: "op-1".to_owned(),
            attempts: 30,
        };
        assert_eq!(err.to_string(), "Operation op-1 timed out after 30 attempts");
    }
}
