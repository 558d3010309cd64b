use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Request, Uri};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use serde_json::Value;

use super::{Transport, TransportRequest, TransportResponse};
use crate::config::HttpTransportConfig;
use crate::error::TransportError;

const APPLICATION_JSON: &str = "application/json";

/// Default [`Transport`]: pooled hyper client over rustls with webpki roots.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    base_url: String,
    user_agent: HeaderValue,
    request_timeout: Duration,
    max_body_size: usize,
}

impl HttpTransport {
    /// Create a transport sending every request to `base_url` + rendered path.
    ///
    /// # Errors
    ///
    /// - [`TransportError::InvalidUrl`] if `base_url` is not an absolute URL
    /// - [`TransportError::InsecureScheme`] for `http://` without
    ///   `allow_insecure_http`
    /// - [`TransportError::Tls`] if the TLS connector cannot be initialized
    /// - [`TransportError::InvalidHeader`] if the user agent is not a valid
    ///   header value
    pub fn new(
        base_url: impl Into<String>,
        config: HttpTransportConfig,
    ) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let uri: Uri = base_url.parse().map_err(|e: http::uri::InvalidUri| {
            TransportError::InvalidUrl {
                url: base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        if uri.authority().is_none() {
            return Err(TransportError::InvalidUrl {
                url: base_url,
                reason: "URL must include a host".to_owned(),
            });
        }

        match uri.scheme_str() {
            Some("https") => {}
            Some("http") if config.allow_insecure_http => {
                tracing::warn!(
                    base_url = %base_url,
                    "insecure HTTP enabled (allow_insecure_http); use only for testing with mock servers"
                );
            }
            Some("http") => {
                return Err(TransportError::InsecureScheme {
                    scheme: "http".to_owned(),
                });
            }
            Some(other) => {
                return Err(TransportError::InvalidUrl {
                    url: base_url.clone(),
                    reason: format!("unsupported scheme '{other}'"),
                });
            }
            None => {
                return Err(TransportError::InvalidUrl {
                    url: base_url,
                    reason: "URL must include a scheme".to_owned(),
                });
            }
        }

        let user_agent = HeaderValue::try_from(config.user_agent)?;
        let connector = build_https_connector(config.allow_insecure_http)?;
        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build::<_, Full<Bytes>>(connector);

        Ok(Self {
            client,
            base_url,
            user_agent,
            request_timeout: config.request_timeout,
            max_body_size: config.max_body_size,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(
        &self,
        request: TransportRequest,
    ) -> Result<Request<Full<Bytes>>, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| TransportError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let body = match &request.body {
            Some(value) => Some(serde_json::to_vec(value).map_err(TransportError::Encode)?),
            None => None,
        };

        let mut builder = Request::builder().method(request.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(request.headers);
            headers
                .entry(ACCEPT)
                .or_insert(HeaderValue::from_static(APPLICATION_JSON));
            headers.insert(USER_AGENT, self.user_agent.clone());
            if body.is_some() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            }
        }

        let body = body.map_or_else(|| Full::new(Bytes::new()), |b| Full::new(Bytes::from(b)));
        Ok(builder.body(body)?)
    }

    async fn send(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<TransportResponse, TransportError> {
        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();

        let mut collected = Vec::new();
        let mut body = std::pin::pin!(body);
        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(|e| TransportError::Connect(Box::new(e)))?;
            if let Some(chunk) = frame.data_ref() {
                if collected.len() + chunk.len() > self.max_body_size {
                    return Err(TransportError::BodyTooLarge {
                        limit: self.max_body_size,
                    });
                }
                collected.extend_from_slice(chunk);
            }
        }

        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let body = parse_body(&collected, content_type);

        Ok(TransportResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let method = request.method.clone();
        let request = self.build_request(request)?;
        tracing::debug!(method = %method, uri = %request.uri(), "sending request");

        let response = tokio::time::timeout(self.request_timeout, self.send(request))
            .await
            .map_err(|_| TransportError::Timeout(self.request_timeout))??;

        tracing::debug!(status = response.status.as_u16(), "received response");
        Ok(response)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .field("max_body_size", &self.max_body_size)
            .finish_non_exhaustive()
    }
}

/// HTTP/2 is negotiated through ALPN via `enable_all_versions()`.
fn build_https_connector(
    allow_http: bool,
) -> Result<HttpsConnector<HttpConnector>, TransportError> {
    let provider = rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

    let builder = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(provider)
        .map_err(|e| TransportError::Tls(Box::new(e)))?;

    let connector = if allow_http {
        builder.https_or_http().enable_all_versions().build()
    } else {
        builder.https_only().enable_all_versions().build()
    };
    Ok(connector)
}

/// Empty bodies become `Null`; JSON content types are parsed when possible;
/// anything else is returned as a string.
fn parse_body(bytes: &[u8], content_type: Option<&str>) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    let is_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
    if is_json && let Ok(value) = serde_json::from_slice(bytes) {
        return value;
    }

    Value::String(String::from_utf8_lossy(bytes).into_owned())
}
