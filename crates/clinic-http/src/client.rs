//! HTTP client implementation.

use async_trait::async_trait;
use clinic_core::{ApiRequest, ApiResponse, ApiUrl, Method, Transport, TransportError};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument, trace};

/// Sends [`ApiRequest`]s to the clinic backend over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: ApiUrl,
}

impl HttpClient {
    /// Create a client for the backend at `base`.
    pub fn new(base: ApiUrl) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("clinic-admin/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, base })
    }

    /// Returns the backend base URL.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    fn headers(request: &ApiRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::InvalidRequest {
                    message: format!("header name '{name}': {e}"),
                }
            })?;
            let mut value =
                HeaderValue::from_str(value).map_err(|e| TransportError::InvalidRequest {
                    message: format!("header '{name}': {e}"),
                })?;
            if name == reqwest::header::AUTHORIZATION {
                value.set_sensitive(true);
            }
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(base = %self.base, method = %request.method(), path = %request.path()))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.base.endpoint(request.path());
        debug!(%url, "Sending request");

        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &url)
            .headers(Self::headers(&request)?);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        trace!(status, bytes = body.len(), "Received response");

        Ok(ApiResponse::new(status, body))
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}
