//! HTTP access to the UNIBOT API.
//!
//! Sessions talk to the backend through the [`Transport`] trait so the
//! retry and state-machine logic can be exercised without a network. The
//! production implementation is [`HttpTransport`], built on `reqwest`.

use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{HTTP_REQUESTS, HTTP_REQUEST_DURATION, HTTP_REQUEST_ERRORS};

/// Default backend location; matches the development proxy target.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable that overrides the backend location.
pub const API_URL_ENV: &str = "UNIBOT_API_URL";

/// Connection settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that request paths are resolved against.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration pointing at [`DEFAULT_API_URL`].
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a configuration, taking the base URL from `UNIBOT_API_URL`
    /// when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(base_url) = env::var(API_URL_ENV)
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url;
        }
        config
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The network seam between sessions and the backend.
///
/// Implementations return every HTTP status as an [`HttpResponse`]; only
/// failures to complete the exchange (connection refused, timeout, body
/// read errors) are reported as `Err`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET, optionally with a bearer token.
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<HttpResponse>;

    /// Issues a POST with a JSON body.
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn execute(&self, method: &str, url: Url, request: RequestBuilder) -> Result<HttpResponse> {
        HTTP_REQUESTS.click();
        let started = Instant::now();
        tracing::debug!(%method, %url, "sending request");
        let response = request.send().await.map_err(|e| {
            HTTP_REQUEST_ERRORS.click();
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            HTTP_REQUEST_ERRORS.click();
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        HTTP_REQUEST_DURATION.add(started.elapsed().as_secs_f64());
        tracing::debug!(%method, %url, status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<HttpResponse> {
        let url = self.url(path)?;
        let mut headers = self.default_headers();
        if let Some(token) = bearer {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                Error::validation(
                    format!("token is not a valid header value: {e}"),
                    Some("token".to_string()),
                )
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }
        let request = self.client.get(url.clone()).headers(headers);
        self.execute("GET", url, request).await
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        let url = self.url(path)?;
        let request = self
            .client
            .post(url.clone())
            .headers(self.default_headers())
            .json(body);
        self.execute("POST", url, request).await
    }
}

/// Pulls a human-readable message out of an error body.
///
/// JSON bodies contribute their `message` (or `error`) field; other
/// non-empty bodies are used verbatim; otherwise `fallback` is returned.
pub fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
