// crates/plan-contract-core/src/http/client.rs
// ============================================================================
// Module: HTTP Client Wrapper
// Description: Timeout-bounded HTTP client with a per-instance cookie jar.
// Purpose: Issue GET/POST/PATCH/DELETE and surface transport failures distinctly.
// Dependencies: reqwest, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! [`HttpClient`] owns one `reqwest` client and one cookie jar. Every request
//! made through the same instance shares cookies, which is what carries the
//! login session from the handshake into admin calls.
//!
//! The client never retries and never follows redirects. A completed exchange
//! with an HTTP error status is an [`ApiResponse`], not an error; only
//! network, timeout, and size-limit failures become [`TransportError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::Method;
use reqwest::cookie::CookieStore;
use reqwest::cookie::Jar;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::response::ApiResponse;
use crate::config::HarnessConfig;
use crate::error::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size buffered by the harness.
pub const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Request Types
// ============================================================================

/// HTTP methods used by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PATCH.
    Patch,
    /// DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Converts to the `reqwest` method.
    fn to_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }
}

/// Request body variants.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON body.
    Json(Value),
    /// `application/x-www-form-urlencoded` body.
    Form(Vec<(String, String)>),
}

/// A request relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    method: HttpMethod,
    /// Absolute path, e.g. `/api/strategic-plan`.
    path: String,
    /// Extra request headers.
    headers: HeaderMap,
    /// Request body.
    body: RequestBody,
}

impl ApiRequest {
    /// Creates a request with no body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Attaches a form-encoded body.
    #[must_use]
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the endpoint label, `METHOD path`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }

    /// Returns the method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded exchange. Request bodies are never recorded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// 1-based sequence number within the client.
    pub sequence: u64,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Response status when the exchange completed.
    pub status: Option<u16>,
    /// Transport error text when it did not.
    pub error: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Timeout-bounded HTTP client with its own cookie jar.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Underlying client.
    client: Client,
    /// Cookie jar shared by every request through this instance.
    jar: Arc<Jar>,
    /// Target origin.
    base_url: Url,
    /// Per-request timeout.
    timeout: Duration,
    /// Recorded exchanges.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl HttpClient {
    /// Builds a client for the given origin and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when the client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|err| TransportError::Setup(err.to_string()))?;
        Ok(Self {
            client,
            jar,
            base_url,
            timeout,
            transcript: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Builds a client from the harness configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when the client cannot be constructed.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, TransportError> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    /// Returns the target origin.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves a path against the origin, keeping any base path prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when the joined URL is invalid.
    pub fn url(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|err| TransportError::Setup(format!("invalid url {joined}: {err}")))
    }

    /// Returns the names of cookies the jar would send to the origin.
    #[must_use]
    pub fn cookie_names(&self) -> Vec<String> {
        let Some(header) = self.jar.cookies(&self.base_url) else {
            return Vec::new();
        };
        let Ok(raw) = header.to_str() else {
            return Vec::new();
        };
        parse_cookie_names(raw)
    }

    /// Returns a snapshot of the transcript.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Sends a request and buffers the response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on connect, timeout, or body-read failure,
    /// or when the body exceeds [`MAX_RESPONSE_BYTES`].
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path)?;
        let started = Instant::now();
        let result = self.exchange(&request, url).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(response) => {
                tracing::debug!(
                    method = request.method.as_str(),
                    path = %request.path,
                    status = response.status_code(),
                    elapsed_ms,
                    "http exchange"
                );
            }
            Err(err) => {
                tracing::debug!(
                    method = request.method.as_str(),
                    path = %request.path,
                    error = %err,
                    elapsed_ms,
                    "http exchange failed"
                );
            }
        }
        self.record(&request, &result, elapsed_ms);
        result
    }

    /// Performs the exchange without recording it.
    async fn exchange(&self, request: &ApiRequest, url: Url) -> Result<ApiResponse, TransportError> {
        let method = request.method;
        let url_text = url.to_string();
        let mut builder =
            self.client.request(method.to_reqwest(), url).headers(request.headers.clone());
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };
        let response =
            builder.send().await.map_err(|err| self.transport_error(method, &url_text, &err))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = self.read_body_with_limit(response, method, &url_text).await?;
        Ok(ApiResponse::new(request.endpoint(), status, headers, body))
    }

    /// Reads a response body while enforcing [`MAX_RESPONSE_BYTES`].
    async fn read_body_with_limit(
        &self,
        mut response: reqwest::Response,
        method: HttpMethod,
        url: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let mut body = Vec::new();
        while let Some(chunk) =
            response.chunk().await.map_err(|err| self.transport_error(method, url, &err))?
        {
            let next_total = body.len().saturating_add(chunk.len());
            if next_total > MAX_RESPONSE_BYTES {
                return Err(TransportError::ResponseTooLarge {
                    method: method.as_str().to_string(),
                    url: url.to_string(),
                    actual: next_total,
                    limit: MAX_RESPONSE_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Maps a `reqwest` error, separating timeouts.
    fn transport_error(&self, method: HttpMethod, url: &str, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            return TransportError::Timeout {
                method: method.as_str().to_string(),
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis(),
            };
        }
        TransportError::Request {
            method: method.as_str().to_string(),
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Appends a transcript entry.
    fn record(
        &self,
        request: &ApiRequest,
        result: &Result<ApiResponse, TransportError>,
        elapsed_ms: u64,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        let (status, error) = match result {
            Ok(response) => (Some(response.status_code()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        guard.push(TranscriptEntry {
            sequence,
            method: request.method,
            path: request.path.clone(),
            status,
            error,
            elapsed_ms,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts cookie names from a `Cookie` header value (`a=1; b=2`).
#[must_use]
pub fn parse_cookie_names(raw: &str) -> Vec<String> {
    raw.split(';')
        .filter_map(|pair| {
            let name = pair.split_once('=').map_or(pair, |(name, _)| name).trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}
