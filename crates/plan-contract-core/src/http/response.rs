// crates/plan-contract-core/src/http/response.rs
// ============================================================================
// Module: API Response
// Description: Buffered HTTP response with lazy JSON decoding.
// Purpose: Expose status, case-insensitive headers, and the raw body to checks.
// Dependencies: reqwest, serde_json
// ============================================================================

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::DecodeError;

/// Maximum number of body characters quoted in diagnostics.
const BODY_PREVIEW_CHARS: usize = 512;

/// A completed HTTP exchange.
///
/// # Invariants
/// - `body` holds the full response body (bounded by the client's size limit).
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Endpoint label, `METHOD path`.
    endpoint: String,
    /// Response status.
    status: StatusCode,
    /// Response headers.
    headers: HeaderMap,
    /// Raw response body.
    body: Vec<u8>,
}

impl ApiResponse {
    /// Wraps the parts of a completed exchange.
    #[must_use]
    pub const fn new(endpoint: String, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            endpoint,
            status,
            headers,
            body,
        }
    }

    /// Returns the endpoint label used in diagnostics.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the numeric HTTP status.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns all response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Looks up a header by name, ignoring case. Non-UTF-8 values read as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidJson`] when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, DecodeError> {
        serde_json::from_slice(&self.body).map_err(|err| DecodeError::InvalidJson {
            endpoint: self.endpoint.clone(),
            message: format!("{err}; body: {}", self.preview()),
        })
    }

    /// Returns the lower-cased serialized body for substring checks.
    ///
    /// The error schema of the remote application is not fixed, so checks
    /// look for hints anywhere in the serialized text rather than in a field.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidJson`] when the body is not valid JSON.
    pub fn json_text_lowercase(&self) -> Result<String, DecodeError> {
        let value = self.json()?;
        Ok(value.to_string().to_lowercase())
    }

    /// Returns a bounded preview of the body for diagnostics.
    #[must_use]
    pub fn preview(&self) -> String {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.chars().count() <= BODY_PREVIEW_CHARS {
            return trimmed.to_string();
        }
        let mut preview: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    }
}
