// crates/plan-contract-core/src/error.rs
// ============================================================================
// Module: Contract Errors
// Description: Error taxonomy for the strategic-plan contract suite.
// Purpose: Keep transport, auth, decode, and assertion failures distinguishable.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every scenario step resolves to one of five failure kinds. Transport and
//! decode failures abort a scenario immediately; assertion failures carry the
//! endpoint, the expectation, and the literal expected/actual values so a
//! failing run can be diagnosed from its summary alone.
//!
//! String payloads may include untrusted server text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Network-level failure of a single HTTP exchange.
///
/// # Invariants
/// - Never produced for a completed exchange with an HTTP error status.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request exceeded the configured timeout.
    #[error("{method} {url} timed out after {timeout_ms} ms")]
    Timeout {
        /// HTTP method.
        method: String,
        /// Request URL.
        url: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u128,
    },
    /// Connection, protocol, or body read failure.
    #[error("{method} {url} failed: {message}")]
    Request {
        /// HTTP method.
        method: String,
        /// Request URL.
        url: String,
        /// Underlying client error text.
        message: String,
    },
    /// Response body exceeded the buffering limit.
    #[error("{method} {url} response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// HTTP method.
        method: String,
        /// Request URL.
        url: String,
        /// Bytes received before aborting.
        actual: usize,
        /// Maximum accepted bytes.
        limit: usize,
    },
    /// The HTTP client could not be constructed or the URL is invalid.
    #[error("http client setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Returns true when the failure was caused by the request timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ============================================================================
// SECTION: Auth Errors
// ============================================================================

/// Failure of the CSRF + credentials login handshake.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The CSRF endpoint answered with an HTTP error status.
    #[error("csrf endpoint returned http {status}")]
    CsrfStatus {
        /// HTTP status code.
        status: u16,
    },
    /// The CSRF payload had no usable `csrfToken`.
    #[error("csrf response missing csrfToken")]
    MissingCsrfToken,
    /// The CSRF payload was not JSON.
    #[error("csrf response is not valid json: {0}")]
    CsrfDecode(String),
    /// The credentials callback answered with an HTTP error status.
    #[error("credentials callback returned http {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },
    /// The cookie jar held no session cookie after the callback.
    #[error("no session cookie after login (cookies present: [{present}])")]
    NoSessionCookie {
        /// Comma-separated cookie names that were present.
        present: String,
    },
    /// A handshake request failed at the transport level.
    #[error("login transport failure: {0}")]
    Transport(#[from] TransportError),
}

// ============================================================================
// SECTION: Decode Errors
// ============================================================================

/// Response body could not be interpreted.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// Body is not valid JSON.
    #[error("{endpoint}: body is not valid json: {message}")]
    InvalidJson {
        /// Endpoint label (`METHOD path`).
        endpoint: String,
        /// Parser error text.
        message: String,
    },
    /// Body is JSON but not the expected shape.
    #[error("{endpoint}: unexpected payload shape: {message}")]
    Shape {
        /// Endpoint label (`METHOD path`).
        endpoint: String,
        /// Description of the mismatch.
        message: String,
    },
}

// ============================================================================
// SECTION: Assertion Failures
// ============================================================================

/// Observed behavior diverged from the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Endpoint label (`METHOD path`).
    pub endpoint: String,
    /// Human-readable expectation that failed.
    pub expectation: String,
    /// Expected value, rendered literally.
    pub expected: String,
    /// Observed value, rendered literally.
    pub actual: String,
}

impl AssertionFailure {
    /// Builds a failure for the given endpoint and expectation.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        expectation: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            expectation: expectation.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (expected {}, got {})",
            self.endpoint, self.expectation, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

// ============================================================================
// SECTION: Config Errors
// ============================================================================

/// Invalid or incomplete harness configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Environment variable is malformed.
    #[error("environment: {0}")]
    Env(String),
    /// Config file could not be read or parsed.
    #[error("config file {path}: {message}")]
    File {
        /// File path.
        path: String,
        /// Read or parse error text.
        message: String,
    },
    /// A setting failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// An admin-scoped scenario ran without credentials.
    #[error("admin credentials are not configured (set PLAN_CONTRACT_ADMIN_EMAIL and PLAN_CONTRACT_ADMIN_PASSWORD)")]
    MissingCredentials,
}

// ============================================================================
// SECTION: Aggregate Error
// ============================================================================

/// Any failure that ends a scenario.
#[derive(Debug, Clone, Error)]
pub enum ContractError {
    /// Network or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Login handshake failure.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    /// Body decoding failure.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// Contract violation.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),
    /// Configuration failure.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl ContractError {
    /// Returns a stable label for the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Auth(_) => "auth",
            Self::Decode(_) => "decode",
            Self::Assertion(_) => "assertion",
            Self::Config(_) => "config",
        }
    }

    /// Returns the assertion payload when this is a contract violation.
    #[must_use]
    pub const fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Assertion(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Result alias used by scenario steps.
pub type ContractResult<T> = Result<T, ContractError>;
