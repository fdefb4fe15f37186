// crates/plan-contract-core/src/auth.rs
// ============================================================================
// Module: Auth Handshake
// Description: CSRF + credentials login against the remote auth provider.
// Purpose: Produce a cookie-carrying session for admin-scoped calls.
// Dependencies: reqwest, serde_json, tracing
// ============================================================================

//! ## Overview
//! The remote application binds its anti-CSRF token to the session before it
//! accepts credentials, so both steps must run on the same [`HttpClient`] (and
//! therefore the same cookie jar):
//!
//! 1. `GET /api/auth/csrf` yields `{ "csrfToken": ... }`.
//! 2. `POST /api/auth/callback/credentials` with a form body carrying the
//!    token, the credentials, `json=true` and `redirect=false`.
//!
//! The callback may answer with a redirect instead of a body, so success is
//! judged by the cookie jar: it must hold a cookie whose name starts with one
//! of the configured session prefixes. The body's `ok`/`status` is ignored.
//!
//! Security posture: passwords, tokens, and cookie values are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use serde_json::Value;

use crate::config::AdminCredentials;
use crate::config::HarnessConfig;
use crate::error::AuthError;
use crate::error::ContractError;
use crate::http::ApiRequest;
use crate::http::HttpClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// CSRF token endpoint.
pub const CSRF_PATH: &str = "/api/auth/csrf";

/// Credentials callback endpoint.
pub const CREDENTIALS_CALLBACK_PATH: &str = "/api/auth/callback/credentials";

/// Form content type required by the callback.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// ============================================================================
// SECTION: Session
// ============================================================================

/// An authenticated admin session.
///
/// # Invariants
/// - The client's cookie jar held a session cookie when the session was built.
/// - Scoped to one scenario; never persisted.
#[derive(Clone)]
pub struct AuthSession {
    /// Client whose cookie jar carries the session.
    client: HttpClient,
    /// Token used for the credentials step.
    csrf_token: String,
    /// Cookie names present after login.
    cookie_names: Vec<String>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("base_url", &self.client.base_url().as_str())
            .field("csrf_token", &"<redacted>")
            .field("cookie_names", &self.cookie_names)
            .finish()
    }
}

impl AuthSession {
    /// Logs in with the configured admin credentials on a fresh client.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Config`] when no credentials are configured,
    /// [`ContractError::Transport`] when the client cannot be built, and
    /// [`ContractError::Auth`] when the handshake fails.
    pub async fn login(config: &HarnessConfig) -> Result<Self, ContractError> {
        let credentials = config.admin()?;
        let client = HttpClient::from_config(config)?;
        Ok(login(client, credentials, &config.session_cookie_prefixes).await?)
    }

    /// Returns the client carrying the session cookies.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Returns the CSRF token used during login.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Returns the cookie names present after login.
    #[must_use]
    pub fn cookie_names(&self) -> &[String] {
        &self.cookie_names
    }
}

// ============================================================================
// SECTION: Handshake
// ============================================================================

/// Runs the two-step handshake on `client`.
///
/// # Errors
///
/// Returns [`AuthError`] when either step fails or no session cookie results.
pub async fn login(
    client: HttpClient,
    credentials: &AdminCredentials,
    session_cookie_prefixes: &[String],
) -> Result<AuthSession, AuthError> {
    let csrf_token = fetch_csrf_token(&client).await?;

    let form = vec![
        ("csrfToken".to_string(), csrf_token.clone()),
        ("email".to_string(), credentials.email.clone()),
        ("password".to_string(), credentials.password.clone()),
        ("json".to_string(), "true".to_string()),
        ("redirect".to_string(), "false".to_string()),
    ];
    let request = ApiRequest::post(CREDENTIALS_CALLBACK_PATH)
        .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
        .form(form);
    let response = client.send(request).await?;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body: response.preview(),
        });
    }

    let cookie_names = client.cookie_names();
    if !has_session_cookie(&cookie_names, session_cookie_prefixes) {
        return Err(AuthError::NoSessionCookie {
            present: cookie_names.join(", "),
        });
    }

    tracing::info!(
        email = %credentials.email,
        callback_status = status.as_u16(),
        cookies = cookie_names.len(),
        "admin session established"
    );
    Ok(AuthSession {
        client,
        csrf_token,
        cookie_names,
    })
}

/// Fetches the CSRF token.
async fn fetch_csrf_token(client: &HttpClient) -> Result<String, AuthError> {
    let response = client.send(ApiRequest::get(CSRF_PATH)).await?;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(AuthError::CsrfStatus {
            status: status.as_u16(),
        });
    }
    let body = response.json().map_err(|err| AuthError::CsrfDecode(err.to_string()))?;
    body.get("csrfToken")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AuthError::MissingCsrfToken)
}

/// Returns true when any cookie name starts with an accepted session prefix.
#[must_use]
pub fn has_session_cookie(cookie_names: &[String], prefixes: &[String]) -> bool {
    cookie_names
        .iter()
        .any(|name| prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
