// crates/plan-contract-core/src/config/mod.rs
// ============================================================================
// Module: Harness Configuration
// Description: Layered configuration for the strategic-plan contract harness.
// Purpose: Externalize the target origin, timeout, and admin credentials.
// Dependencies: toml, url
// ============================================================================

//! ## Overview
//! Configuration is resolved from three layers, later layers winning:
//! built-in defaults, an optional TOML file, then environment variables.
//! Callers (the CLI) may apply a final round of explicit overrides through the
//! `with_*` methods.
//!
//! Credentials are never given literal defaults and are redacted from `Debug`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::EnvOverrides;
pub use env::HarnessEnv;
pub use env::parse_timeout_seconds;
pub use env::read_env_strict;
pub use file::AdminSection;
pub use file::ConfigFile;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default target origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Session cookie names issued by NextAuth/Auth.js credential logins.
pub const DEFAULT_SESSION_COOKIE_PREFIXES: [&str; 4] = [
    "next-auth.session-token",
    "__Secure-next-auth.session-token",
    "authjs.session-token",
    "__Secure-authjs.session-token",
];

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Admin login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    /// Login email.
    pub email: String,
    /// Login password.
    pub password: String,
}

impl AdminCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolved harness configuration.
///
/// # Invariants
/// - `base_url` uses the `http` or `https` scheme and has a host.
/// - `timeout` is non-zero.
/// - `session_cookie_prefixes` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Target origin; API paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Admin credentials, required only by admin-scoped scenarios.
    pub admin: Option<AdminCredentials>,
    /// Cookie name prefixes accepted as evidence of a login session.
    pub session_cookie_prefixes: Vec<String>,
    /// Artifact directory; a timestamped default is used when absent.
    pub run_root: Option<PathBuf>,
}

impl HarnessConfig {
    /// Creates a configuration for the given origin with default settings.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            admin: None,
            session_cookie_prefixes: DEFAULT_SESSION_COOKIE_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
            run_root: None,
        }
    }

    /// Loads configuration from the optional file and the environment.
    ///
    /// `config_path` takes precedence over `PLAN_CONTRACT_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any layer is malformed or the resolved
    /// configuration fails validation.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = EnvOverrides::load()?;
        let path = config_path.map(Path::to_path_buf).or_else(|| env.config_path.clone());
        let file = match path {
            Some(path) => ConfigFile::read(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, env)
    }

    /// Merges a parsed config file with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the merged values fail validation.
    pub fn resolve(file: ConfigFile, env: EnvOverrides) -> Result<Self, ConfigError> {
        let raw_base = env.base_url.or(file.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base)?;
        let mut config = Self::new(base_url);

        if let Some(secs) = file.timeout_sec {
            config.timeout = timeout_from_secs(secs)?;
        }
        if let Some(timeout) = env.timeout {
            config.timeout = timeout;
        }

        if let Some(prefixes) = env.session_cookie_prefixes.or(file.session_cookie_prefixes) {
            config.session_cookie_prefixes = prefixes;
        }

        config.run_root = env.run_root.or(file.run_root);

        let (file_email, file_password) = file
            .admin
            .map(|admin| (admin.email, admin.password))
            .unwrap_or_default();
        let email = env.admin_email.or(file_email);
        let password = env.admin_password.or(file_password);
        config.admin = match (email, password) {
            (Some(email), Some(password)) => Some(AdminCredentials::new(email, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Invalid("admin email set without a password".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid("admin password set without an email".to_string()));
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Replaces the target origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the URL is not an http(s) origin.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// Replaces the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the admin credentials.
    #[must_use]
    pub fn with_admin(mut self, admin: AdminCredentials) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Replaces the artifact directory.
    #[must_use]
    pub fn with_run_root(mut self, run_root: PathBuf) -> Self {
        self.run_root = Some(run_root);
        self
    }

    /// Returns the admin credentials or a config error when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when no credentials are set.
    pub fn admin(&self) -> Result<&AdminCredentials, ConfigError> {
        self.admin.as_ref().ok_or(ConfigError::MissingCredentials)
    }

    /// Checks the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an invariant does not hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_base_url(&self.base_url)?;
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        if self.session_cookie_prefixes.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one session cookie prefix is required".to_string(),
            ));
        }
        if self.session_cookie_prefixes.iter().any(|prefix| prefix.trim().is_empty()) {
            return Err(ConfigError::Invalid("session cookie prefixes must not be empty".to_string()));
        }
        if let Some(admin) = &self.admin
            && (admin.email.trim().is_empty() || admin.password.is_empty())
        {
            return Err(ConfigError::Invalid("admin credentials must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and checks a target origin.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ConfigError::Invalid(format!("base url {raw:?}: {err}")))?;
    check_base_url(&url)?;
    Ok(url)
}

/// Rejects non-http(s) URLs, URLs without a host, and URLs with query or fragment.
fn check_base_url(url: &Url) -> Result<(), ConfigError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "base url must use http or https, got {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("base url must include a host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(
            "base url must not carry a query or fragment".to_string(),
        ));
    }
    Ok(())
}

/// Converts whole seconds to a non-zero timeout.
fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid("timeout_sec must be greater than zero".to_string()));
    }
    Ok(Duration::from_secs(secs))
}
