// crates/plan-contract-core/src/config/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for the contract harness.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Target origin, e.g. `http://localhost:3000`.
    BaseUrl,
    /// Request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Admin login email.
    AdminEmail,
    /// Admin login password.
    AdminPassword,
    /// Comma-separated session cookie name prefixes.
    SessionCookies,
    /// Artifact directory override.
    RunRoot,
    /// Path to a TOML config file.
    ConfigPath,
}

impl HarnessEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 7] = [
        Self::BaseUrl,
        Self::TimeoutSeconds,
        Self::AdminEmail,
        Self::AdminPassword,
        Self::SessionCookies,
        Self::RunRoot,
        Self::ConfigPath,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PLAN_CONTRACT_BASE_URL",
            Self::TimeoutSeconds => "PLAN_CONTRACT_TIMEOUT_SEC",
            Self::AdminEmail => "PLAN_CONTRACT_ADMIN_EMAIL",
            Self::AdminPassword => "PLAN_CONTRACT_ADMIN_PASSWORD",
            Self::SessionCookies => "PLAN_CONTRACT_SESSION_COOKIES",
            Self::RunRoot => "PLAN_CONTRACT_RUN_ROOT",
            Self::ConfigPath => "PLAN_CONTRACT_CONFIG",
        }
    }
}

// ============================================================================
// SECTION: Override Types
// ============================================================================

/// Typed overrides read from environment variables.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Target origin override.
    pub base_url: Option<String>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
    /// Admin email override.
    pub admin_email: Option<String>,
    /// Admin password override.
    pub admin_password: Option<String>,
    /// Session cookie prefix override.
    pub session_cookie_prefixes: Option<Vec<String>>,
    /// Artifact directory override.
    pub run_root: Option<PathBuf>,
    /// Config file path.
    pub config_path: Option<PathBuf>,
}

impl std::fmt::Debug for EnvOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvOverrides")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("session_cookie_prefixes", &self.session_cookie_prefixes)
            .field("run_root", &self.run_root)
            .field("config_path", &self.config_path)
            .finish()
    }
}

impl EnvOverrides {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is empty,
    /// or fails validation (for example, a zero timeout).
    pub fn load() -> Result<Self, ConfigError> {
        let base_url = read_env_nonempty(HarnessEnv::BaseUrl.as_str())?;
        let timeout = read_env_nonempty(HarnessEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(HarnessEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let admin_email = read_env_nonempty(HarnessEnv::AdminEmail.as_str())?;
        let admin_password = read_env_nonempty(HarnessEnv::AdminPassword.as_str())?;
        let session_cookie_prefixes = read_env_nonempty(HarnessEnv::SessionCookies.as_str())?
            .map(|value| parse_name_list(HarnessEnv::SessionCookies.as_str(), &value))
            .transpose()?;
        let run_root = read_env_nonempty(HarnessEnv::RunRoot.as_str())?.map(PathBuf::from);
        let config_path = read_env_nonempty(HarnessEnv::ConfigPath.as_str())?.map(PathBuf::from);
        Ok(Self {
            base_url,
            timeout,
            admin_email,
            admin_password,
            session_cookie_prefixes,
            run_root,
            config_path,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value in whole seconds.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
pub fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Env(format!(
            "{name} must be a positive integer number of seconds"
        )));
    }
    let secs: u64 = trimmed.parse().map_err(|_| {
        ConfigError::Env(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::Env(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a comma-separated list of non-empty names.
fn parse_name_list(name: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut names = Vec::new();
    for entry in raw.split(',') {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Env(format!("{name} contains an empty entry")));
        }
        names.push(trimmed.to_string());
    }
    Ok(names)
}
