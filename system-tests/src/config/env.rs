// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: plan-contract-core
// ============================================================================

//! ## Overview
//! Values are read with the same strict rules as the harness itself: invalid
//! UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use plan_contract_core::ConfigError;
use plan_contract_core::config::parse_timeout_seconds;
use plan_contract_core::config::read_env_strict;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Request timeout used against the in-process stub.
pub const DEFAULT_STUB_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional artifact root override.
    RunRoot,
    /// Optional request timeout against the stub, in seconds.
    TimeoutSeconds,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "PLAN_CONTRACT_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutSeconds => "PLAN_CONTRACT_SYSTEM_TEST_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Optional artifact root override.
    pub run_root: Option<PathBuf>,
    /// Request timeout against the stub.
    pub stub_timeout: Duration,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            run_root: None,
            stub_timeout: DEFAULT_STUB_TIMEOUT,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is empty,
    /// or is not a positive timeout.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_values(
            read_env_strict(SystemTestEnv::RunRoot.as_str())?,
            read_env_strict(SystemTestEnv::TimeoutSeconds.as_str())?,
        )
    }

    /// Builds configuration from raw values as read from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is blank or the timeout is
    /// not a positive number of seconds.
    pub fn from_values(
        run_root: Option<String>,
        timeout_seconds: Option<String>,
    ) -> Result<Self, ConfigError> {
        let run_root = nonempty(SystemTestEnv::RunRoot, run_root)?.map(PathBuf::from);
        let stub_timeout = nonempty(SystemTestEnv::TimeoutSeconds, timeout_seconds)?
            .map(|raw| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &raw))
            .transpose()?
            .unwrap_or(DEFAULT_STUB_TIMEOUT);
        Ok(Self {
            run_root,
            stub_timeout,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects blank values.
fn nonempty(key: SystemTestEnv, value: Option<String>) -> Result<Option<String>, ConfigError> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{} must not be empty", key.as_str())))
        }
        other => Ok(other),
    }
}
