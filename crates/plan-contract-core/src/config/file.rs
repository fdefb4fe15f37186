// crates/plan-contract-core/src/config/file.rs
// ============================================================================
// Module: Harness Config File
// Description: Optional TOML file layer for harness configuration.
// Purpose: Let operators keep target and credentials out of the command line.
// Dependencies: serde, toml
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Maximum accepted config file size.
const MAX_CONFIG_FILE_BYTES: u64 = 64 * 1024;

/// TOML layout of the harness config file.
///
/// ```toml
/// base_url = "http://localhost:3000"
/// timeout_sec = 30
/// session_cookie_prefixes = ["next-auth.session-token"]
///
/// [admin]
/// email = "admin@example.com"
/// password = "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Target origin.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_sec: Option<u64>,
    /// Session cookie name prefixes.
    pub session_cookie_prefixes: Option<Vec<String>>,
    /// Artifact directory.
    pub run_root: Option<PathBuf>,
    /// Admin credentials.
    pub admin: Option<AdminSection>,
}

/// `[admin]` table.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AdminSection {
    /// Admin login email.
    pub email: Option<String>,
    /// Admin login password.
    pub password: Option<String>,
}

impl std::fmt::Debug for AdminSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSection")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] when the file is unreadable, too large, or
    /// not valid TOML for this layout.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let file_error = |message: String| ConfigError::File {
            path: path.display().to_string(),
            message,
        };
        let metadata = fs::metadata(path).map_err(|err| file_error(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_BYTES {
            return Err(file_error(format!(
                "file exceeds size limit ({} > {MAX_CONFIG_FILE_BYTES})",
                metadata.len()
            )));
        }
        let raw = fs::read_to_string(path).map_err(|err| file_error(err.to_string()))?;
        Self::parse(&raw).map_err(|err| match err {
            ConfigError::Invalid(message) => file_error(message),
            other => other,
        })
    }

    /// Parses config file contents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the TOML is malformed.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}
