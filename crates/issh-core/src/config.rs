//! Configuration management for issh

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::credential::DEFAULT_CREDENTIAL_PREFIX;
use crate::error::ConfigError;

/// Client configuration
///
/// Every field has a default, so a missing or partial config file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsshConfig {
    /// Directory scanned for credential files.
    ///
    /// `None` means the platform download directory
    /// (`%USERPROFILE%\Downloads` on Windows, `$HOME/Downloads` elsewhere).
    pub download_dir: Option<PathBuf>,

    /// File name prefix of credential files; the suffix is always `.json`
    pub credential_prefix: String,

    /// Verify the endpoint's TLS certificate chain.
    ///
    /// **Security trade-off**: defaults to `false` because the login endpoints
    /// this tool talks to commonly present self-signed certificates. With
    /// verification off, anyone able to intercept the connection can read the
    /// session cookie. Turn it on whenever the endpoint has a valid chain.
    pub verify_certificates: bool,

    /// Log level used when neither `RUST_LOG` nor the CLI sets one
    pub log_level: Option<String>,
}

impl Default for IsshConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            credential_prefix: DEFAULT_CREDENTIAL_PREFIX.to_string(),
            verify_certificates: false,
            log_level: None,
        }
    }
}

impl IsshConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.credential_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "credential_prefix must not be empty".to_string(),
            ));
        }
        if self
            .credential_prefix
            .contains(|c| c == '/' || c == '\\')
        {
            return Err(ConfigError::Invalid(format!(
                "credential_prefix must be a file name, got {:?}",
                self.credential_prefix
            )));
        }
        Ok(())
    }
}

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("issh")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<IsshConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: IsshConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path`, or the default path when `None`.
///
/// An explicitly named file must exist; a missing default file yields
/// [`IsshConfig::default`].
pub fn load_or_default(path: Option<&Path>) -> Result<IsshConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                load_config(&default_path)
            } else {
                tracing::debug!("No config at {:?}, using defaults", default_path);
                Ok(IsshConfig::default())
            }
        }
    }
}
