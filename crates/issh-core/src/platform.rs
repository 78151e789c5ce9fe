//! Platform detection and download directory resolution

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::error::DiscoveryError;

/// Operating system family, as far as download locations are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Other,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// Environment variable holding the user's profile directory
    pub fn home_var(self) -> &'static str {
        match self {
            Platform::Windows => "USERPROFILE",
            Platform::MacOs | Platform::Other => "HOME",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// Resolve `<profile>/Downloads` for the given platform.
///
/// `env` looks up environment variables; when the platform's variable is
/// unset or empty, `fallback_home` is used instead.
pub fn resolve_download_dir<E>(
    platform: Platform,
    env: E,
    fallback_home: Option<PathBuf>,
) -> Result<PathBuf, DiscoveryError>
where
    E: Fn(&str) -> Option<OsString>,
{
    let var = platform.home_var();
    let home = env(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or(fallback_home)
        .ok_or(DiscoveryError::NoHomeDirectory(var))?;

    Ok(home.join("Downloads"))
}

/// Download directory of the current user on the current platform
pub fn default_download_dir() -> Result<PathBuf, DiscoveryError> {
    resolve_download_dir(
        Platform::current(),
        |key| std::env::var_os(key),
        dirs::home_dir(),
    )
}
