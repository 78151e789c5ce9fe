//! Credential bundle parsing

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::CredentialError;

/// Session cookie from the login flow.
///
/// `Debug` is redacted; use [`SessionCookie::expose`] to get the value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SessionCookie(String);

impl SessionCookie {
    /// Create a cookie from a raw string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw cookie value, exactly as written by the login flow
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionCookie(<{} bytes>)", self.0.len())
    }
}

/// JSON credential bundle written by the login flow.
///
/// Only `cookie` is required. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialBundle {
    /// Value sent in the `Cookie` header
    pub cookie: SessionCookie,

    /// Endpoint recorded by the login flow, if any
    #[serde(default)]
    pub domain: Option<String>,
}

impl CredentialBundle {
    /// Read and parse the bundle at `path`
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path).map_err(|e| CredentialError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!("Read {} bytes from {}", content.len(), path.display());

        Self::parse(path, &content)
    }

    /// Parse bundle JSON; `path` is only used for error context
    pub fn parse(path: &Path, content: &str) -> Result<Self, CredentialError> {
        let bundle: CredentialBundle =
            serde_json::from_str(content).map_err(|e| CredentialError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if bundle.cookie.is_empty() {
            return Err(CredentialError::EmptyCookie {
                path: path.to_path_buf(),
            });
        }

        Ok(bundle)
    }

    /// Recorded endpoint, ignoring an empty string
    pub fn endpoint(&self) -> Option<&str> {
        self.domain.as_deref().filter(|d| !d.trim().is_empty())
    }
}
