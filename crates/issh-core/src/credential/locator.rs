//! Locates the most recent cached login credential

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::DiscoveryError;

/// A credential file found in the download directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFile {
    /// File name, e.g. `issh_login_data (2).json`
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Last modification time
    pub modified: SystemTime,
}

/// Scans one directory for `<prefix>*.json` files
#[derive(Debug, Clone)]
pub struct CredentialLocator {
    dir: PathBuf,
    prefix: String,
}

impl CredentialLocator {
    /// Create a locator for `dir` matching `<prefix>*.json`
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Directory being scanned
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pattern for messages
    pub fn pattern(&self) -> String {
        format!("{}*.json", self.prefix)
    }

    /// Whether a file name matches `<prefix>*.json`
    pub fn matches(&self, name: &str) -> bool {
        name.len() >= self.prefix.len() + ".json".len()
            && name.starts_with(&self.prefix)
            && name.ends_with(".json")
    }

    /// All matching files, newest first.
    ///
    /// The sort is stable, so files with identical timestamps keep their
    /// directory listing order.
    pub fn scan(&self) -> Result<Vec<CredentialFile>, DiscoveryError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| DiscoveryError::DirectoryUnreadable {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {}", self.dir, e);
                    continue;
                }
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if !self.matches(&name) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", name, e);
                    continue;
                }
            };
            if metadata.is_dir() {
                continue;
            }
            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(e) => {
                    tracing::debug!("Skipping {}: no modification time: {}", name, e);
                    continue;
                }
            };

            files.push(CredentialFile {
                path: entry.path(),
                name,
                modified,
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// The most recently modified matching file
    pub fn locate(&self) -> Result<CredentialFile, DiscoveryError> {
        let files = self.scan()?;
        tracing::debug!(
            "Found {} credential file(s) in {:?}",
            files.len(),
            self.dir
        );

        files
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::NoCredential {
                dir: self.dir.clone(),
                pattern: self.pattern(),
            })
    }
}
