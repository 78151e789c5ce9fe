//! Core error types for issh

use std::path::PathBuf;
use thiserror::Error;

/// Underlying transport or TLS error, kept opaque so this crate stays free of
/// the WebSocket stack
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for the issh pipeline
#[derive(Error, Debug)]
pub enum IsshError {
    /// Credential discovery error
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Credential loading error
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors while locating the cached login credential
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Neither the platform variable nor the OS reports a home directory
    #[error("Unable to determine home directory (checked ${0})")]
    NoHomeDirectory(&'static str),

    /// Download directory missing or not listable
    #[error("Unable to read download directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No file matched the credential pattern
    #[error("No credential found in {dir} matching {pattern}")]
    NoCredential { dir: PathBuf, pattern: String },
}

/// Errors while loading the credential bundle
#[derive(Error, Debug)]
pub enum CredentialError {
    /// File unreadable (permissions, removed between scan and read)
    #[error("Unable to read credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not valid JSON, or missing a string `cookie`
    #[error("Unable to parse credential file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `cookie` present but empty
    #[error("Credential file {path} has an empty cookie")]
    EmptyCookie { path: PathBuf },
}

impl CredentialError {
    /// Whether this is a parse-category failure (as opposed to I/O)
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::EmptyCookie { .. })
    }
}

/// Connection-related errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No endpoint argument and no `domain` in the bundle
    #[error("No endpoint given and credential bundle has no domain")]
    NoEndpoint,

    /// Endpoint is not a ws:// or wss:// URL
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Cookie cannot be carried in an HTTP header
    #[error("Cookie is not a valid header value")]
    InvalidCookie,

    /// TLS client configuration could not be built
    #[error("TLS configuration failed: {0}")]
    Tls(String),

    /// DNS, refused connection, TLS failure or rejected upgrade
    #[error("Handshake with {endpoint} failed: {source}")]
    Handshake {
        endpoint: String,
        #[source]
        source: BoxError,
    },
}

/// Errors after the session is open
#[derive(Error, Debug)]
pub enum SessionError {
    /// Remote sent a Close frame or the stream ended
    #[error("Session closed by remote{}", close_suffix(.reason))]
    RemoteClosed { reason: Option<String> },

    /// Transport failure on an open session
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// Local stdin/stdout failure
    #[error("Local I/O error: {0}")]
    LocalIo(#[from] std::io::Error),
}

fn close_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) if !r.is_empty() => format!(": {}", r),
        _ => String::new(),
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
