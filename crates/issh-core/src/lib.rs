//! issh-core: Credential discovery, configuration and errors for issh
//!
//! This crate finds the cached login credential written by the external
//! login flow and loads the client configuration. The tunnel itself lives
//! in `issh-tunnel`.

pub mod config;
pub mod credential;
pub mod error;
pub mod platform;

pub use config::IsshConfig;
pub use credential::{CredentialBundle, CredentialFile, CredentialLocator, SessionCookie};
pub use error::IsshError;
pub use platform::Platform;
