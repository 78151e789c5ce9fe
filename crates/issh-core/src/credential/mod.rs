//! Cached login credential discovery and parsing

mod bundle;
mod locator;

pub use bundle::{CredentialBundle, SessionCookie};
pub use locator::{CredentialFile, CredentialLocator};

/// Default credential file name prefix
pub const DEFAULT_CREDENTIAL_PREFIX: &str = "issh_login_data";
