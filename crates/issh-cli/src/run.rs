//! The issh pipeline: locate credential, parse it, connect, relay

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use issh_core::error::{ConnectionError, IsshError, SessionError};
use issh_core::{platform, CredentialBundle, CredentialFile, CredentialLocator, IsshConfig};
use issh_tunnel::{stdin_chunks, CertificatePolicy, SessionConnector};

use crate::cli::Cli;
use crate::output::{print_info, print_warning};

/// Everything one invocation needs, resolved from CLI and config
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Directory scanned for credential files
    pub download_dir: PathBuf,
    /// Credential file name prefix
    pub credential_prefix: String,
    /// TLS certificate policy
    pub policy: CertificatePolicy,
    /// Endpoint from the command line, if any
    pub endpoint: Option<String>,
    /// Print operator status lines to stderr
    pub announce: bool,
}

impl Invocation {
    /// Merge CLI flags over the config file. CLI wins.
    pub fn resolve(cli: &Cli, config: &IsshConfig) -> Result<Self, IsshError> {
        let download_dir = match cli.download_dir.clone().or_else(|| config.download_dir.clone()) {
            Some(dir) => dir,
            None => platform::default_download_dir()?,
        };

        if !cli.setup_args().is_empty() {
            tracing::debug!("Ignoring setup arguments: {:?}", cli.setup_args());
        }

        Ok(Self {
            download_dir,
            credential_prefix: config.credential_prefix.clone(),
            policy: CertificatePolicy::from_verify_flag(
                cli.verify_certs || config.verify_certificates,
            ),
            endpoint: cli.endpoint().map(str::to_string),
            announce: !cli.quiet,
        })
    }
}

/// Find and parse the newest credential bundle
pub fn load_credential(
    download_dir: &Path,
    prefix: &str,
) -> Result<(CredentialFile, CredentialBundle), IsshError> {
    let locator = CredentialLocator::new(download_dir, prefix);
    tracing::debug!(
        "Scanning {} for {}",
        locator.dir().display(),
        locator.pattern()
    );
    let file = locator.locate()?;
    tracing::debug!("Using credential file {}", file.path.display());

    let bundle = CredentialBundle::load(&file.path)?;
    Ok((file, bundle))
}

/// Endpoint argument, else the bundle's recorded domain
pub fn resolve_endpoint(
    argument: Option<&str>,
    bundle: &CredentialBundle,
) -> Result<(String, bool), ConnectionError> {
    match argument {
        Some(endpoint) => Ok((endpoint.to_string(), false)),
        None => bundle
            .endpoint()
            .map(|domain| (domain.to_string(), true))
            .ok_or(ConnectionError::NoEndpoint),
    }
}

/// Run one session. Returns when stdin ends (Ok) or on the first error.
pub async fn run(invocation: Invocation) -> Result<(), IsshError> {
    let (file, bundle) = load_credential(&invocation.download_dir, &invocation.credential_prefix)?;

    let (endpoint, from_bundle) = resolve_endpoint(invocation.endpoint.as_deref(), &bundle)?;
    if from_bundle && invocation.announce {
        print_warning(&format!(
            "No endpoint given, using domain {} from {}",
            endpoint, file.name
        ));
    }

    let connector = SessionConnector::new(invocation.policy)?;
    tracing::debug!("Certificate policy: {:?}", connector.policy());
    let mut session = connector.connect(&endpoint, &bundle.cookie).await?;

    if invocation.announce && std::io::stdin().is_terminal() {
        print_info(&format!(
            "Connected to {}. Press Ctrl-D to end the session.",
            endpoint
        ));
    }

    let input = stdin_chunks().map_err(SessionError::LocalIo)?;
    let mut stdout = tokio::io::stdout();
    session.relay(input, &mut stdout).await?;

    Ok(())
}
