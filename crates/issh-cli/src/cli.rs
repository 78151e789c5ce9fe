//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "issh")]
#[command(
    author,
    version,
    about = "Interactive remote terminal tunnel over a cookie-authenticated WebSocket"
)]
#[command(after_help = "The endpoint must be the last argument. Earlier positional \
arguments are setup text and are ignored. Without an endpoint, the `domain` \
recorded in the credential file is used.")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "ISSH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to search for issh_login_data*.json (default: ~/Downloads)
    #[arg(long, env = "ISSH_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Verify the endpoint's TLS certificate (off by default)
    #[arg(long, env = "ISSH_VERIFY_CERTS")]
    pub verify_certs: bool,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "ISSH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// [SETUP ARGS...] ENDPOINT
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// WebSocket endpoint: the last positional argument
    pub fn endpoint(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// Positional arguments before the endpoint
    pub fn setup_args(&self) -> &[String] {
        match self.args.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Log filter from CLI flags, if they set one
    pub fn log_level(&self) -> Option<&str> {
        if let Some(level) = self.log_level.as_deref() {
            return Some(level);
        }
        match (self.quiet, self.verbose) {
            (true, _) => Some("error"),
            (false, 0) => None,
            (false, 1) => Some("info"),
            (false, 2) => Some("debug"),
            (false, _) => Some("trace"),
        }
    }
}
