//! issh: interactive remote terminal tunnel client
//!
//! Finds the newest cached login credential, opens a cookie-authenticated
//! WebSocket session to the given endpoint and relays stdin/stdout over it.

pub mod cli;
pub mod output;
pub mod run;

pub use cli::Cli;
pub use run::{run, Invocation};
