//! issh-tunnel: WebSocket session and stream relay for issh
//!
//! The connector opens one cookie-authenticated WebSocket session; the relay
//! then pipes local input to it and its messages to local output until either
//! side closes.

pub mod connector;
pub mod relay;
pub mod session;
pub mod tls;

pub use connector::{build_request, SessionConnector};
pub use relay::{chunk_reader, relay, stdin_chunks, INPUT_CHUNK_SIZE};
pub use session::{Session, SessionState};
pub use tls::CertificatePolicy;
