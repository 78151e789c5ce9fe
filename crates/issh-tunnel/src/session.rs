//! The single relay session of an issh invocation

use std::fmt;
use std::io;

use bytes::Bytes;
use futures::Stream;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use issh_core::error::SessionError;

use crate::relay::relay;

/// WebSocket stream produced by the connector
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake in progress
    Connecting,
    /// Handshake done, ready to relay
    Open,
    /// Ended by local end-of-input
    Closed,
    /// Ended by remote closure or a transport/local I/O error
    Errored,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Connecting => "connecting",
            SessionState::Open => "open",
            SessionState::Closed => "closed",
            SessionState::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// An open session to one endpoint.
///
/// A session relays exactly once; there is no reconnect.
pub struct Session {
    endpoint: String,
    state: SessionState,
    stream: Option<WsStream>,
}

impl Session {
    pub(crate) fn open(endpoint: &str, stream: WsStream) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            state: SessionState::Open,
            stream: Some(stream),
        }
    }

    /// Endpoint URL this session is connected to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Relay `input` to the endpoint and endpoint messages to `output`.
    ///
    /// Ends cleanly when `input` is exhausted. Remote closure and transport
    /// errors are returned as [`SessionError`].
    pub async fn relay<I, O>(&mut self, input: I, output: &mut O) -> Result<(), SessionError>
    where
        I: Stream<Item = io::Result<Bytes>> + Unpin,
        O: AsyncWrite + Unpin,
    {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                return Err(SessionError::RemoteClosed {
                    reason: Some(format!("session already {}", self.state)),
                })
            }
        };

        tracing::debug!("Relaying over {}", self.endpoint);
        let result = relay(stream, input, output).await;

        self.state = match &result {
            Ok(()) => SessionState::Closed,
            Err(_) => SessionState::Errored,
        };
        tracing::info!("Session to {} {}", self.endpoint, self.state);

        result
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state)
            .finish()
    }
}
