//! Session connector
//!
//! Opens the one WebSocket session this process relays over. There is no
//! retry: any failure is returned to the caller, which exits.

use std::sync::Arc;

use rustls::ClientConfig;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::tungstenite::http::{HeaderValue, Uri};
use tokio_tungstenite::Connector;

use issh_core::error::ConnectionError;
use issh_core::SessionCookie;

use crate::session::{Session, SessionState};
use crate::tls::{client_config, CertificatePolicy};

/// Establishes the authenticated WebSocket session
pub struct SessionConnector {
    /// Certificate policy the TLS config was built with
    policy: CertificatePolicy,
    /// Shared rustls config for wss:// endpoints
    tls: Arc<ClientConfig>,
}

impl SessionConnector {
    /// Create a connector with the given certificate policy
    pub fn new(policy: CertificatePolicy) -> Result<Self, ConnectionError> {
        if policy == CertificatePolicy::AcceptAny {
            tracing::warn!(
                "TLS certificate verification is disabled; use --verify-certs for endpoints with a valid chain"
            );
        }

        Ok(Self {
            policy,
            tls: client_config(policy)?,
        })
    }

    /// Certificate policy in effect
    pub fn policy(&self) -> CertificatePolicy {
        self.policy
    }

    /// Open a session to `endpoint`, authenticating with `cookie`
    pub async fn connect(
        &self,
        endpoint: &str,
        cookie: &SessionCookie,
    ) -> Result<Session, ConnectionError> {
        let request = build_request(endpoint, cookie)?;

        tracing::debug!("Session to {} {}", endpoint, SessionState::Connecting);
        let (stream, response) = tokio_tungstenite::connect_async_tls_with_config(
            request,
            None,
            true,
            Some(Connector::Rustls(Arc::clone(&self.tls))),
        )
        .await
        .map_err(|e| ConnectionError::Handshake {
            endpoint: endpoint.to_string(),
            source: Box::new(e),
        })?;

        tracing::info!(
            "Connected to {} (HTTP {})",
            endpoint,
            response.status().as_u16()
        );
        Ok(Session::open(endpoint, stream))
    }
}

/// Build the upgrade request: validate the endpoint and attach the cookie
pub fn build_request(endpoint: &str, cookie: &SessionCookie) -> Result<Request, ConnectionError> {
    let invalid = |reason: String| ConnectionError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let uri: Uri = endpoint.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    match uri.scheme_str() {
        Some("ws") | Some("wss") => {}
        Some(other) => return Err(invalid(format!("unsupported scheme '{}'", other))),
        None => return Err(invalid("missing ws:// or wss:// scheme".to_string())),
    }
    if uri.host().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    let mut request = uri
        .into_client_request()
        .map_err(|e| invalid(e.to_string()))?;

    let value = HeaderValue::from_str(cookie.expose()).map_err(|_| ConnectionError::InvalidCookie)?;
    request.headers_mut().insert(COOKIE, value);

    Ok(request)
}
