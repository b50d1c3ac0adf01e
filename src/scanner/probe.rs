//! TCP connect probe.
//!
//! Performs one connection attempt per (host, port) using the operating
//! system's socket API and turns the outcome into a [`ScanResult`]. Nothing
//! escapes a probe: every failure becomes a closed result with a reason.

use crate::scanner::traits::{Prober, Reason, ScanResult, DEFAULT_TIMEOUT};
use crate::services;
use crate::types::{Host, Port};
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Why a connection attempt did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Io(#[from] io::Error),

    #[error("port {0} is out of range")]
    InvalidPort(u64),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<&ProbeError> for Reason {
    fn from(error: &ProbeError) -> Self {
        match error {
            ProbeError::Timeout => Reason::Timeout,
            ProbeError::Io(e) => match e.kind() {
                // Malformed input rather than a network condition.
                io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => Reason::Unexpected,
                _ => Reason::Refused,
            },
            ProbeError::InvalidPort(_) => Reason::InvalidPort,
            ProbeError::Unexpected(_) => Reason::Unexpected,
        }
    }
}

/// TCP connect prober.
///
/// Does not require elevated privileges. A port counts as open only when
/// the full handshake completes within the timeout.
#[derive(Debug, Clone)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Attempt to connect to `host:port`.
    async fn attempt_connect(&self, host: &Host, port: Port) -> Result<TcpStream, ProbeError> {
        let socket_port = port
            .to_socket_port()
            .ok_or(ProbeError::InvalidPort(port.as_u64()))?;

        match timeout(self.timeout, TcpStream::connect((host.as_str(), socket_port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProbeError::Io(e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &Host, port: Port) -> ScanResult {
        let service = services::service_name(port);

        let reason = match self.attempt_connect(host, port).await {
            Ok(stream) => {
                trace!(%host, %port, "connected");
                drop(stream);
                Reason::SynAck
            }
            Err(e) => {
                let reason = Reason::from(&e);
                debug!(%host, %port, error = %e, %reason, "probe closed");
                reason
            }
        };

        ScanResult::new(host.clone(), port, reason, service)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
