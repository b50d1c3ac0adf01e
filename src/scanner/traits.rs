//! Scan result types and the prober abstraction.
//!
//! Defines a common interface for connection probes so the orchestrator can
//! be driven by something other than real sockets in tests.

use crate::types::{Host, Port};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default per-attempt connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300);

/// State of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// A connection was established.
    Open,
    /// Anything else: refused, timed out, unreachable or invalid.
    Closed,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Why a port ended up in its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "syn/ack")]
    SynAck,
    #[serde(rename = "connection timeout")]
    Timeout,
    #[serde(rename = "connection refused")]
    Refused,
    #[serde(rename = "invalid port")]
    InvalidPort,
    #[serde(rename = "unexpected error")]
    Unexpected,
}

impl Reason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SynAck => "syn/ack",
            Self::Timeout => "connection timeout",
            Self::Refused => "connection refused",
            Self::InvalidPort => "invalid port",
            Self::Unexpected => "unexpected error",
        }
    }

    /// The port state this reason implies.
    pub const fn state(self) -> PortState {
        match self {
            Self::SynAck => PortState::Open,
            _ => PortState::Closed,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one probe. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub host: Host,
    pub port: Port,
    pub state: PortState,
    pub reason: Reason,
    pub service: String,
}

impl ScanResult {
    /// Build a result; the state follows from the reason.
    pub fn new(host: Host, port: Port, reason: Reason, service: impl Into<String>) -> Self {
        Self {
            host,
            port,
            state: reason.state(),
            reason,
            service: service.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// A single bounded-time connection attempt.
///
/// Implementations must always return a result: every failure is
/// classified into a [`Reason`], never raised.
///
/// # Example
///
/// ```ignore
/// use skitter::scanner::{Prober, TcpProber};
///
/// let prober = TcpProber::default();
/// let result = prober.probe(&host, port).await;
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one (host, port) pair.
    async fn probe(&self, host: &Host, port: Port) -> ScanResult;

    /// The per-attempt timeout.
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_state_display() {
        assert_eq!(PortState::Open.to_string(), "open");
        assert_eq!(PortState::Closed.to_string(), "closed");
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(Reason::SynAck.to_string(), "syn/ack");
        assert_eq!(Reason::Timeout.to_string(), "connection timeout");
        assert_eq!(Reason::Refused.to_string(), "connection refused");
        assert_eq!(Reason::InvalidPort.to_string(), "invalid port");
        assert_eq!(Reason::Unexpected.to_string(), "unexpected error");
    }

    #[test]
    fn test_state_follows_reason() {
        let host = Host::new("localhost").unwrap();
        let open = ScanResult::new(host.clone(), Port::new(22), Reason::SynAck, "ssh");
        assert!(open.is_open());

        for reason in [Reason::Timeout, Reason::Refused, Reason::InvalidPort, Reason::Unexpected] {
            let closed = ScanResult::new(host.clone(), Port::new(22), reason, "ssh");
            assert_eq!(closed.state, PortState::Closed);
        }
    }

    #[test]
    fn test_reason_serializes_as_text() {
        let json = serde_json::to_string(&Reason::Refused).unwrap();
        assert_eq!(json, "\"connection refused\"");
    }
}
