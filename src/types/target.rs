//! Target host parsing.
//!
//! Hosts are opaque strings: hostnames and IP literals are not resolved or
//! validated here. A host that cannot be resolved shows up later as a
//! `connection refused` result, not as a startup error.

use super::split_list;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single host identifier (hostname or IP literal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(String);

impl Host {
    /// Create a host, rejecting only the empty string.
    pub fn new(host: impl Into<String>) -> Result<Self, TargetError> {
        let host = host.into();
        if host.is_empty() {
            return Err(TargetError::EmptyHost);
        }
        Ok(Self(host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("no target hosts given")]
    Empty,
    #[error("empty host in target list")]
    EmptyHost,
}

/// An ordered list of hosts to scan.
///
/// Supports:
/// - Single host: "192.168.1.1"
/// - Comma-separated: "10.0.0.1,example.com"
/// - Whitespace-separated: "10.0.0.1 example.com"
///
/// Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    hosts: Vec<Host>,
}

impl TargetSpec {
    /// Parse a target list from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let hosts = split_list(s)
            .into_iter()
            .map(Host::new)
            .collect::<Result<Vec<_>, _>>()?;

        if hosts.is_empty() {
            return Err(TargetError::Empty);
        }

        Ok(Self { hosts })
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Never true for a parsed spec.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn into_hosts(self) -> Vec<Host> {
        self.hosts
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.hosts.iter().map(Host::as_str).collect();
        write!(f, "{}", parts.join(","))
    }
}
