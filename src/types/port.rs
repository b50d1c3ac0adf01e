//! Port types and port-list expansion.
//!
//! `Port` accepts any unsigned integer: values above 65535 are carried
//! through to the probe, which reports them as `invalid port` instead of
//! rejecting the whole run. `PortSpec` holds the parsed tokens and expands
//! them lazily, in input order.

use super::split_list;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A port number as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u64);

impl Port {
    #[inline]
    pub const fn new(port: u64) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The socket port, or `None` when the value is out of range.
    #[inline]
    pub fn to_socket_port(self) -> Option<u16> {
        u16::try_from(self.0).ok()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Self(u64::from(port))
    }
}

/// Error type for port-list parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    ReversedRange(u64, u64),
    #[error("empty port specification")]
    Empty,
}

/// One parsed token: a single port or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::ReversedRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        ((self.end.0 - self.start.0) as usize).saturating_add(1)
    }

    /// Check if the range is empty (never true for valid ranges).
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range, ascending.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }

    fn parse_token(token: &str) -> Result<Self, PortError> {
        let parse = |s: &str| match s.trim().parse::<u64>() {
            Ok(n) => Ok(Port(n)),
            // Too wide even for u64: still a number, so let the probe reject it.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(Port(u64::MAX)),
            Err(_) => Err(PortError::InvalidFormat(token.to_string())),
        };

        match token.split_once('-') {
            Some((start, end)) => {
                if end.contains('-') {
                    return Err(PortError::InvalidFormat(token.to_string()));
                }
                Self::new(parse(start)?, parse(end)?)
            }
            None => Ok(Self::single(parse(token)?)),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A parsed port list.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Whitespace-separated: "22 80 443"
/// - Range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
///
/// Order and duplicates are preserved; every port listed twice is scanned
/// twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    ranges: Vec<PortRange>,
}

impl PortSpec {
    /// Create an empty port specification.
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Add a port range to the specification.
    pub fn add_range(&mut self, range: PortRange) {
        self.ranges.push(range);
    }

    /// The parsed tokens, in input order.
    pub fn ranges(&self) -> &[PortRange] {
        &self.ranges
    }

    /// Total number of ports the expansion yields, duplicates included.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(PortRange::len).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over every port without consuming the spec.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ranges.iter().flat_map(PortRange::iter)
    }

    /// Collect the expansion into a vector.
    pub fn to_ports(&self) -> Vec<Port> {
        self.iter().collect()
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spec = Self::new();

        for token in split_list(s) {
            let token = token.trim();
            if token.is_empty() {
                return Err(PortError::InvalidFormat(token.to_string()));
            }
            spec.add_range(PortRange::parse_token(token)?);
        }

        if spec.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(spec)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Lazy expansion of a [`PortSpec`]. Yields each port once; not restartable.
pub struct PortIter {
    ranges: std::vec::IntoIter<PortRange>,
    current: Option<RangeInclusive<u64>>,
}

impl Iterator for PortIter {
    type Item = Port;

    fn next(&mut self) -> Option<Port> {
        loop {
            if let Some(port) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Port(port));
            }
            let range = self.ranges.next()?;
            self.current = Some(range.start.0..=range.end.0);
        }
    }
}

impl IntoIterator for PortSpec {
    type Item = Port;
    type IntoIter = PortIter;

    fn into_iter(self) -> PortIter {
        PortIter {
            ranges: self.ranges.into_iter(),
            current: None,
        }
    }
}
