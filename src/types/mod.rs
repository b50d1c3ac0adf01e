//! Core type definitions for scan input.
//!
//! Hosts and ports are parsed once at startup; parse failures here are the
//! only configuration errors a scan can raise.

mod port;
mod target;

pub use port::{Port, PortError, PortIter, PortRange, PortSpec};
pub use target::{Host, TargetError, TargetSpec};

/// Split a list on commas if the input contains one, otherwise on runs of
/// whitespace. The two strategies never mix: with commas, whitespace inside a
/// token is left alone.
pub(crate) fn split_list(input: &str) -> Vec<&str> {
    if input.contains(',') {
        input.split(',').collect()
    } else {
        input.split_whitespace().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefers_comma() {
        assert_eq!(split_list("a b,c"), vec!["a b", "c"]);
    }

    #[test]
    fn test_split_falls_back_to_whitespace() {
        assert_eq!(split_list(" a  b\tc "), vec!["a", "b", "c"]);
        assert!(split_list("   ").is_empty());
    }
}
