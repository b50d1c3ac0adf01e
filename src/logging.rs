//! Diagnostic logging setup.
//!
//! Logs go to stderr through `tracing-subscriber`, so they never interleave
//! with the result table on stdout. `RUST_LOG` takes precedence over both
//! `-v` and the settings file.

use crate::error::{ConfigError, ConfigResult};
use tracing_subscriber::EnvFilter;

/// Pick the filter directive: each `-v` overrides the configured level.
pub fn directive(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(configured: &str, verbose: u8) -> ConfigResult<()> {
    let directive = directive(configured, verbose);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive)
            .map_err(|_| ConfigError::InvalidLogLevel(directive.to_string()))?,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive() {
        assert_eq!(directive("warn", 0), "warn");
        assert_eq!(directive("skitter=debug", 0), "skitter=debug");
        assert_eq!(directive("warn", 1), "info");
        assert_eq!(directive("error", 2), "debug");
        assert_eq!(directive("warn", 5), "trace");
    }
}
