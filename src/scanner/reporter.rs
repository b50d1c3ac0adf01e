//! Streaming result reporter.
//!
//! Pulls results off the channel one at a time, in arrival order, and writes
//! each as a fixed-width table row as soon as it arrives. Rows are never
//! reordered or batched.

use crate::scanner::channel::ResultReceiver;
use crate::scanner::traits::{PortState, ScanResult};
use std::borrow::Cow;
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Column width for host, state and service.
const NARROW: usize = 15;
/// Column width for the reason.
const WIDE: usize = 20;

/// Counters kept while reporting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportStats {
    /// Items pulled off the channel and marked done.
    pub processed: usize,
    /// Rows actually written.
    pub emitted: usize,
    pub open: usize,
    pub closed: usize,
}

/// Writes scan results to a sink as they arrive.
pub struct Reporter<W> {
    sink: W,
    show_open_only: bool,
    stats: ReportStats,
    sink_failed: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W, show_open_only: bool) -> Self {
        Self {
            sink,
            show_open_only,
            stats: ReportStats::default(),
            sink_failed: false,
        }
    }

    /// Report until `cancel` fires or every sender is gone.
    ///
    /// Every received item is marked done, whether it was written or
    /// filtered out. Returns the final counters and the sink.
    pub async fn run(
        mut self,
        mut rx: ResultReceiver,
        cancel: CancellationToken,
    ) -> (ReportStats, W) {
        self.write_line(&header_row());

        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = rx.recv() => match next {
                    Some(result) => result,
                    None => break,
                },
            };

            self.handle(&result);

            if let Err(e) = rx.task_done() {
                warn!(error = %e, "result channel out of sync");
            }
        }

        (self.stats, self.sink)
    }

    fn handle(&mut self, result: &ScanResult) {
        self.stats.processed += 1;
        match result.state {
            PortState::Open => self.stats.open += 1,
            PortState::Closed => self.stats.closed += 1,
        }

        if self.show_open_only && !result.is_open() {
            return;
        }

        if self.write_line(&format_row(result)) {
            self.stats.emitted += 1;
        }
    }

    /// Write and flush one line. Logs the first failure only.
    fn write_line(&mut self, line: &str) -> bool {
        let written = writeln!(self.sink, "{line}").and_then(|()| self.sink.flush());

        match written {
            Ok(()) => true,
            Err(e) => {
                if !self.sink_failed {
                    warn!(error = %e, "failed to write result row");
                    self.sink_failed = true;
                }
                false
            }
        }
    }
}

/// The table header.
pub fn header_row() -> String {
    format!(
        "{:^NARROW$} {:^NARROW$} {:^NARROW$} {:^WIDE$} {:^NARROW$}",
        "Host", "Port", "State", "Reason", "Service"
    )
}

/// One table row. Over-long fields are cut and marked with `..`.
pub fn format_row(result: &ScanResult) -> String {
    let state = result.state.to_string();

    format!(
        "{:^NARROW$} {:^NARROW$} {:^NARROW$} {:^WIDE$} {:^NARROW$}",
        truncate(result.host.as_str(), NARROW),
        result.port.as_u64(),
        truncate(&state, NARROW),
        truncate(result.reason.as_str(), WIDE),
        truncate(&result.service, NARROW),
    )
}

fn truncate(text: &str, limit: usize) -> Cow<'_, str> {
    if text.chars().count() <= limit {
        Cow::Borrowed(text)
    } else {
        let kept: String = text.chars().take(limit - 2).collect();
        Cow::Owned(kept + "..")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::channel::result_channel;
    use crate::scanner::traits::Reason;
    use crate::types::{Host, Port};

    fn result(host: &str, port: u64, reason: Reason, service: &str) -> ScanResult {
        ScanResult::new(Host::new(host).unwrap(), Port::new(port), reason, service)
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 15), "short");
        assert_eq!(truncate("exactly-15-char", 15), "exactly-15-char");
        assert_eq!(truncate("a-very-long-hostname.example", 15), "a-very-long-h..");
        assert_eq!(truncate("ääääääääääääääää", 15), "äääääääääääää..");
    }

    #[test]
    fn test_header_row() {
        assert_eq!(
            header_row(),
            "     Host            Port            State             Reason            Service    "
        );
    }

    #[test]
    fn test_format_row() {
        let row = format_row(&result("127.0.0.1", 80, Reason::SynAck, "http"));
        assert_eq!(
            row,
            "   127.0.0.1          80             open             syn/ack             http      "
        );
    }

    #[test]
    fn test_format_row_truncates_long_fields() {
        let row = format_row(&result(
            "a-very-long-hostname.example",
            8080,
            Reason::Refused,
            "some-really-long-service",
        ));
        assert!(row.starts_with("a-very-long-h.. "));
        assert!(row.contains(" connection refused "));
        assert!(row.ends_with("some-really-l.."));
        assert_eq!(row.chars().count(), 15 * 4 + 20 + 4);
    }

    async fn report(results: Vec<ScanResult>, show_open_only: bool) -> (ReportStats, String) {
        let (tx, rx) = result_channel();
        let cancel = CancellationToken::new();
        let reporter = Reporter::new(Vec::new(), show_open_only);
        let handle = tokio::spawn(reporter.run(rx, cancel.clone()));

        for r in results {
            tx.push(r);
        }
        tx.join().await;
        cancel.cancel();

        let (stats, sink) = handle.await.unwrap();
        (stats, String::from_utf8(sink).unwrap())
    }

    #[tokio::test]
    async fn test_reports_every_result_in_arrival_order() {
        let (stats, out) = report(
            vec![
                result("h", 82, Reason::Refused, "x"),
                result("h", 80, Reason::SynAck, "http"),
                result("h", 81, Reason::Timeout, "y"),
            ],
            false,
        )
        .await;

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], header_row());
        assert!(lines[1].contains("82"));
        assert!(lines[2].contains("80"));
        assert!(lines[3].contains("connection timeout"));
        assert_eq!(
            stats,
            ReportStats {
                processed: 3,
                emitted: 3,
                open: 1,
                closed: 2
            }
        );
    }

    #[tokio::test]
    async fn test_open_only_filter() {
        let (stats, out) = report(
            vec![
                result("h", 80, Reason::SynAck, "http"),
                result("h", 81, Reason::Refused, "x"),
                result("h", 82, Reason::InvalidPort, "y"),
            ],
            true,
        )
        .await;

        let rows: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|row| row.contains(" open ")));
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.emitted, 1);
    }

    #[tokio::test]
    async fn test_failing_sink_still_marks_done() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let (tx, rx) = result_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(Reporter::new(Broken, false).run(rx, cancel.clone()));

        tx.push(result("h", 1, Reason::Refused, "x"));
        tx.push(result("h", 2, Reason::Refused, "x"));
        tx.join().await;
        cancel.cancel();

        let (stats, _) = handle.await.unwrap();
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.emitted, 0);
    }
}
