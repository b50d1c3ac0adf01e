//! Scanner module - fans probes out over every (host, port) pair.
//!
//! The [`Orchestrator`] launches one probe task per pair on the Tokio
//! runtime, plus a single [`Reporter`] consuming the result channel. It
//! waits for every probe, then for the channel to drain, and only then
//! stops the reporter.
//!
//! ```text
//! Idle -> Running -> Draining -> Done
//! ```
//!
//! Rows come out in completion order, not in task order.

pub mod channel;
pub mod probe;
pub mod reporter;
pub mod traits;

use crate::services;
use crate::types::{Host, Port, PortSpec, TargetSpec};
use futures::FutureExt;
use std::fmt;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub use channel::{result_channel, ResultReceiver, ResultSender};
pub use probe::{ProbeError, TcpProber};
pub use reporter::{format_row, header_row, ReportStats, Reporter};
pub use traits::{PortState, Prober, Reason, ScanResult, DEFAULT_TIMEOUT};

/// Lifecycle of a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Nothing launched yet.
    Idle,
    /// Probes in flight.
    Running,
    /// Every probe returned; waiting for the reporter to catch up.
    Draining,
    /// Reporter stopped.
    Done,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Draining => write!(f, "draining"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// What to scan.
#[derive(Debug, Clone)]
pub struct ScanJob {
    hosts: Vec<Host>,
    ports: PortSpec,
    show_open_only: bool,
}

impl ScanJob {
    pub fn new(targets: TargetSpec, ports: PortSpec) -> Self {
        Self {
            hosts: targets.into_hosts(),
            ports,
            show_open_only: false,
        }
    }

    /// Only report open ports.
    pub fn with_open_only(mut self, show_open_only: bool) -> Self {
        self.show_open_only = show_open_only;
        self
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn ports(&self) -> &PortSpec {
        &self.ports
    }

    /// Number of probes this job launches.
    pub fn task_count(&self) -> usize {
        self.hosts.len() * self.ports.len()
    }

    /// Every (host, port) pair, port-major. Duplicates are kept.
    pub fn tasks(&self) -> impl Iterator<Item = (Host, Port)> + '_ {
        self.ports
            .clone()
            .into_iter()
            .flat_map(move |port| self.hosts.iter().map(move |host| (host.clone(), port)))
    }
}

/// Totals for a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Probes launched.
    pub tasks: usize,
    /// Results the reporter pulled and marked done.
    pub processed: usize,
    /// Rows written after filtering.
    pub emitted: usize,
    pub open: usize,
    pub closed: usize,
}

impl ScanSummary {
    fn new(tasks: usize, stats: ReportStats) -> Self {
        Self {
            tasks,
            processed: stats.processed,
            emitted: stats.emitted,
            open: stats.open,
            closed: stats.closed,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum ScanOutcome<W> {
    /// Every probe finished and every result was reported.
    Completed { summary: ScanSummary, sink: W },
    /// The interrupt token fired; in-flight probes were abandoned.
    Interrupted,
}

/// Drives one scan from task fan-out to reporter shutdown.
pub struct Orchestrator<P> {
    prober: Arc<P>,
    phase: ScanPhase,
}

impl<P: Prober + 'static> Orchestrator<P> {
    pub fn new(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
            phase: ScanPhase::Idle,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Run `job`, writing rows to `sink`.
    ///
    /// Probe failures never surface here; they are part of the results.
    /// If `interrupt` fires first, outstanding probes and the reporter are
    /// aborted without draining.
    pub async fn run<W>(
        &mut self,
        job: ScanJob,
        sink: W,
        interrupt: CancellationToken,
    ) -> ScanOutcome<W>
    where
        W: Write + Send + 'static,
    {
        let tasks = job.task_count();
        info!(
            hosts = job.hosts().len(),
            ports = job.ports().len(),
            tasks,
            timeout_ms = self.prober.timeout().as_millis() as u64,
            "scan started"
        );

        let (tx, rx) = result_channel();
        let stop_reporter = CancellationToken::new();
        let reporter = tokio::spawn(
            Reporter::new(sink, job.show_open_only).run(rx, stop_reporter.clone()),
        );

        let mut probes = JoinSet::new();
        for (host, port) in job.tasks() {
            probes.spawn(probe_task(Arc::clone(&self.prober), host, port, tx.clone()));
        }
        self.transition(ScanPhase::Running);

        let finished = tokio::select! {
            biased;
            _ = interrupt.cancelled() => false,
            _ = wait_for_probes(&mut probes) => true,
        };
        if !finished {
            return self.abandon(probes, reporter, stop_reporter);
        }
        self.transition(ScanPhase::Draining);

        let drained = tokio::select! {
            biased;
            _ = interrupt.cancelled() => false,
            _ = tx.join() => true,
        };
        if !drained {
            return self.abandon(probes, reporter, stop_reporter);
        }

        stop_reporter.cancel();
        let (stats, sink) = match reporter.await {
            Ok(done) => done,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        };
        self.transition(ScanPhase::Done);

        let summary = ScanSummary::new(tasks, stats);
        info!(
            open = summary.open,
            closed = summary.closed,
            emitted = summary.emitted,
            "scan finished"
        );

        ScanOutcome::Completed { summary, sink }
    }

    fn transition(&mut self, next: ScanPhase) {
        debug!(from = %self.phase, to = %next, "scan phase");
        self.phase = next;
    }

    fn abandon<W>(
        &self,
        mut probes: JoinSet<()>,
        reporter: JoinHandle<(ReportStats, W)>,
        stop_reporter: CancellationToken,
    ) -> ScanOutcome<W> {
        info!(phase = %self.phase, in_flight = probes.len(), "scan interrupted");
        probes.abort_all();
        stop_reporter.cancel();
        reporter.abort();
        ScanOutcome::Interrupted
    }
}

/// One probe, always ending in exactly one pushed result.
async fn probe_task<P: Prober>(prober: Arc<P>, host: Host, port: Port, tx: ResultSender) {
    let result = match AssertUnwindSafe(prober.probe(&host, port))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(_) => {
            error!(%host, %port, "probe panicked");
            ScanResult::new(
                host.clone(),
                port,
                Reason::Unexpected,
                services::service_name(port),
            )
        }
    };

    tx.push(result);
}

async fn wait_for_probes(probes: &mut JoinSet<()>) {
    while let Some(joined) = probes.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "probe task failed");
        }
    }
}
