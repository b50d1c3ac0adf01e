//! Command-line interface definitions for Skitter.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use crate::config::Settings;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{Orchestrator, ScanJob, ScanOutcome, TcpProber};
use crate::timing::timed;
use crate::types::{PortSpec, TargetSpec};
use clap::{ArgAction, Parser};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "skitter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan hosts for open TCP ports, streaming results as they arrive", long_about = None)]
pub struct Args {
    /// Hostname or IP to scan, or a comma/space separated list thereof
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Ports to scan, e.g. "1-443,444,500-600" or "22 80 443"
    #[arg(short, long, value_name = "PORTS")]
    pub ports: String,

    /// Show only open ports
    #[arg(long)]
    pub open: bool,

    /// Connection timeout in milliseconds
    #[arg(short = 't', long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Effective options after merging the settings file and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub timeout: Duration,
    pub open_only: bool,
}

impl Args {
    /// Merge flags over file settings. Flags win.
    pub fn options(&self, settings: &Settings) -> RunOptions {
        RunOptions {
            timeout: self
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.timeout()),
            open_only: self.open || settings.open_only,
        }
    }

    /// Parse hosts and ports into a job.
    ///
    /// Every configuration error surfaces here, before anything is probed.
    pub fn build_job(&self, options: &RunOptions) -> CliResult<ScanJob> {
        let targets = TargetSpec::parse(&self.host)?;
        let ports: PortSpec = self.ports.parse()?;
        Ok(ScanJob::new(targets, ports).with_open_only(options.open_only))
    }

    /// Run the scan to completion or until `interrupt` fires.
    pub async fn execute(&self, settings: &Settings, interrupt: CancellationToken) -> CliResult<()> {
        let options = self.options(settings);
        let job = self.build_job(&options)?;

        output::print_scan_header(job.hosts().len(), job.ports().len(), job.task_count());

        let mut orchestrator = Orchestrator::new(TcpProber::new(options.timeout));
        let (outcome, elapsed) = timed(orchestrator.run(job, io::stdout(), interrupt)).await;

        match outcome {
            ScanOutcome::Completed { .. } => output::print_elapsed(elapsed),
            ScanOutcome::Interrupted => output::print_exit_notice(),
        }

        Ok(())
    }
}
