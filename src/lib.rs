//! # Skitter - A Concurrent TCP Port Scanner
//!
//! Skitter tries a TCP connection to every (host, port) pair it is given and
//! prints each result the moment it is known.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use skitter::scanner::{Orchestrator, ScanJob, ScanOutcome, TcpProber};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let job = ScanJob::new("127.0.0.1".parse().unwrap(), "22,80-90".parse().unwrap())
//!         .with_open_only(true);
//!
//!     let mut orchestrator = Orchestrator::new(TcpProber::default());
//!     let outcome = orchestrator
//!         .run(job, std::io::stdout(), CancellationToken::new())
//!         .await;
//!
//!     if let ScanOutcome::Completed { summary, .. } = outcome {
//!         println!("{} open", summary.open);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Host and port-list parsing
//! - [`scanner`] - Probes, the result channel, the reporter and the orchestrator
//! - [`services`] - Port to service-name lookup
//! - [`config`] - Settings file handling
//! - [`error`] - Error types
//! - [`output`] / [`timing`] / [`logging`] - Everything around the result table

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod services;
pub mod timing;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError};
pub use scanner::{Orchestrator, PortState, Prober, Reason, ScanJob, ScanResult};
pub use types::{Host, Port, PortSpec, TargetSpec};
