//! Terminal messages around the result table.
//!
//! The table itself is written by the reporter; this module prints the
//! start banner, the timing line and error notices.

use chrono::Local;
use console::style;
use std::time::Duration;

/// Print the start banner to stderr, keeping stdout for the table.
pub fn print_scan_header(hosts: usize, ports: usize, tasks: usize) {
    eprintln!(
        "{} {} v{} at {}",
        style("Starting").cyan(),
        style("skitter").cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%d %H:%M %Z")
    );
    eprintln!(
        "{} {} host(s) x {} port(s) = {} probes",
        style("•").dim(),
        style(hosts).white().bold(),
        style(ports).white().bold(),
        style(tasks).white().bold()
    );
}

/// Print the trailing timing line after a completed scan.
pub fn print_elapsed(elapsed: Duration) {
    println!("\n{}", elapsed_line(elapsed));
}

/// Print the notice shown when the user interrupts a scan.
pub fn print_exit_notice() {
    println!("\nExiting...");
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

fn elapsed_line(elapsed: Duration) -> String {
    format!("Total execution time: {:.2} seconds", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_line() {
        assert_eq!(
            elapsed_line(Duration::from_millis(1234)),
            "Total execution time: 1.23 seconds"
        );
        assert_eq!(
            elapsed_line(Duration::ZERO),
            "Total execution time: 0.00 seconds"
        );
    }
}
