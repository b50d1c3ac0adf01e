use anyhow::Context;
use clap::Parser;
use skitter::cli::Args;
use skitter::config::Settings;
use skitter::{logging, output};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    logging::init(&settings.log_level, args.verbose)?;

    // Ctrl-C stops the scan; in-flight probes are abandoned.
    let interrupt = CancellationToken::new();
    let trigger = interrupt.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    args.execute(&settings, interrupt).await?;
    Ok(())
}
