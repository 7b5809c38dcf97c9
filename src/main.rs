//! pywatch - live terminal monitor for Python processes.
//!
//! Entry point: parses the CLI, validates configuration, and runs the
//! sampling loop on a single-threaded runtime.

use clap::Parser;
use pywatch::cli::{Args, LogLevel};
use pywatch::config::MonitorConfig;
use pywatch::process::ProcSampler;
use pywatch::render::TerminalSink;
use pywatch::Monitor;
use tracing::{info, Level};

/// Initializes tracing logging with the configured level, writing to stderr
/// so log lines do not fight the live display on stdout.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match MonitorConfig::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    setup_logging(&args);
    info!(
        "Starting pywatch (interval {}s, user={:?}, pattern={:?})",
        config.interval_secs, config.user, config.pattern
    );

    let mut sampler = ProcSampler::new();
    let mut sink = TerminalSink::new()?;
    let mut monitor = Monitor::new(config);

    monitor.run(&mut sampler, &mut sink).await?;

    info!("pywatch stopped gracefully");
    Ok(())
}
