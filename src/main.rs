// src/main.rs
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use tinypulse::collector::{HostProfile, SysinfoSource};
use tinypulse::{AgentConfig, AgentError, Assembler, Cli, Reporter, Scheduler, StopReason};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), AgentError> {
    let config = AgentConfig::try_from(cli)?;
    let source = SysinfoSource::new(config.route_probe)?;
    let reporter =
        Reporter::new(config.endpoint.clone(), config.timeout).map_err(AgentError::HttpClient)?;

    let host = HostProfile::detect();
    info!("tinypulse {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        hostname = %host.hostname,
        os = %host.os_name,
        version = %host.os_version,
        arch = %host.os_arch,
        platform = ?source.platform(),
        "host profile"
    );
    info!(
        "Config: server={}, interval={}s, profile={}",
        config.endpoint,
        config.interval.as_secs(),
        config.profile_id
    );
    info!("Press Ctrl+C to stop");

    let assembler = Assembler::new(source, config.sampling, config.profile_id);
    let mut scheduler =
        Scheduler::new(assembler, reporter, config.interval).with_max_ticks(config.max_ticks);

    let summary = scheduler.run(shutdown_signal()).await?;
    match summary.reason {
        StopReason::Cancelled => info!("Client stopped by user"),
        StopReason::Completed => info!("Client finished after {} ticks", summary.ticks),
    }
    info!(
        delivered = summary.delivered,
        failed = summary.failed,
        "delivery summary"
    );

    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed the agent keeps
/// running until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Initializes the tracing subscriber. Default level is INFO; -v for debug,
/// -vv for trace, -q for errors only. RUST_LOG takes precedence when set.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tinypulse={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
