// src/config.rs
//! Command line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_SERVER: &str = "http://localhost:5000";
pub const API_PATH: &str = "/api/metrics";
/// Shortest window that still yields a meaningful CPU or network rate.
pub const MIN_SAMPLE_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server URL {url:?}: {reason}")]
    InvalidServer { url: String, reason: String },
}

/// Pushes host telemetry snapshots to a dashboard collector.
#[derive(Debug, Parser)]
#[command(name = "tinypulse", version, about)]
pub struct Cli {
    /// Base URL of the collector; metrics are posted to <server>/api/metrics.
    #[arg(long, env = "TINYPULSE_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Seconds to sleep between ticks.
    #[arg(
        long,
        env = "TINYPULSE_INTERVAL",
        default_value_t = 3,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Profile identifier stamped on every payload.
    #[arg(long, env = "TINYPULSE_PROFILE", default_value_t = 1, allow_negative_numbers = true)]
    pub profile: i64,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// CPU and network sampling window in milliseconds.
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(500..))]
    pub sample_window_ms: u64,

    /// Stop after this many ticks instead of running until interrupted.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Address used to resolve the outbound interface. No traffic is sent.
    #[arg(long, default_value = "8.8.8.8:80")]
    pub route_probe: SocketAddr,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Sampling windows for the CPU and network providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    pub cpu_window: Duration,
    pub net_window: Duration,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            cpu_window: MIN_SAMPLE_WINDOW,
            net_window: MIN_SAMPLE_WINDOW,
        }
    }
}

/// Validated agent settings.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub server: Url,
    /// Full URL payloads are posted to.
    pub endpoint: Url,
    pub interval: Duration,
    pub profile_id: i64,
    pub timeout: Duration,
    pub sampling: SamplingConfig,
    pub max_ticks: Option<u64>,
    pub route_probe: SocketAddr,
}

impl AgentConfig {
    /// Function to build an agent config for the given server with every
    /// other setting at its default.
    pub fn for_server(server: &str) -> Result<Self, ConfigError> {
        let server = parse_server(server)?;
        let endpoint = endpoint_for(&server)?;

        Ok(Self {
            server,
            endpoint,
            interval: Duration::from_secs(3),
            profile_id: 1,
            timeout: Duration::from_secs(10),
            sampling: SamplingConfig::default(),
            max_ticks: None,
            route_probe: SocketAddr::from(([8, 8, 8, 8], 80)),
        })
    }
}

impl TryFrom<&Cli> for AgentConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let window = Duration::from_millis(cli.sample_window_ms).max(MIN_SAMPLE_WINDOW);

        Ok(Self {
            interval: Duration::from_secs(cli.interval),
            profile_id: cli.profile,
            timeout: Duration::from_secs(cli.timeout),
            sampling: SamplingConfig {
                cpu_window: window,
                net_window: window,
            },
            max_ticks: cli.count,
            route_probe: cli.route_probe,
            ..Self::for_server(&cli.server)?
        })
    }
}

fn parse_server(server: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(server).map_err(|e| ConfigError::InvalidServer {
        url: server.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidServer {
            url: server.to_string(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        });
    }

    Ok(url)
}

/// Function to resolve the API path against the server URL. The path is
/// absolute, so it replaces any path already on the server URL.
pub fn endpoint_for(server: &Url) -> Result<Url, ConfigError> {
    server.join(API_PATH).map_err(|e| ConfigError::InvalidServer {
        url: server.to_string(),
        reason: e.to_string(),
    })
}
