// src/error.rs
//! Top-level errors that stop the agent.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AgentError {
    /// sysinfo has no backend for this OS, so no metric family can be read.
    #[error("platform metrics are not available on this system")]
    UnsupportedPlatform,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Unrecoverable fault raised while the loop was running.
    #[error("internal fault: {0}")]
    Fault(String),
}
