//! tinypulse: samples host telemetry and pushes one JSON snapshot per tick to a
//! dashboard collector over HTTP.

pub mod assembler;
pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod payload;
pub mod reporter;
pub mod scheduler;

pub use assembler::{Assembler, Collection, MetricFamily};
pub use config::{AgentConfig, Cli, SamplingConfig};
pub use error::AgentError;
pub use payload::Payload;
pub use reporter::{Delivery, PayloadSink, ReportError, Reporter};
pub use scheduler::{LoopState, LoopSummary, Scheduler, StopReason};
