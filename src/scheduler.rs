// src/scheduler.rs
//! Tick loop: assemble, report, sleep, until stopped.
//!
//! Ticks are spaced by the configured interval *plus* the time spent
//! collecting and sending, so the effective period drifts by the tick latency
//! (at least the CPU and network sampling windows). The drift is left as is.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::assembler::Assembler;
use crate::collector::MetricsSource;
use crate::error::AgentError;
use crate::reporter::{PayloadSink, Reporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Why the loop stopped without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown signal fired.
    Cancelled,
    /// The configured tick count was reached.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub delivered: u64,
    pub failed: u64,
    pub reason: StopReason,
}

pub struct Scheduler<S, R = Reporter> {
    assembler: Assembler<S>,
    reporter: R,
    interval: Duration,
    max_ticks: Option<u64>,
    state: LoopState,
}

impl<S: MetricsSource, R: PayloadSink> Scheduler<S, R> {
    pub fn new(assembler: Assembler<S>, reporter: R, interval: Duration) -> Self {
        Self {
            assembler,
            reporter,
            interval,
            max_ticks: None,
            state: LoopState::Running,
        }
    }

    /// Function to stop the loop cleanly after `ticks` ticks.
    pub fn with_max_ticks(mut self, ticks: Option<u64>) -> Self {
        self.max_ticks = ticks;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Function to run ticks until `shutdown` resolves, the tick budget is
    /// spent, or a fault occurs. `shutdown` may interrupt a tick in flight or
    /// the sleep between ticks; no snapshot is sent after it fires.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<LoopSummary, AgentError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        self.state = LoopState::Running;

        let mut summary = LoopSummary {
            ticks: 0,
            delivered: 0,
            failed: 0,
            reason: StopReason::Cancelled,
        };

        loop {
            let result = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                result = self.tick() => result,
            };
            let delivered = match result {
                Ok(delivered) => delivered,
                Err(e) => {
                    self.state = LoopState::Stopped;
                    return Err(e);
                }
            };

            summary.ticks += 1;
            if delivered {
                summary.delivered += 1;
            } else {
                summary.failed += 1;
            }

            if self.max_ticks.is_some_and(|max| summary.ticks >= max) {
                summary.reason = StopReason::Completed;
                break;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.state = LoopState::Stopped;
        Ok(summary)
    }

    /// Function to run one tick. Returns whether the payload was accepted;
    /// only unrecoverable faults are errors.
    pub async fn tick(&mut self) -> Result<bool, AgentError> {
        let started = Instant::now();
        let collection = self.assembler.assemble().await;

        match self.reporter.deliver(&collection.payload).await {
            Ok(delivery) => {
                info!(
                    at = %delivery.clock(),
                    bytes = delivery.bytes,
                    degraded = collection.degraded.len(),
                    "metrics sent successfully"
                );
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "tick finished");
                Ok(true)
            }
            Err(e) if e.is_fatal() => Err(AgentError::Fault(e.to_string())),
            Err(e) => {
                error!(endpoint = self.reporter.destination(), "{e}");
                Ok(false)
            }
        }
    }
}
