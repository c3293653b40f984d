// src/reporter.rs
//! Single-attempt HTTP delivery of a payload.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::payload::Payload;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("error sending metrics: HTTP {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ReportError {
    /// Whether the error means later ticks cannot succeed either.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReportError::Encode(_))
    }
}

/// Confirmation of an accepted payload.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub sent_at: DateTime<Local>,
    pub bytes: usize,
}

impl Delivery {
    /// Wall clock time of the delivery as HH:MM:SS.
    pub fn clock(&self) -> String {
        self.sent_at.format("%H:%M:%S").to_string()
    }
}

/// Destination of assembled payloads, one attempt per call.
pub trait PayloadSink {
    /// Where payloads go, for log lines.
    fn destination(&self) -> &str;

    fn deliver(&self, payload: &Payload) -> impl Future<Output = Result<Delivery, ReportError>>;
}

pub struct Reporter {
    client: Client,
    endpoint: Url,
}

impl Reporter {
    /// Function to create a reporter posting to `endpoint`, with every request
    /// bounded by `timeout`.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tinypulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Function to make exactly one delivery attempt. Only HTTP 200 counts as
    /// success; nothing is retried or kept on failure.
    pub async fn send(&self, payload: &Payload) -> Result<Delivery, ReportError> {
        let body = payload.to_json_bytes()?;
        let bytes = body.len();

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Rejected { status, body });
        }

        Ok(Delivery {
            sent_at: Local::now(),
            bytes,
        })
    }
}

impl PayloadSink for Reporter {
    fn destination(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn deliver(&self, payload: &Payload) -> Result<Delivery, ReportError> {
        self.send(payload).await
    }
}
