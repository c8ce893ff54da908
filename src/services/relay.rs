//! Outbound message delivery
//!
//! MESSAGE submissions are posted as JSON to a form-relay endpoint. The
//! relay is a blocking call; the app runs it on a worker thread and reports
//! the outcome back through its async channel.

use crate::config::RelayConfig;
use serde::Serialize;
use std::time::Duration;

/// What the visitor typed into MESSAGE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    pub name: String,
    pub message: String,
}

pub trait MessageRelay: Send + Sync {
    fn send(&self, payload: &MessagePayload) -> Result<(), RelayError>;
}

#[derive(Serialize)]
struct RelayBody<'a> {
    name: &'a str,
    message: &'a str,
    subject: &'a str,
}

/// POSTs `{"name", "message", "subject"}` to the configured endpoint
#[derive(Debug, Clone)]
pub struct HttpRelay {
    endpoint: String,
    subject: String,
    timeout: Duration,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>, subject: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            subject: subject.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.subject.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn body(&self, payload: &MessagePayload) -> Result<String, RelayError> {
        serde_json::to_string(&RelayBody {
            name: &payload.name,
            message: &payload.message,
            subject: &self.subject,
        })
        .map_err(|e| RelayError::Serialize(e.to_string()))
    }
}

impl MessageRelay for HttpRelay {
    fn send(&self, payload: &MessagePayload) -> Result<(), RelayError> {
        let body = self.body(payload)?;
        tracing::debug!("Posting message from {} to {}", payload.name, self.endpoint);

        let response = ureq::post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .timeout(self.timeout)
            .send_string(&body);

        match response {
            Ok(resp) if (200..300).contains(&resp.status()) => Ok(()),
            Ok(resp) => Err(RelayError::Status(resp.status())),
            Err(ureq::Error::Status(code, _)) => Err(RelayError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                Err(RelayError::Transport(transport.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    Serialize(String),
    /// The endpoint answered with a non-2xx status
    Status(u16),
    /// Connection, TLS or timeout failure
    Transport(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Serialize(msg) => write!(f, "Serialize error: {msg}"),
            RelayError::Status(code) => write!(f, "Relay responded with status {code}"),
            RelayError::Transport(msg) => write!(f, "Transport error: {msg}"),
        }
    }
}

impl std::error::Error for RelayError {}
