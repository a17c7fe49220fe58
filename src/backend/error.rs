//! Error handling for backend requests.
//!
//! Converts reqwest failures and non-success responses into
//! `TicketDeskError::Transport`, keeping the endpoint and HTTP status so the
//! message tells the operator which call failed.

use std::fmt;

use serde::Deserialize;

use crate::error::TicketDeskError;

use super::Endpoint;

/// Longest response excerpt carried into an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// A failed backend request.
#[derive(Debug)]
pub struct BackendError {
    /// The operation that failed
    pub endpoint: Endpoint,
    /// HTTP status code, if a response was received
    pub status: Option<reqwest::StatusCode>,
    /// Whether the request ran out of time
    pub timed_out: bool,
    /// Human-readable error message
    pub message: String,
}

/// Error body shape returned by the backend framework, e.g. `{"detail": "Ticket not found"}`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl BackendError {
    /// Build from a transport-level reqwest failure.
    pub fn from_reqwest(endpoint: Endpoint, err: reqwest::Error) -> Self {
        Self {
            endpoint,
            status: err.status(),
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }

    /// Build from a non-success status and its raw body.
    pub fn from_status(endpoint: Endpoint, status: reqwest::StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| excerpt(body));

        let reason = status.canonical_reason().unwrap_or("Unknown");
        let message = if detail.is_empty() {
            format!("HTTP {} {}", status.as_u16(), reason)
        } else {
            format!("HTTP {} {}: {}", status.as_u16(), reason, detail)
        };

        Self {
            endpoint,
            status: Some(status),
            timed_out: false,
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timed_out {
            write!(f, "{} timed out: {}", self.endpoint, self.message)
        } else {
            write!(f, "{} failed: {}", self.endpoint, self.message)
        }
    }
}

impl From<BackendError> for TicketDeskError {
    fn from(err: BackendError) -> Self {
        TicketDeskError::Transport(err.to_string())
    }
}

/// Build the error for a body that does not match the expected shape.
pub fn malformed(endpoint: Endpoint, err: &serde_json::Error) -> TicketDeskError {
    TicketDeskError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: err.to_string(),
    }
}
