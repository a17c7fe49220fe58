use thiserror::Error;

#[derive(Error, Debug)]
pub enum TicketDeskError {
    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("invalid limit '{0}': must be at least 1")]
    InvalidLimit(u32),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("ticket '{id}' is {status} and cannot be resolved")]
    NotResolvable { id: String, status: String },

    // Backend errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl TicketDeskError {
    /// Whether this error came from talking to the backend.
    ///
    /// Transport-class failures leave previously displayed state intact;
    /// callers use this to decide between "show stale view" and "abort".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TicketDeskError::Transport(_)
                | TicketDeskError::MalformedResponse { .. }
                | TicketDeskError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TicketDeskError>;
