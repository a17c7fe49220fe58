use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Session};
use crate::backend::TicketBackend;
use crate::cli::OutputOptions;
use crate::error::Result;

/// Probe the backend's `/healthz` endpoint
pub async fn cmd_health(base_url: Option<&str>, output: OutputOptions) -> Result<()> {
    let session = Session::open(base_url, None)?;
    let backend = session.store.backend();
    let status = backend.health().await?;

    CommandOutput::new(json!({
        "base_url": backend.base_url(),
        "status": status,
    }))
    .with_text(format!(
        "{} {}",
        backend.base_url().dimmed(),
        status.green()
    ))
    .print(output)
}
