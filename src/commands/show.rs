use std::sync::Arc;

use serde_json::json;

use super::{CommandOutput, Session};
use crate::cli::OutputOptions;
use crate::display::format_ticket_details;
use crate::error::{Result, TicketDeskError};
use crate::thread::{LoadOutcome, MessageThreadLoader};

/// Show a ticket with its anchor message and context messages
pub async fn cmd_show(
    base_url: Option<&str>,
    id: &str,
    limit: Option<u32>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open(base_url, limit)?;
    session.store.refresh().await?;

    let ticket = session
        .store
        .find(id)
        .ok_or_else(|| TicketDeskError::TicketNotFound(id.to_string()))?;

    let loader = MessageThreadLoader::new(Arc::clone(session.store.backend()));
    let outcome = loader.load_context(Some(&ticket)).await;
    let context = loader.context();
    let failed = outcome == LoadOutcome::Failed;
    let context_status = if failed { "failed" } else { "loaded" };

    let json_output = json!({
        "ticket": ticket,
        "context_messages": &*context,
        "context_status": context_status,
    });

    CommandOutput::new(json_output)
        .with_text(format_ticket_details(
            &ticket,
            &context,
            failed,
            &session.formatter,
        ))
        .print(output)
}
