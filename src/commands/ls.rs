use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Session};
use crate::cli::OutputOptions;
use crate::display::format_ticket_table;
use crate::error::Result;
use crate::types::{Ticket, TicketStatus};

/// List tickets in backend order
pub async fn cmd_ls(base_url: Option<&str>, limit: Option<u32>, output: OutputOptions) -> Result<()> {
    let session = Session::open(base_url, limit)?;
    let tickets = session.store.refresh().await?;

    let mut text = format_ticket_table(&tickets, &session.formatter);
    if !tickets.is_empty() {
        text.push('\n');
        text.push_str(&summary_line(&tickets));
    }

    CommandOutput::new(json!(&*tickets)).with_text(text).print(output)
}

fn summary_line(tickets: &[Ticket]) -> String {
    let open = tickets.iter().filter(|t| t.is_open()).count();
    let resolved = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Resolved)
        .count();
    let other = tickets.len() - open - resolved;

    let mut line = format!(
        "{} tickets: {} open, {} resolved",
        tickets.len(),
        open.to_string().yellow(),
        resolved.to_string().green()
    );
    if other > 0 {
        line.push_str(&format!(", {} other", other.to_string().dimmed()));
    }
    line
}
