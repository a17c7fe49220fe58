//! `resolve` and `delete`: the two state-changing commands.
//!
//! Both go through a [`ConfirmationGate`]. `--yes` answers the prompt up front;
//! otherwise the operator is asked on stdin and anything but `y` cancels.

use owo_colors::OwoColorize;
use serde_json::json;
use tracing::debug;

use super::interactive::{confirm, confirm_on_stderr};
use super::{CommandOutput, Session};
use crate::cli::OutputOptions;
use crate::confirm::{ConfirmationGate, TicketAction};
use crate::display::format_status_colored;
use crate::error::{Result, TicketDeskError};

/// Resolve a ticket after confirmation
pub async fn cmd_resolve(
    base_url: Option<&str>,
    id: &str,
    yes: bool,
    output: OutputOptions,
) -> Result<()> {
    run_action(base_url, TicketAction::Resolve(id.to_string()), yes, output).await
}

/// Delete a ticket after confirmation
pub async fn cmd_delete(
    base_url: Option<&str>,
    id: &str,
    yes: bool,
    output: OutputOptions,
) -> Result<()> {
    run_action(base_url, TicketAction::Delete(id.to_string()), yes, output).await
}

async fn run_action(
    base_url: Option<&str>,
    action: TicketAction,
    yes: bool,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open(base_url, None)?;

    if let TicketAction::Resolve(id) = &action {
        ensure_resolvable(&session, id).await?;
    }

    let mut gate = ConfirmationGate::new();
    gate.request_action(action);

    if !yes && !ask(&gate, output)? {
        let Some(pending) = gate.cancel() else {
            return Ok(());
        };
        return CommandOutput::new(json!({
            "action": action_name(&pending.action),
            "ticket_id": pending.action.ticket_id(),
            "confirmed": false,
        }))
        .with_text("Cancelled")
        .print(output);
    }

    let Some(action) = gate.confirm() else {
        return Ok(());
    };
    let ticket = session.store.apply(&action).await?;
    let shown = session.store.find(&ticket.id);

    let json_output = json!({
        "action": action_name(&action),
        "ticket_id": action.ticket_id(),
        "confirmed": true,
        "ticket": ticket,
        "listed": shown,
    });

    let text = match (&action, shown) {
        (TicketAction::Resolve(id), Some(listed)) => format!(
            "Resolved {} {}",
            id.cyan(),
            format_status_colored(&listed.status)
        ),
        (TicketAction::Resolve(id), None) => format!("Resolved {}", id.cyan()),
        (TicketAction::Delete(id), None) => format!("Deleted {}", id.cyan()),
        (TicketAction::Delete(id), Some(_)) => format!(
            "Deleted {} {}",
            id.cyan(),
            "(still listed by the backend)".dimmed()
        ),
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Refuse to resolve a ticket the backend already lists as not open.
///
/// Tickets outside the fetched page, and a failed fetch, fall through to the
/// backend, which has the final word.
async fn ensure_resolvable(session: &Session, id: &str) -> Result<()> {
    if let Err(e) = session.store.refresh().await {
        debug!(ticket_id = id, error = %e, "skipping resolvable check");
        return Ok(());
    }
    if let Some(ticket) = session.store.find(id)
        && !ticket.is_resolvable()
    {
        return Err(TicketDeskError::NotResolvable {
            id: id.to_string(),
            status: ticket.status.to_string(),
        });
    }
    Ok(())
}

/// Show the pending prompt and read the answer. With `--json` the prompt goes
/// to stderr so stdout carries only the JSON document.
fn ask(gate: &ConfirmationGate<TicketAction>, output: OutputOptions) -> Result<bool> {
    let Some(pending) = gate.pending() else {
        return Ok(false);
    };
    let prompt = pending.content.trim_end_matches('?');
    if output.json {
        eprintln!("{} ({})", pending.title.bold(), pending.action);
        confirm_on_stderr(prompt)
    } else {
        println!("{} ({})", pending.title.bold(), pending.action);
        confirm(prompt)
    }
}

fn action_name(action: &TicketAction) -> &'static str {
    match action {
        TicketAction::Resolve(_) => "resolve",
        TicketAction::Delete(_) => "delete",
    }
}
