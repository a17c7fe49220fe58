//! Terminal rendering for tickets and message threads

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::formatting::TimestampFormatter;
use crate::types::{Message, Ticket, TicketStatus};

/// Widest content excerpt shown in the ticket table.
const CONTENT_WIDTH: usize = 60;

pub fn format_status_colored(status: &TicketStatus) -> String {
    let badge = format!("[{}]", status);
    match status {
        TicketStatus::Open => badge.yellow().to_string(),
        TicketStatus::Resolved => badge.green().to_string(),
        TicketStatus::Other(_) => badge.dimmed().to_string(),
    }
}

/// Collapse whitespace and cut `text` to at most `max` characters.
pub fn truncate_content(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Render the ticket table.
pub fn format_ticket_table(tickets: &[Ticket], fmt: &TimestampFormatter) -> String {
    if tickets.is_empty() {
        return "No tickets found.".to_string();
    }

    let rows: Vec<TicketRow> = tickets
        .iter()
        .map(|t| TicketRow {
            id: t.id.clone(),
            author: t.author().display_name().to_string(),
            content: truncate_content(&t.msg.content, CONTENT_WIDTH),
            status: format_status_colored(&t.status),
            created: fmt.to_display_date_time_numeric(&t.timestamp),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Render a single message the way the ticket dialog lists it.
pub fn format_message_item(message: &Message, fmt: &TimestampFormatter) -> String {
    let mut header = format!(
        "{} {}",
        message.author.display_name().bold(),
        fmt.to_display_date_time(&message.timestamp).dimmed()
    );
    if message.author.is_bot {
        header.push_str(&format!(" {}", "[bot]".magenta()));
    }
    if message.is_reply() {
        header.push_str(&format!(" {}", "[reply]".dimmed()));
    }
    if message.is_threaded() {
        header.push_str(&format!(" {}", "[thread]".dimmed()));
    }
    if message.has_attachment {
        header.push_str(&format!(" {}", "[attachment]".dimmed()));
    }

    let mut output = header;
    for line in message.content.lines() {
        output.push_str(&format!("\n  {line}"));
    }
    if !message.msg_url.is_empty() {
        output.push_str(&format!("\n  {}", message.msg_url.blue().underline()));
    }
    output
}

/// Render the ticket dialog: details, anchor message, context messages.
pub fn format_ticket_details(
    ticket: &Ticket,
    context: &[Message],
    context_failed: bool,
    fmt: &TimestampFormatter,
) -> String {
    let mut output = format!("{}\n\n", "Ticket Details".cyan().bold());
    output.push_str(&format!("{} {}\n", "Ticket ID:".bold(), ticket.id));
    output.push_str(&format!(
        "{} {}\n",
        "Status:".bold(),
        format_status_colored(&ticket.status)
    ));
    output.push_str(&format!(
        "{} {}\n",
        "Created:".bold(),
        fmt.to_display_date_time(&ticket.timestamp)
    ));
    if let Some(ref by) = ticket.resolved_by {
        output.push_str(&format!("{} {}\n", "Resolved by:".bold(), by));
    }
    if let Some(ref changed) = ticket.ts_last_status_change {
        output.push_str(&format!(
            "{} {}\n",
            "Status changed:".bold(),
            fmt.to_display_date_time(changed)
        ));
    }

    output.push_str(&format!("\n{}\n", format_message_item(&ticket.msg, fmt)));

    output.push_str(&format!("\n{}\n", "Context Messages:".bold()));
    if context_failed {
        output.push_str(&format!("  {}\n", "could not load context messages".red()));
    } else if context.is_empty() {
        output.push_str(&format!("  {}\n", "none".dimmed()));
    } else {
        for message in context {
            output.push_str(&format!("\n{}\n", format_message_item(message, fmt)));
        }
    }

    output
}
