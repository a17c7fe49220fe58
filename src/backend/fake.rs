//! In-memory backend used by unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{Result, TicketDeskError};
use crate::types::{Author, Message, Ticket, TicketStatus};

use super::TicketBackend;

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(u32),
    Resolve(String),
    Delete(String),
    Context(String),
    Health,
}

/// Holds a context request for one ticket until released.
#[derive(Default)]
pub struct Gate {
    pub started: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeBackend {
    pub tickets: Mutex<Vec<Ticket>>,
    pub messages: Mutex<HashMap<String, Vec<Message>>>,
    pub calls: Mutex<Vec<Call>>,
    pub fail_list: AtomicBool,
    pub fail_context: AtomicBool,
    pub gates: Mutex<HashMap<String, Arc<Gate>>>,
    pub list_gate: Mutex<Option<Arc<Gate>>>,
}

impl FakeBackend {
    pub fn with_tickets(ids: &[&str]) -> Self {
        let backend = Self::default();
        *backend.tickets.lock() = ids.iter().map(|id| sample_ticket(id)).collect();
        backend
    }

    pub fn set_context(&self, ticket_id: &str, message_ids: &[&str]) {
        let messages = message_ids.iter().map(|id| sample_message(id)).collect();
        self.messages.lock().insert(ticket_id.to_string(), messages);
    }

    /// Make context requests for `ticket_id` wait until the gate is released.
    pub fn gate(&self, ticket_id: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates
            .lock()
            .insert(ticket_id.to_string(), Arc::clone(&gate));
        gate
    }

    /// Make the next list request answer with the tickets present when it
    /// arrived, but only after the gate is released.
    pub fn gate_list(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.list_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn unavailable() -> TicketDeskError {
        TicketDeskError::Transport("GET /tickets failed: HTTP 503 Service Unavailable".to_string())
    }

    fn not_found(ticket_id: &str) -> TicketDeskError {
        TicketDeskError::Transport(format!(
            "HTTP 404 Not Found: ticket '{ticket_id}' not found"
        ))
    }
}

impl TicketBackend for FakeBackend {
    async fn list_tickets(&self, limit: u32) -> Result<Vec<Ticket>> {
        self.record(Call::List(limit));
        let result = if self.fail_list.load(Ordering::SeqCst) {
            Err(Self::unavailable())
        } else {
            Ok(self
                .tickets
                .lock()
                .iter()
                .take(limit as usize)
                .cloned()
                .collect())
        };

        let gate = self.list_gate.lock().take();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        result
    }

    async fn resolve_ticket(&self, ticket_id: &str) -> Result<Ticket> {
        self.record(Call::Resolve(ticket_id.to_string()));
        let mut tickets = self.tickets.lock();
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == ticket_id && t.is_open())
            .ok_or_else(|| Self::not_found(ticket_id))?;
        ticket.status = TicketStatus::Resolved;
        ticket.resolved_by = Some("moderator_id".to_string());
        ticket.ts_last_status_change = Some("2024-03-06 10:00:00.000000".to_string());
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, ticket_id: &str) -> Result<Ticket> {
        self.record(Call::Delete(ticket_id.to_string()));
        let mut tickets = self.tickets.lock();
        let pos = tickets
            .iter()
            .position(|t| t.id == ticket_id)
            .ok_or_else(|| Self::not_found(ticket_id))?;
        Ok(tickets.remove(pos))
    }

    async fn context_messages(&self, ticket_id: &str) -> Result<Vec<Message>> {
        self.record(Call::Context(ticket_id.to_string()));

        let gate = self.gates.lock().get(ticket_id).cloned();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        if self.fail_context.load(Ordering::SeqCst) {
            return Err(TicketDeskError::Transport(
                "GET /tickets/get_messages failed: connection reset".to_string(),
            ));
        }
        Ok(self
            .messages
            .lock()
            .get(ticket_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn health(&self) -> Result<String> {
        self.record(Call::Health);
        Ok("OK".to_string())
    }
}

pub fn sample_message(id: &str) -> Message {
    Message {
        id: id.to_string(),
        channel_id: "c-1".to_string(),
        parent_channel_id: None,
        community_server_id: "s-1".to_string(),
        discussion_id: "d-1".to_string(),
        author_id: "a-1".to_string(),
        timestamp: "2024-03-05T08:14:00Z".to_string(),
        timestamp_insert: "2024-03-05T08:14:05Z".to_string(),
        author: Author {
            id: "a-1".to_string(),
            name: "alice".to_string(),
            nickname: "Alice".to_string(),
            color: "#ffffff".to_string(),
            discriminator: "0".to_string(),
            avatar_url: "https://cdn.example/a.png".to_string(),
            is_bot: false,
            timestamp_insert: "2024-01-01T00:00:00Z".to_string(),
        },
        content: format!("message {id}"),
        msg_url: format!("https://discord.com/channels/s-1/c-1/{id}"),
        has_attachment: false,
        reference_msg_id: None,
    }
}

pub fn sample_ticket(id: &str) -> Ticket {
    let msg = sample_message(&format!("{id}-msg"));
    Ticket {
        id: id.to_string(),
        msg_id: msg.id.clone(),
        status: TicketStatus::Open,
        timestamp: "2024-03-05T08:15:00Z".to_string(),
        resolved_by: None,
        ts_last_status_change: None,
        msg,
        context_messages: Vec::new(),
    }
}
