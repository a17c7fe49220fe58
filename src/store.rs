//! Ticket collection with authoritative refetch.
//!
//! The store never predicts the outcome of a mutation. After `resolve` or
//! `delete` succeeds it re-reads the list from the backend, and the displayed
//! collection is only ever replaced wholesale by a successful fetch. A failed
//! fetch leaves whatever was displayed before untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::backend::TicketBackend;
use crate::confirm::TicketAction;
use crate::error::{Result, TicketDeskError};
use crate::types::{DEFAULT_PAGE_LIMIT, Ticket};

struct Displayed {
    /// Sequence number of the refresh that produced `tickets`
    seq: u64,
    tickets: Arc<[Ticket]>,
}

pub struct TicketStore<B> {
    backend: Arc<B>,
    limit: u32,
    next_seq: AtomicU64,
    displayed: RwLock<Displayed>,
}

impl<B: TicketBackend> TicketStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            limit: DEFAULT_PAGE_LIMIT,
            next_seq: AtomicU64::new(1),
            displayed: RwLock::new(Displayed {
                seq: 0,
                tickets: Arc::from(Vec::new()),
            }),
        }
    }

    /// Set the number of tickets requested by `refresh`.
    pub fn with_limit(mut self, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(TicketDeskError::InvalidLimit(limit));
        }
        self.limit = limit;
        Ok(self)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Fetch exactly `limit` tickets in backend order without touching the
    /// displayed collection.
    pub async fn list(&self, limit: u32) -> Result<Vec<Ticket>> {
        if limit == 0 {
            return Err(TicketDeskError::InvalidLimit(limit));
        }
        self.backend.list_tickets(limit).await
    }

    /// Re-read the ticket list and swap it in as the displayed collection.
    ///
    /// On failure the error is logged and returned; the displayed collection
    /// keeps its previous contents.
    pub async fn refresh(&self) -> Result<Arc<[Ticket]>> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        let tickets = match self.list(self.limit).await {
            Ok(tickets) => tickets,
            Err(e) => {
                warn!(error = %e, "ticket refresh failed; keeping previous list");
                return Err(e);
            }
        };

        let tickets: Arc<[Ticket]> = Arc::from(tickets);
        let mut displayed = self.displayed.write();
        if seq > displayed.seq {
            displayed.seq = seq;
            displayed.tickets = Arc::clone(&tickets);
        } else {
            debug!(seq, current = displayed.seq, "discarding refresh older than displayed list");
        }
        Ok(Arc::clone(&displayed.tickets))
    }

    /// Ask the backend to resolve a ticket, then refetch.
    ///
    /// Returns the backend's updated record. A failed refetch after a
    /// successful mutation is logged but does not turn the call into an error.
    pub async fn resolve(&self, ticket_id: &str) -> Result<Ticket> {
        let ticket = self.backend.resolve_ticket(ticket_id).await?;
        debug!(ticket_id, status = %ticket.status, "ticket resolved");
        self.refresh_after_mutation().await;
        Ok(ticket)
    }

    /// Ask the backend to delete a ticket, then refetch.
    pub async fn delete(&self, ticket_id: &str) -> Result<Ticket> {
        let ticket = self.backend.delete_ticket(ticket_id).await?;
        debug!(ticket_id, "ticket deleted");
        self.refresh_after_mutation().await;
        Ok(ticket)
    }

    /// Run a confirmed action against the backend.
    pub async fn apply(&self, action: &TicketAction) -> Result<Ticket> {
        match action {
            TicketAction::Resolve(id) => self.resolve(id).await,
            TicketAction::Delete(id) => self.delete(id).await,
        }
    }

    async fn refresh_after_mutation(&self) {
        // refresh() already logs; the mutation itself succeeded.
        let _ = self.refresh().await;
    }

    /// The last successfully fetched ticket list.
    pub fn tickets(&self) -> Arc<[Ticket]> {
        Arc::clone(&self.displayed.read().tickets)
    }

    /// Look up a ticket in the displayed collection.
    pub fn find(&self, ticket_id: &str) -> Option<Ticket> {
        self.displayed
            .read()
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
    }
}
