//! Ticket backend access.
//!
//! The backend owns tickets and messages; this client only reads them and
//! requests the two narrow mutations (resolve and delete). All parameters
//! travel in the query string and no request carries a body.

pub mod error;
pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;
use std::future::Future;

use crate::error::Result;
use crate::types::{Message, Ticket};

pub use error::BackendError;
pub use http::HttpBackend;

/// The HTTP operations exposed by the ticket backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListTickets,
    ResolveTicket,
    DeleteTicket,
    ContextMessages,
    Health,
}

impl Endpoint {
    pub fn method(self) -> reqwest::Method {
        match self {
            Endpoint::ListTickets | Endpoint::ContextMessages | Endpoint::Health => {
                reqwest::Method::GET
            }
            Endpoint::ResolveTicket => reqwest::Method::PUT,
            Endpoint::DeleteTicket => reqwest::Method::DELETE,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ListTickets => "/tickets",
            Endpoint::ResolveTicket => "/tickets/resolve",
            Endpoint::DeleteTicket => "/tickets/delete",
            Endpoint::ContextMessages => "/tickets/get_messages",
            Endpoint::Health => "/healthz",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// Common interface for ticket backends
pub trait TicketBackend: Send + Sync {
    /// Fetch up to `limit` tickets in backend order
    fn list_tickets(&self, limit: u32) -> impl Future<Output = Result<Vec<Ticket>>> + Send;

    /// Mark a ticket resolved; the backend returns the updated record
    fn resolve_ticket(&self, ticket_id: &str) -> impl Future<Output = Result<Ticket>> + Send;

    /// Delete a ticket; the backend echoes the removed record
    fn delete_ticket(&self, ticket_id: &str) -> impl Future<Output = Result<Ticket>> + Send;

    /// Fetch the context messages of a ticket in backend order
    fn context_messages(&self, ticket_id: &str)
    -> impl Future<Output = Result<Vec<Message>>> + Send;

    /// Liveness probe
    fn health(&self) -> impl Future<Output = Result<String>> + Send;
}
