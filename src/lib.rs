pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod display;
pub mod error;
pub mod formatting;
pub mod store;
pub mod thread;
pub mod types;

pub use backend::{BackendError, Endpoint, HttpBackend, TicketBackend};
pub use config::Config;
pub use confirm::{ConfirmationGate, PendingConfirmation, TicketAction};
pub use error::{Result, TicketDeskError};
pub use formatting::{DisplayLocale, TimestampFormatter};
pub use store::TicketStore;
pub use thread::{LoadOutcome, MessageThreadLoader};
pub use types::{Author, Message, Ticket, TicketStatus};
