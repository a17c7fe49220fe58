//! Two-step confirmation for state-changing ticket actions.
//!
//! The gate holds at most one pending action. A new request replaces the one
//! already waiting, since only one prompt is ever on screen.

use std::fmt;

/// A state-changing operation on a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketAction {
    Resolve(String),
    Delete(String),
}

impl TicketAction {
    pub fn ticket_id(&self) -> &str {
        match self {
            TicketAction::Resolve(id) | TicketAction::Delete(id) => id,
        }
    }

    /// Title and body of the confirmation prompt.
    pub fn prompt(&self) -> (&'static str, &'static str) {
        match self {
            TicketAction::Resolve(_) => ("Confirm Resolve", "Are you sure you want to resolve?"),
            TicketAction::Delete(_) => ("Confirm Delete", "Are you sure you want to delete?"),
        }
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketAction::Resolve(id) => write!(f, "resolve {id}"),
            TicketAction::Delete(id) => write!(f, "delete {id}"),
        }
    }
}

/// A request waiting for the operator's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation<A> {
    pub title: String,
    pub content: String,
    pub action: A,
}

#[derive(Debug)]
pub struct ConfirmationGate<A> {
    pending: Option<PendingConfirmation<A>>,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate for `action`. Returns the request it replaced, if any.
    pub fn request(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        action: A,
    ) -> Option<PendingConfirmation<A>> {
        self.pending.replace(PendingConfirmation {
            title: title.into(),
            content: content.into(),
            action,
        })
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation<A>> {
        self.pending.as_ref()
    }

    /// Close the gate and hand back the captured action.
    pub fn confirm(&mut self) -> Option<A> {
        self.pending.take().map(|p| p.action)
    }

    /// Close the gate and invoke `on_confirm` with the captured action.
    pub fn confirm_with<R>(&mut self, on_confirm: impl FnOnce(A) -> R) -> Option<R> {
        self.confirm().map(on_confirm)
    }

    /// Close the gate without running anything.
    pub fn cancel(&mut self) -> Option<PendingConfirmation<A>> {
        self.pending.take()
    }
}

impl ConfirmationGate<TicketAction> {
    /// Open the gate with the standard prompt for a ticket action.
    pub fn request_action(
        &mut self,
        action: TicketAction,
    ) -> Option<PendingConfirmation<TicketAction>> {
        let (title, content) = action.prompt();
        self.request(title, content, action)
    }
}

impl<R> ConfirmationGate<Box<dyn FnOnce() -> R + Send>> {
    /// Close the gate and run the captured callback.
    pub fn run_confirmed(&mut self) -> Option<R> {
        self.confirm().map(|callback| callback())
    }
}
