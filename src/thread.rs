//! Anchor and context messages for the selected ticket.
//!
//! The anchor message is embedded in the ticket and is available the moment a
//! ticket is selected. Context messages arrive later from the backend. Each
//! request is tagged with the selection it was issued for, and a response
//! that lands after the operator moved on is dropped instead of overwriting
//! the newer selection's context.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::backend::TicketBackend;
use crate::types::{Message, Ticket};

/// What happened to a context load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No ticket was selected; nothing was requested.
    Skipped,
    /// The response was applied; holds the number of context messages.
    Applied(usize),
    /// The selection changed while the request was in flight.
    Superseded,
    /// The request failed; the context list stays empty.
    Failed,
}

struct Selection {
    ticket_id: String,
    generation: u64,
    anchor: Message,
}

struct ThreadState {
    generation: u64,
    selection: Option<Selection>,
    context: Arc<[Message]>,
}

impl ThreadState {
    fn is_current(&self, ticket_id: &str, generation: u64) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.generation == generation && s.ticket_id == ticket_id)
    }
}

pub struct MessageThreadLoader<B> {
    backend: Arc<B>,
    state: Mutex<ThreadState>,
}

impl<B: TicketBackend> MessageThreadLoader<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Mutex::new(ThreadState {
                generation: 0,
                selection: None,
                context: Arc::from(Vec::new()),
            }),
        }
    }

    /// Select `ticket` and fetch its context messages.
    ///
    /// Selecting `None` clears the selection and issues no request. Every
    /// call with a ticket fetches again; nothing is cached between
    /// selections. Failures are logged and never propagate.
    pub async fn load_context(&self, ticket: Option<&Ticket>) -> LoadOutcome {
        let Some(ticket) = ticket else {
            self.close();
            return LoadOutcome::Skipped;
        };

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.selection = Some(Selection {
                ticket_id: ticket.id.clone(),
                generation: state.generation,
                anchor: ticket.msg.clone(),
            });
            state.context = Arc::from(Vec::new());
            state.generation
        };

        let result = self.backend.context_messages(&ticket.id).await;

        let mut state = self.state.lock();
        if !state.is_current(&ticket.id, generation) {
            debug!(
                ticket_id = %ticket.id,
                generation,
                "discarding context response for superseded selection"
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(messages) => {
                let count = messages.len();
                state.context = Arc::from(messages);
                LoadOutcome::Applied(count)
            }
            Err(e) => {
                warn!(ticket_id = %ticket.id, error = %e, "failed to fetch context messages");
                LoadOutcome::Failed
            }
        }
    }

    /// Drop the selection and its context, as when the ticket dialog closes.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.selection = None;
        state.context = Arc::from(Vec::new());
    }

    /// Id of the selected ticket.
    pub fn selected(&self) -> Option<String> {
        self.state
            .lock()
            .selection
            .as_ref()
            .map(|s| s.ticket_id.clone())
    }

    /// The selected ticket's anchor message; never requires a fetch.
    pub fn anchor(&self) -> Option<Message> {
        self.state.lock().selection.as_ref().map(|s| s.anchor.clone())
    }

    /// Context messages of the current selection, in backend order.
    pub fn context(&self) -> Arc<[Message]> {
        Arc::clone(&self.state.lock().context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{Call, FakeBackend, sample_ticket};
    use std::sync::atomic::Ordering;

    fn context_ids(loader: &MessageThreadLoader<FakeBackend>) -> Vec<String> {
        loader.context().iter().map(|m| m.id.clone()).collect()
    }

    fn loader_with(backend: &Arc<FakeBackend>) -> Arc<MessageThreadLoader<FakeBackend>> {
        Arc::new(MessageThreadLoader::new(Arc::clone(backend)))
    }

    #[tokio::test]
    async fn test_none_selection_issues_no_request() {
        let backend = Arc::new(FakeBackend::default());
        let loader = loader_with(&backend);

        assert_eq!(loader.load_context(None).await, LoadOutcome::Skipped);
        assert!(backend.calls().is_empty());
        assert!(loader.context().is_empty());
        assert!(loader.selected().is_none());
        assert!(loader.anchor().is_none());
    }

    #[tokio::test]
    async fn test_context_keeps_backend_order() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_context("t-1", &["m-9", "m-3", "m-5"]);
        let loader = loader_with(&backend);
        let ticket = sample_ticket("t-1");

        assert_eq!(
            loader.load_context(Some(&ticket)).await,
            LoadOutcome::Applied(3)
        );
        assert_eq!(context_ids(&loader), vec!["m-9", "m-3", "m-5"]);
        assert_eq!(loader.anchor().unwrap().id, "t-1-msg");
        assert_eq!(loader.selected().as_deref(), Some("t-1"));
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_context("A", &["a-1", "a-2"]);
        backend.set_context("B", &["b-1"]);
        let gate = backend.gate("A");
        let loader = loader_with(&backend);

        let ticket_a = sample_ticket("A");
        let ticket_b = sample_ticket("B");

        let slow = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_context(Some(&ticket_a)).await })
        };
        gate.started.notified().await;

        assert_eq!(
            loader.load_context(Some(&ticket_b)).await,
            LoadOutcome::Applied(1)
        );

        gate.release.notify_one();
        assert_eq!(slow.await.unwrap(), LoadOutcome::Superseded);

        assert_eq!(context_ids(&loader), vec!["b-1"]);
        assert_eq!(loader.selected().as_deref(), Some("B"));
        assert_eq!(loader.anchor().unwrap().id, "B-msg");
    }

    #[tokio::test]
    async fn test_response_after_close_is_discarded() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_context("A", &["a-1"]);
        let gate = backend.gate("A");
        let loader = loader_with(&backend);
        let ticket = sample_ticket("A");

        let pending = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_context(Some(&ticket)).await })
        };
        gate.started.notified().await;
        assert!(loader.anchor().is_some());

        loader.close();
        gate.release.notify_one();

        assert_eq!(pending.await.unwrap(), LoadOutcome::Superseded);
        assert!(loader.context().is_empty());
        assert!(loader.selected().is_none());
    }

    #[tokio::test]
    async fn test_reselect_after_close_fetches_again() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_context("t-1", &["m-1"]);
        let loader = loader_with(&backend);
        let ticket = sample_ticket("t-1");

        loader.load_context(Some(&ticket)).await;
        loader.close();
        assert!(loader.context().is_empty());

        loader.load_context(Some(&ticket)).await;
        assert_eq!(context_ids(&loader), vec!["m-1"]);
        assert_eq!(
            backend.calls(),
            vec![
                Call::Context("t-1".to_string()),
                Call::Context("t-1".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_leaves_context_empty_and_anchor_available() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_context("t-1", &["m-1"]);
        backend.set_context("t-2", &["m-2"]);
        let loader = loader_with(&backend);

        loader.load_context(Some(&sample_ticket("t-1"))).await;
        assert_eq!(context_ids(&loader), vec!["m-1"]);

        backend.fail_context.store(true, Ordering::SeqCst);
        let outcome = loader.load_context(Some(&sample_ticket("t-2"))).await;

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(loader.context().is_empty());
        assert_eq!(loader.anchor().unwrap().id, "t-2-msg");
    }
}
