//! reqwest implementation of the ticket backend.
//!
//! The backend exposes no authentication; the four ticket endpoints are
//! trusted-network only. Every request carries the configured timeout and
//! surfaces expiry as a transport error.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{Config, validate_base_url};
use crate::error::{Result, TicketDeskError};
use crate::types::{Message, Ticket};

use super::error::{BackendError, malformed};
use super::{Endpoint, TicketBackend};

/// Connect timeout applied on top of the per-request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Ticket backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url(), config.request_timeout())
    }

    /// Create a backend client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_base_url(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Issue a request and return the raw body of a successful response
    async fn execute(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> Result<String> {
        debug!(%endpoint, ?query, "sending backend request");

        let response = self
            .client
            .request(endpoint.method(), self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(endpoint, e))?;

        if !status.is_success() {
            let err = BackendError::from_status(endpoint, status, &body);
            warn!("{err}");
            return Err(err.into());
        }

        Ok(body)
    }

    /// Issue a request and decode the JSON body into `T`
    async fn execute_json<T>(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(endpoint, query).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(%endpoint, error = %e, "backend returned a malformed body");
            malformed(endpoint, &e)
        })
    }
}

impl TicketBackend for HttpBackend {
    async fn list_tickets(&self, limit: u32) -> Result<Vec<Ticket>> {
        if limit == 0 {
            return Err(TicketDeskError::InvalidLimit(limit));
        }
        let limit = limit.to_string();
        self.execute_json(Endpoint::ListTickets, &[("limit", limit.as_str())])
            .await
    }

    async fn resolve_ticket(&self, ticket_id: &str) -> Result<Ticket> {
        self.execute_json(Endpoint::ResolveTicket, &[("ticket_id", ticket_id)])
            .await
    }

    async fn delete_ticket(&self, ticket_id: &str) -> Result<Ticket> {
        self.execute_json(Endpoint::DeleteTicket, &[("ticket_id", ticket_id)])
            .await
    }

    async fn context_messages(&self, ticket_id: &str) -> Result<Vec<Message>> {
        self.execute_json(Endpoint::ContextMessages, &[("ticket_id", ticket_id)])
            .await
    }

    async fn health(&self) -> Result<String> {
        let body = self.execute(Endpoint::Health, &[]).await?;
        // The probe answers with a JSON string literal, but accept plain text too.
        Ok(serde_json::from_str::<String>(&body).unwrap_or_else(|_| body.trim().to_string()))
    }
}
