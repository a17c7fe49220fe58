mod config;
mod health;
pub mod interactive;
mod ls;
mod mutate;
mod show;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use health::cmd_health;
pub use ls::cmd_ls;
pub use mutate::{cmd_delete, cmd_resolve};
pub use show::cmd_show;

use serde_json::Value;

use crate::backend::HttpBackend;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::formatting::TimestampFormatter;
use crate::store::TicketStore;

/// Result of a command, printed as JSON or text depending on output options
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Everything a backend-facing command needs: config, store and formatter.
pub struct Session {
    pub config: Config,
    pub store: TicketStore<HttpBackend>,
    pub formatter: TimestampFormatter,
}

impl Session {
    /// Load config and connect to the backend.
    ///
    /// `base_url` wins over `TICKETDESK_BASE_URL` and the config file; `limit`
    /// wins over `page_limit`.
    pub fn open(base_url: Option<&str>, limit: Option<u32>) -> Result<Self> {
        let config = Config::load()?;
        let backend = match base_url {
            Some(url) => HttpBackend::new(url, config.request_timeout())?,
            None => HttpBackend::from_config(&config)?,
        };
        let store = TicketStore::new(std::sync::Arc::new(backend))
            .with_limit(limit.unwrap_or(config.page_limit))?;
        let formatter = config.formatter()?;

        Ok(Self {
            config,
            store,
            formatter,
        })
    }
}
