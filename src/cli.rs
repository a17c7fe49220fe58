use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

#[derive(Parser)]
#[command(name = "ticketdesk")]
#[command(about = "Moderator console for community support tickets")]
#[command(version)]
pub struct Cli {
    /// Backend origin, overriding config and TICKETDESK_BASE_URL
    #[arg(long, global = true, value_parser = parse_base_url)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options shared by commands
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tickets in backend order
    #[command(visible_alias = "l")]
    Ls {
        /// Number of tickets to fetch (default: page_limit from config)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a ticket with its anchor and context messages
    #[command(visible_alias = "s")]
    Show {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Number of tickets to search through
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark an open ticket resolved
    Resolve {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a ticket
    Delete {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the backend is reachable
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Key (base_url, request_timeout, page_limit, display.timezone, display.locale)
        key: String,
        /// Value to store
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Key (base_url, request_timeout, page_limit, display.timezone, display.locale)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_config_get, cmd_config_set, cmd_config_show, cmd_delete, cmd_health, cmd_ls,
            cmd_resolve, cmd_show,
        };

        let base_url = self.base_url.as_deref();

        match self.command {
            Commands::Ls { limit, json } => {
                cmd_ls(base_url, limit, OutputOptions::new(json)).await
            }
            Commands::Show { id, limit, json } => {
                cmd_show(base_url, &id, limit, OutputOptions::new(json)).await
            }
            Commands::Resolve { id, yes, json } => {
                cmd_resolve(base_url, &id, yes, OutputOptions::new(json)).await
            }
            Commands::Delete { id, yes, json } => {
                cmd_delete(base_url, &id, yes, OutputOptions::new(json)).await
            }
            Commands::Health { json } => cmd_health(base_url, OutputOptions::new(json)).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => {
                    cmd_config_get(&key, OutputOptions::new(json))
                }
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_ticket_id(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("ID cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_base_url(s: &str) -> Result<String, String> {
    crate::config::validate_base_url(s).map_err(|e| e.to_string())?;
    Ok(s.trim_end_matches('/').to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ticketdesk", &mut io::stdout());
}
