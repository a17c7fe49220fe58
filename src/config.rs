//! Top-level application configuration.
//!
//! Configuration is stored in `.ticketdesk/config.yaml` and includes:
//! - The backend origin and request timeout
//! - The default number of tickets to list
//! - Display settings (timezone and locale) fed to the timestamp formatter

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TicketDeskError};
use crate::formatting::{DisplayLocale, TimestampFormatter};
use crate::types::{DEFAULT_PAGE_LIMIT, ticketdesk_root};

/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV: &str = "TICKETDESK_BASE_URL";

/// Environment variable overriding `display.timezone`.
pub const TIMEZONE_ENV: &str = "TICKETDESK_TIMEZONE";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "base_url",
    "request_timeout",
    "page_limit",
    "display.timezone",
    "display.locale",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the ticket backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Number of tickets requested by `ls` (default: 20)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Timestamp display settings
    #[serde(default, skip_serializing_if = "DisplayConfig::is_default")]
    pub display: DisplayConfig,
}

fn default_base_url() -> String {
    "http://0.0.0.0:5001".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            page_limit: default_page_limit(),
            display: DisplayConfig::default(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// IANA timezone name; the system zone is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Locale used for human-readable timestamps
    #[serde(default)]
    pub locale: DisplayLocale,
}

impl DisplayConfig {
    /// Check if this config has default values
    pub fn is_default(&self) -> bool {
        *self == DisplayConfig::default()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        ticketdesk_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            TicketDeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate().map_err(|e| {
            TicketDeskError::Config(format!("{e} in {}", path.display()))
        })?;
        Ok(config)
    }

    /// Apply the checks `set` enforces to values read from a file.
    fn validate(&self) -> std::result::Result<(), String> {
        if self.request_timeout == 0 {
            return Err("request_timeout must be at least 1 second".to_string());
        }
        if self.page_limit == 0 {
            return Err("page_limit must be at least 1".to_string());
        }
        validate_base_url(&self.base_url).map_err(|e| e.to_string())?;
        if let Some(ref tz) = self.display.timezone {
            resolve_timezone(tz).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TicketDeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            TicketDeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        Ok(())
    }

    /// Backend origin from environment variable or config file
    pub fn base_url(&self) -> String {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }
        self.base_url.clone()
    }

    /// Timezone name from environment variable or config file
    pub fn timezone_name(&self) -> Option<String> {
        if let Ok(tz) = env::var(TIMEZONE_ENV)
            && !tz.is_empty()
        {
            return Some(tz);
        }
        self.display.timezone.clone()
    }

    /// Get the per-request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Build the timestamp formatter from the display settings.
    pub fn formatter(&self) -> Result<TimestampFormatter> {
        let zone = match self.timezone_name() {
            Some(name) => resolve_timezone(&name)?,
            None => TimeZone::system(),
        };
        Ok(TimestampFormatter::new(zone, self.display.locale))
    }

    /// Read a config value by key
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "base_url" => Some(self.base_url.clone()),
            "request_timeout" => Some(self.request_timeout.to_string()),
            "page_limit" => Some(self.page_limit.to_string()),
            "display.timezone" => self.display.timezone.clone(),
            "display.locale" => Some(self.display.locale.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Validate and set a config value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                validate_base_url(value)?;
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "request_timeout" => {
                let seconds: u64 = value.parse().map_err(|_| {
                    TicketDeskError::Config(format!(
                        "invalid request_timeout '{value}': expected whole seconds"
                    ))
                })?;
                if seconds == 0 {
                    return Err(TicketDeskError::Config(
                        "request_timeout must be at least 1 second".to_string(),
                    ));
                }
                self.request_timeout = seconds;
            }
            "page_limit" => {
                let limit: u32 = value.parse().map_err(|_| {
                    TicketDeskError::Config(format!(
                        "invalid page_limit '{value}': expected a positive integer"
                    ))
                })?;
                if limit == 0 {
                    return Err(TicketDeskError::InvalidLimit(limit));
                }
                self.page_limit = limit;
            }
            "display.timezone" => {
                resolve_timezone(value)?;
                self.display.timezone = Some(value.to_string());
            }
            "display.locale" => {
                self.display.locale = value.parse()?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> TicketDeskError {
    TicketDeskError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

/// Check that a backend origin is an absolute http(s) URL.
pub fn validate_base_url(value: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(value)
        .map_err(|e| TicketDeskError::Config(format!("invalid base_url '{value}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(TicketDeskError::Config(format!(
            "invalid base_url '{value}': unsupported scheme '{other}'"
        ))),
    }
}

/// Resolve a timezone name. `UTC` never needs the tz database.
pub fn resolve_timezone(name: &str) -> Result<TimeZone> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("utc") || name == "Z" {
        return Ok(TimeZone::UTC);
    }
    if name.eq_ignore_ascii_case("local") || name.eq_ignore_ascii_case("system") {
        return Ok(TimeZone::system());
    }
    TimeZone::get(name)
        .map_err(|e| TicketDeskError::Config(format!("unknown timezone '{name}': {e}")))
}
