//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read one value
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{BASE_URL_ENV, Config, TIMEZONE_ENV};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let effective_base_url = config.base_url();
    let effective_timezone = config.timezone_name();

    let json_output = json!({
        "base_url": config.base_url,
        "effective_base_url": effective_base_url,
        "request_timeout": config.request_timeout,
        "page_limit": config.page_limit,
        "display": {
            "timezone": config.display.timezone,
            "effective_timezone": effective_timezone,
            "locale": config.display.locale.to_string(),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}: {}", "base_url".cyan(), config.base_url));
    if effective_base_url != config.base_url {
        text_output.push_str(&format!(
            " {}",
            format!("(overridden by {BASE_URL_ENV}: {effective_base_url})").dimmed()
        ));
    }
    text_output.push('\n');
    text_output.push_str(&format!(
        "{}: {}s\n",
        "request_timeout".cyan(),
        config.request_timeout
    ));
    text_output.push_str(&format!("{}: {}\n", "page_limit".cyan(), config.page_limit));

    text_output.push('\n');
    text_output.push_str(&format!("{}:\n", "display".cyan()));
    match (&config.display.timezone, &effective_timezone) {
        (Some(tz), Some(effective)) if tz == effective => {
            text_output.push_str(&format!("  timezone: {tz}\n"));
        }
        (_, Some(effective)) => {
            text_output.push_str(&format!(
                "  timezone: {} {}\n",
                effective,
                format!("(from {TIMEZONE_ENV})").dimmed()
            ));
        }
        (_, None) => {
            text_output.push_str(&format!("  timezone: {}\n", "system".dimmed()));
        }
    }
    text_output.push_str(&format!("  locale: {}\n", config.display.locale));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let stored = config.get(key)?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!(
        "Set {} = {}",
        key.cyan(),
        stored.as_deref().unwrap_or(value).green()
    ))
    .print(output)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    let text = match value {
        Some(ref v) => v.clone(),
        None => "not set".dimmed().to_string(),
    };

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(text)
    .print(output)
}
