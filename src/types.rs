use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TicketDeskError;

/// Directory holding local configuration, relative to the working directory.
pub const TICKETDESK_DIR: &str = ".ticketdesk";

/// Default number of tickets requested from the backend.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Get the root directory for local state.
///
/// Checks `TICKETDESK_ROOT` first, falling back to `.ticketdesk` in the
/// current directory.
pub fn ticketdesk_root() -> std::path::PathBuf {
    match std::env::var("TICKETDESK_ROOT") {
        Ok(root) if !root.is_empty() => std::path::PathBuf::from(root),
        _ => std::path::PathBuf::from(TICKETDESK_DIR),
    }
}

/// Ticket lifecycle state.
///
/// Only `open -> resolved` is ever requested by this client. Statuses the
/// backend adds later are kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    #[default]
    Open,
    Resolved,
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => TicketStatus::Open,
            "resolved" => TicketStatus::Resolved,
            _ => TicketStatus::Other(s),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TicketDeskError::InvalidStatus(s.to_string()));
        }
        Ok(TicketStatus::from(trimmed.to_lowercase()))
    }
}

/// Snapshot of a message author at the time the message was written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub timestamp_insert: String,
}

impl Author {
    /// Nickname when set, otherwise the account name.
    pub fn display_name(&self) -> &str {
        if self.nickname.trim().is_empty() {
            &self.name
        } else {
            &self.nickname
        }
    }
}

/// A message ingested from the community platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub parent_channel_id: Option<String>,
    #[serde(default)]
    pub community_server_id: String,
    #[serde(default)]
    pub discussion_id: String,
    #[serde(default)]
    pub author_id: String,
    /// When the author wrote the message.
    pub timestamp: String,
    /// When the ingestion pipeline stored it.
    #[serde(default)]
    pub timestamp_insert: String,
    pub author: Author,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub msg_url: String,
    #[serde(default)]
    pub has_attachment: bool,
    #[serde(default)]
    pub reference_msg_id: Option<String>,
}

impl Message {
    /// True when the message lives in a thread under another channel.
    pub fn is_threaded(&self) -> bool {
        self.parent_channel_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    /// True when the message replies to another message.
    pub fn is_reply(&self) -> bool {
        self.reference_msg_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

/// A support ticket raised about a single anchor message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    #[serde(default)]
    pub msg_id: String,
    pub status: TicketStatus,
    pub timestamp: String,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default)]
    pub ts_last_status_change: Option<String>,
    /// The anchor message, embedded by value.
    pub msg: Message,
    /// Ids of surrounding messages, fetched on demand.
    #[serde(default)]
    pub context_messages: Vec<String>,
}

impl Ticket {
    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open
    }

    /// Resolve is only offered for open tickets; there is no way back.
    pub fn is_resolvable(&self) -> bool {
        self.is_open()
    }

    /// Author snapshot of the anchor message.
    pub fn author(&self) -> &Author {
        &self.msg.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket_json() -> serde_json::Value {
        json!({
            "id": "t-1",
            "msg_id": "m-1",
            "status": "open",
            "timestamp": "2024-03-05T08:15:00Z",
            "context_messages": ["m-0", "m-2"],
            "msg": {
                "id": "m-1",
                "channel_id": "c-1",
                "parent_channel_id": null,
                "community_server_id": "s-1",
                "timestamp": "2024-03-05T08:14:00Z",
                "has_attachment": false,
                "reference_msg_id": null,
                "timestamp_insert": "2024-03-05T08:14:05Z",
                "discussion_id": "d-1",
                "author_id": "a-1",
                "content": "my build fails",
                "msg_url": "https://discord.com/channels/s-1/c-1/m-1",
                "author": {
                    "id": "a-1",
                    "name": "alice",
                    "nickname": "Alice",
                    "color": "#ffffff",
                    "discriminator": "0",
                    "avatar_url": "https://cdn.example/a.png",
                    "is_bot": false,
                    "timestamp_insert": "2024-01-01T00:00:00Z"
                }
            }
        })
    }

    #[test]
    fn test_ticket_deserializes_wire_shape() {
        let ticket: Ticket = serde_json::from_value(ticket_json()).unwrap();
        assert_eq!(ticket.id, "t-1");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.resolved_by.is_none());
        assert!(ticket.ts_last_status_change.is_none());
        assert_eq!(ticket.context_messages, vec!["m-0", "m-2"]);
        assert_eq!(ticket.author().display_name(), "Alice");
        assert_ne!(ticket.msg.timestamp, ticket.msg.timestamp_insert);
        assert!(!ticket.msg.is_threaded());
        assert!(!ticket.msg.is_reply());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let mut value = ticket_json();
        value["status"] = json!("escalated");
        let ticket: Ticket = serde_json::from_value(value).unwrap();
        assert_eq!(ticket.status, TicketStatus::Other("escalated".to_string()));
        assert!(!ticket.is_resolvable());

        let back = serde_json::to_value(&ticket).unwrap();
        assert_eq!(back["status"], "escalated");
    }

    #[test]
    fn test_resolved_ticket_is_not_resolvable() {
        let mut value = ticket_json();
        value["status"] = json!("resolved");
        value["resolved_by"] = json!("moderator_id");
        value["ts_last_status_change"] = json!("2024-03-06 10:00:00.000000");
        let ticket: Ticket = serde_json::from_value(value).unwrap();
        assert!(!ticket.is_open());
        assert!(!ticket.is_resolvable());
        assert_eq!(ticket.resolved_by.as_deref(), Some("moderator_id"));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Open".parse::<TicketStatus>().unwrap(), TicketStatus::Open);
        assert_eq!(
            " resolved ".parse::<TicketStatus>().unwrap(),
            TicketStatus::Resolved
        );
        assert!("".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let author = Author {
            id: "a".to_string(),
            name: "bob".to_string(),
            ..Default::default()
        };
        assert_eq!(author.display_name(), "bob");
    }

    #[test]
    fn test_threaded_reply_message() {
        let message = Message {
            parent_channel_id: Some("c-0".to_string()),
            reference_msg_id: Some("m-0".to_string()),
            ..Default::default()
        };
        assert!(message.is_threaded());
        assert!(message.is_reply());
    }
}
