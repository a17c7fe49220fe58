#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Runs the ticketdesk binary in an isolated temp directory
pub struct TicketDeskTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
}

impl TicketDeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        TicketDeskTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_ticketdesk"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("TICKETDESK_ROOT")
            .env_remove("TICKETDESK_BASE_URL")
            .env_remove("RUST_LOG")
            .env("TICKETDESK_TIMEZONE", "UTC");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_stdin(args, "")
    }

    /// Run with `input` piped to stdin, then closed
    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute ticketdesk command");

        {
            let mut stdin = child.stdin.take().expect("stdin not captured");
            stdin
                .write_all(input.as_bytes())
                .expect("Failed to write stdin");
        }

        child
            .wait_with_output()
            .expect("Failed to wait for ticketdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".ticketdesk").join("config.yaml")
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }

    pub fn write_config(&self, content: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("config path has a parent"))
            .expect("Failed to create .ticketdesk directory");
        fs::write(path, content).expect("Failed to write config file");
    }
}

/// A ticket in the backend's JSON wire shape
pub fn ticket_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "msg_id": format!("{id}-msg"),
        "status": status,
        "timestamp": "2024-03-05T08:15:00Z",
        "resolved_by": if status == "resolved" { Some("moderator_id") } else { None },
        "ts_last_status_change": if status == "resolved" { Some("2024-03-06T10:00:00Z") } else { None },
        "context_messages": [],
        "msg": message_json(&format!("{id}-msg"), &format!("help with {id}")),
    })
}

/// A message in the backend's JSON wire shape
pub fn message_json(id: &str, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "channel_id": "c-1",
        "parent_channel_id": null,
        "community_server_id": "s-1",
        "timestamp": "2024-03-05T08:14:00Z",
        "has_attachment": false,
        "reference_msg_id": null,
        "timestamp_insert": "2024-03-05T08:14:05Z",
        "discussion_id": "d-1",
        "author_id": "a-1",
        "content": content,
        "msg_url": format!("https://discord.com/channels/s-1/c-1/{id}"),
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
    })
}
