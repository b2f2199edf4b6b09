//! Message log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed text shown when a send fails; the underlying cause is logged,
/// never rendered inline.
pub const SEND_FAILURE_TEXT: &str = "An error occurred. Please try again.";

/// Who authored a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

/// Name/size metadata for an attachment. Raw bytes never enter the
/// message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

/// One entry in a conversation's log. Immutable once appended; ordering
/// is append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub files: Vec<FileMeta>,
    pub is_error: bool,
}

impl Message {
    fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            files: Vec::new(),
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>, files: Vec<FileMeta>) -> Self {
        Self {
            files,
            ..Self::new(content, Sender::User)
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Ai)
    }

    /// The fixed-text error bubble appended when a send fails.
    pub fn send_failure() -> Self {
        Self {
            is_error: true,
            ..Self::new(SEND_FAILURE_TEXT, Sender::System)
        }
    }
}
