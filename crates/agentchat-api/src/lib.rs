//! Transport adapter for the agentchat backend.
//!
//! The core depends on the backend only through the [`AgentApi`] trait:
//! one chat send (multipart, optional attachments), a history clear, and
//! the session-scoped/global settings endpoints. [`HttpAgentApi`] is the
//! reqwest implementation. Single attempt per call; retry and timeout
//! policy beyond the client-level limits lives elsewhere.

pub mod base_url;
pub mod http;

use async_trait::async_trait;

use agentchat_common::SessionId;
use agentchat_store::{LlmSettings, MsGraphSettings};

pub use base_url::{resolve_base_url, DEFAULT_API_URL};
pub use http::HttpAgentApi;

/// One file attached to an outgoing chat message. Raw bytes travel only
/// through the transport; the message log keeps name/size metadata.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Backend reply to a chat send.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChatReply {
    pub message: String,
    /// Present when the backend bound (or rebound) the conversation to a
    /// session; the orchestrator adopts it on the first turn.
    pub session_id: Option<String>,
}

#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Send one chat message with optional attachments.
    async fn send_message(
        &self,
        text: &str,
        files: &[FileUpload],
        session_id: Option<&SessionId>,
    ) -> Result<ChatReply, ApiError>;

    /// Clear server-side conversation history for a session.
    async fn clear_history(&self, session_id: &SessionId) -> Result<(), ApiError>;

    /// Fetch session-scoped LLM settings. `Ok(None)` means the backend
    /// has no record for this session (absence, not an error).
    async fn get_session_settings(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<LlmSettings>, ApiError>;

    /// Store session-scoped LLM settings.
    async fn save_session_settings(
        &self,
        session_id: &SessionId,
        settings: &LlmSettings,
    ) -> Result<(), ApiError>;

    /// Store global (non-session-scoped) MSGraph settings.
    async fn save_global_settings(&self, settings: &MsGraphSettings) -> Result<(), ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API error: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Api("HTTP 500: boom".into());
        assert_eq!(err.to_string(), "API error: HTTP 500: boom");

        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = ApiError::Parse("missing field `message`".into());
        assert_eq!(err.to_string(), "parse error: missing field `message`");
    }

    #[test]
    fn file_upload_size_is_byte_length() {
        let file = FileUpload::new("notes.txt", vec![0u8; 1024]);
        assert_eq!(file.size(), 1024);
        assert_eq!(file.name, "notes.txt");
    }

    #[test]
    fn chat_reply_deserializes_without_session_id() {
        let reply: ChatReply = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(reply.message, "hi");
        assert!(reply.session_id.is_none());
    }
}
