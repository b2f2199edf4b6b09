//! AgentApi implementation over reqwest.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use agentchat_common::SessionId;
use agentchat_store::{LlmSettings, MsGraphSettings};

use crate::{AgentApi, ApiError, ChatReply, FileUpload};

/// HTTP client for the agentchat backend.
pub struct HttpAgentApi {
    base_url: String,
    http: reqwest::Client,
}

/// Wire shape of the session-settings fetch: the LLM payload sits under
/// a `config` key.
#[derive(Deserialize)]
struct SessionSettingsBody {
    config: LlmSettings,
}

impl HttpAgentApi {
    /// Build a client against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a non-2xx response into an `ApiError` with a truncated body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(ApiError::Api(format!("HTTP {status}: {text}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl AgentApi for HttpAgentApi {
    async fn send_message(
        &self,
        text: &str,
        files: &[FileUpload],
        session_id: Option<&SessionId>,
    ) -> Result<ChatReply, ApiError> {
        debug!(
            files = files.len(),
            session = session_id.map(|s| s.as_str()).unwrap_or("<none>"),
            "chat send"
        );

        let mut form = reqwest::multipart::Form::new().text("message", text.to_string());
        if let Some(sid) = session_id {
            form = form.text("session_id", sid.as_str().to_string());
        }
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str("application/octet-stream")
                .map_err(|e| ApiError::Api(e.to_string()))?;
            form = form.part("files", part);
        }

        let response = self
            .http
            .post(self.url("/api/chat/message"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;
        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn clear_history(&self, session_id: &SessionId) -> Result<(), ApiError> {
        debug!(session = %session_id, "history clear");

        let response = self
            .http
            .post(self.url("/api/chat/clear"))
            .json(&serde_json::json!({ "session_id": session_id.as_str() }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn get_session_settings(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<LlmSettings>, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/settings/session/{}", session_id.as_str())))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // No record for this session yet is absence, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let body: SessionSettingsBody = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(Some(body.config))
    }

    async fn save_session_settings(
        &self,
        session_id: &SessionId,
        settings: &LlmSettings,
    ) -> Result<(), ApiError> {
        let settings_data = serde_json::to_string(settings)
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("session_id", session_id.as_str().to_string())
            .text("settings_data", settings_data);

        let response = self
            .http
            .post(self.url("/api/settings/session"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn save_global_settings(&self, settings: &MsGraphSettings) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/api/settings/msgraph"))
            .json(settings)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}
