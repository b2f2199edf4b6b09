//! Settings schema types.
//!
//! All structs use `serde(default)` so partial persisted records work
//! correctly. Which `llm` fields are meaningful depends on the selected
//! provider (`endpoint`/`deployment_name`/`api_version` for azure,
//! `model_name` for openai, `endpoint`/`model_type` for local); the
//! schema does not enforce that — it round-trips every field so
//! switching providers never loses previously entered values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// LLM backend provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Azure,
    Openai,
    Local,
}

/// Local-LLM model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Normal,
    Quantized,
}

/// LLM configuration namespace.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: Provider,
    pub endpoint: String,
    pub api_key: String,
    pub deployment_name: String,
    pub api_version: String,
    pub model_name: String,
    /// Sampling temperature, valid range 0.0-1.0.
    pub temperature: f32,
    pub model_type: ModelType,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Azure,
            endpoint: String::new(),
            api_key: String::new(),
            deployment_name: String::new(),
            api_version: "2023-05-15".into(),
            model_name: "gpt-3.5-turbo".into(),
            temperature: 0.7,
            model_type: ModelType::Quantized,
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("deployment_name", &self.deployment_name)
            .field("api_version", &self.api_version)
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .field("model_type", &self.model_type)
            .finish()
    }
}

/// Microsoft Graph configuration namespace. Currently inert, reserved
/// for future use; persisted and mirrored like any other namespace.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsGraphSettings {
    pub client_id: String,
    pub tenant_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl fmt::Debug for MsGraphSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsGraphSettings")
            .field("client_id", &self.client_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// The full settings record: two independent namespaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub msgraph: MsGraphSettings,
}

/// Partial update for the `llm` namespace. Set fields overwrite, unset
/// fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct LlmPatch {
    pub provider: Option<Provider>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment_name: Option<String>,
    pub api_version: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub model_type: Option<ModelType>,
}

impl LlmSettings {
    /// Shallow per-field merge of a patch over the current values.
    pub fn apply(&mut self, patch: LlmPatch) {
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(endpoint) = patch.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = api_key;
        }
        if let Some(deployment_name) = patch.deployment_name {
            self.deployment_name = deployment_name;
        }
        if let Some(api_version) = patch.api_version {
            self.api_version = api_version;
        }
        if let Some(model_name) = patch.model_name {
            self.model_name = model_name;
        }
        if let Some(temperature) = patch.temperature {
            self.temperature = temperature;
        }
        if let Some(model_type) = patch.model_type {
            self.model_type = model_type;
        }
    }
}

/// Partial update for the `msgraph` namespace.
#[derive(Debug, Clone, Default)]
pub struct MsGraphPatch {
    pub client_id: Option<String>,
    pub tenant_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl MsGraphSettings {
    /// Shallow per-field merge of a patch over the current values.
    pub fn apply(&mut self, patch: MsGraphPatch) {
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(tenant_id) = patch.tenant_id {
            self.tenant_id = tenant_id;
        }
        if let Some(client_secret) = patch.client_secret {
            self.client_secret = client_secret;
        }
        if let Some(redirect_uri) = patch.redirect_uri {
            self.redirect_uri = redirect_uri;
        }
    }
}
