use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque client session identifier.
///
/// Correlates one profile's conversation and settings with backend-side
/// per-session state. Generated once per profile and persisted; the
/// persisted value is never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh id: a random component plus a millisecond
    /// timestamp, enough to avoid collisions across concurrent
    /// processes sharing the same profile.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let bytes = uuid.as_bytes();
        let random = format!(
            "{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]
        );
        let millis = chrono::Utc::now().timestamp_millis();
        Self(format!("session_{random}_{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
