//! JSON-backed local store with atomic writes.
//!
//! Two slots per profile: the session id (opaque string) and the full
//! settings record. Writes go to a `.tmp` file first, then rename, so a
//! crash mid-write never corrupts the slot.

use std::path::{Path, PathBuf};

use agentchat_common::{SessionId, StoreError};

use crate::schema::Settings;

const SESSION_ID_FILE: &str = "session_id";
const SETTINGS_FILE: &str = "settings.json";

/// Handle to the per-profile local store directory.
///
/// Holding a `LocalStore` is the "persistent storage available"
/// precondition for the session identity manager: no id is invented
/// before a store exists.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open the store at the platform default location.
    ///
    /// On macOS: `~/Library/Application Support/agentchat/`
    /// On Linux: `~/.config/agentchat/`
    pub fn open() -> Result<Self, StoreError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            StoreError::ParseError("could not determine config directory".into())
        })?;
        Ok(Self::open_at(config_dir.join("agentchat")))
    }

    /// Open the store rooted at a specific directory.
    pub fn open_at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the persisted session id, if any.
    pub fn load_session_id(&self) -> Result<Option<SessionId>, StoreError> {
        let path = self.dir.join(SESSION_ID_FILE);
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let value = raw.trim().to_string();
                if value.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SessionId::from(value)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadError {
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Persist the session id.
    pub fn save_session_id(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.write_atomic(SESSION_ID_FILE, session_id.as_str().as_bytes())
    }

    /// Read the persisted settings record, if any.
    pub fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        let path = self.dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let settings: Settings = serde_json::from_str(&raw).map_err(|e| {
                    StoreError::ParseError(format!("invalid settings JSON: {e}"))
                })?;
                Ok(Some(settings))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadError {
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Persist the full settings record as JSON.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| StoreError::ParseError(format!("failed to serialize settings: {e}")))?;
        self.write_atomic(SETTINGS_FILE, json.as_bytes())
    }

    /// Atomic write: write to `.tmp`, then rename. Creates the store
    /// directory on first use.
    fn write_atomic(&self, file: &str, contents: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::WriteError {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;

        let path = self.dir.join(file);
        let tmp_path = self.dir.join(format!("{file}.tmp"));
        std::fs::write(&tmp_path, contents).map_err(|e| StoreError::WriteError {
            path: tmp_path.clone(),
            reason: e.to_string(),
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            // Rename failed — try direct write as fallback (Windows compat)
            tracing::warn!("atomic rename failed ({e}), falling back to direct write");
            std::fs::write(&path, contents).map_err(|e2| StoreError::WriteError {
                path: path.clone(),
                reason: e2.to_string(),
            })?;
        }

        tracing::debug!(path = %path.display(), "store slot written");
        Ok(())
    }
}
