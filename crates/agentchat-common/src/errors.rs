use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store read error at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("store write error at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("store parse error: {0}")]
    ParseError(String),
}
