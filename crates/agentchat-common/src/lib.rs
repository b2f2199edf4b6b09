//! Shared types for the agentchat client.
//!
//! Holds the session identity type and the error types used by the
//! local persistent store.

pub mod errors;
pub mod id;

pub use errors::StoreError;
pub use id::SessionId;
