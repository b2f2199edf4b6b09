//! Local persistent store for the agentchat client.
//!
//! This is the durable tier of the settings synchronization design: one
//! logical slot per profile for the session id and one for the full
//! settings record, stored as JSON with atomic writes. Also hosts the
//! session identity manager, which reads before it ever writes so an
//! existing id is never regenerated.

pub mod local_store;
pub mod schema;
pub mod session;

pub use local_store::LocalStore;
pub use schema::{LlmPatch, LlmSettings, ModelType, MsGraphPatch, MsGraphSettings, Provider, Settings};
pub use session::get_or_create_session_id;
