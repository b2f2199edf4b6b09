//! Client core for the agentchat conversation view.
//!
//! Two engines with real state:
//! - [`SettingsEngine`] resolves and propagates model-provider
//!   configuration across three tiers (remote session-scoped store,
//!   local persistent store, in-memory defaults) with a local-first,
//!   remote-best-effort consistency policy.
//! - [`Conversation`] owns one view's ordered message log and drives the
//!   optimistic send state machine against the transport adapter.

pub mod conversation;
pub mod message;
pub mod settings;

pub use conversation::{Conversation, SendState, SubmitOutcome};
pub use message::{FileMeta, Message, Sender, SEND_FAILURE_TEXT};
pub use settings::SettingsEngine;
