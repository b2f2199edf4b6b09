//! Settings synchronization engine.
//!
//! Three tiers: remote session-scoped store, local persistent store,
//! in-memory defaults. The local store is the durability guarantee; the
//! remote store is a best-effort mirror for session continuity. Mutators
//! commit to memory and the local store first, then mirror remotely —
//! remote failure never rolls the local commit back.

use tracing::{error, info, warn};

use agentchat_api::AgentApi;
use agentchat_common::SessionId;
use agentchat_store::{LlmPatch, LocalStore, MsGraphPatch, Settings};

/// Owns the resolved settings record for one client process.
///
/// The store handle is injected at construction; consumers receive
/// snapshots from [`settings`](Self::settings) and mutate only through
/// [`update_llm`](Self::update_llm) / [`update_msgraph`](Self::update_msgraph).
/// Concurrent mutators are last-write-wins — a known limitation of the
/// design, not a bug.
pub struct SettingsEngine {
    settings: Settings,
    store: LocalStore,
    resolved_for: Option<SessionId>,
}

impl SettingsEngine {
    /// Start with built-in defaults; call [`load`](Self::load) to
    /// resolve against the remote and local tiers.
    pub fn new(store: LocalStore) -> Self {
        Self {
            settings: Settings::default(),
            store,
            resolved_for: None,
        }
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.clone()
    }

    /// Resolve settings for a session id. Runs the tier chain exactly
    /// once per session id activation; repeat calls for the same id
    /// return the current snapshot unchanged.
    ///
    /// Chain: remote session-scoped fetch (adopting its `llm` payload;
    /// `msgraph` stays on the local/default tier, the remote tier does
    /// not carry it) → local record, replicated to the remote store as a
    /// best-effort write-through → built-in defaults.
    pub async fn load(&mut self, api: &dyn AgentApi, session_id: &SessionId) -> Settings {
        if self.resolved_for.as_ref() == Some(session_id) {
            return self.settings.clone();
        }

        let local = match self.store.load_settings() {
            Ok(local) => local,
            Err(e) => {
                warn!("local settings read failed: {e}");
                None
            }
        };

        let remote_llm = match api.get_session_settings(session_id).await {
            Ok(remote) => remote,
            Err(e) => {
                // Resolution fallback, not an error: move to the next tier.
                warn!("session settings fetch failed: {e}");
                None
            }
        };

        if let Some(llm) = remote_llm {
            let msgraph = local.map(|s| s.msgraph).unwrap_or_default();
            self.settings = Settings { llm, msgraph };
            info!(session_id = %session_id, "adopted session-scoped settings");
        } else if let Some(local) = local {
            self.settings = local;
            info!("adopted local settings");
            if let Err(e) = api
                .save_session_settings(session_id, &self.settings.llm)
                .await
            {
                warn!("failed to replicate local settings to session store: {e}");
            }
        } else {
            self.settings = Settings::default();
            info!("no stored settings, using defaults");
        }

        self.resolved_for = Some(session_id.clone());
        self.settings.clone()
    }

    /// Merge a partial update into the `llm` namespace, write the merged
    /// record to the local store, then mirror it to the remote
    /// session-scoped store. Returns `true` only if the remote write
    /// succeeded; the in-memory/local commit stands either way.
    pub async fn update_llm(&mut self, api: &dyn AgentApi, patch: LlmPatch) -> bool {
        self.settings.llm.apply(patch);
        self.commit_local();

        match &self.resolved_for {
            Some(session_id) => {
                match api.save_session_settings(session_id, &self.settings.llm).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("session settings mirror failed: {e}");
                        false
                    }
                }
            }
            None => {
                warn!("no active session, llm settings kept local only");
                false
            }
        }
    }

    /// Merge a partial update into the `msgraph` namespace; same
    /// local-first pattern, mirrored to the global (non-session) store.
    pub async fn update_msgraph(&mut self, api: &dyn AgentApi, patch: MsGraphPatch) -> bool {
        self.settings.msgraph.apply(patch);
        self.commit_local();

        match api.save_global_settings(&self.settings.msgraph).await {
            Ok(()) => true,
            Err(e) => {
                warn!("msgraph settings mirror failed: {e}");
                false
            }
        }
    }

    /// Local tier write. The in-memory value is already committed; a
    /// local write failure is logged and the engine keeps going.
    fn commit_local(&self) {
        if let Err(e) = self.store.save_settings(&self.settings) {
            error!("local settings write failed: {e}");
        }
    }
}
