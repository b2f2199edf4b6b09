//! Per-view chat orchestration: ordered message log plus the send state
//! machine.

use tracing::{error, info, warn};

use agentchat_api::{AgentApi, FileUpload};
use agentchat_common::SessionId;

use crate::message::{FileMeta, Message};

/// Send state for one conversation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

/// What happened to a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A send attempt ran to completion (the log ends with either an ai
    /// reply or the fixed error bubble).
    Sent,
    /// Empty text and no files; nothing happened.
    Ignored,
    /// A send was already in flight; nothing happened.
    Busy,
}

/// One conversation view's message log and send state.
///
/// The log is append-only and never reordered; entries are removed only
/// by clearing the whole log. The log lives as long as this value —
/// there is no persistence behind it.
pub struct Conversation {
    messages: Vec<Message>,
    state: SendState,
    session_id: Option<SessionId>,
}

impl Conversation {
    /// Start a conversation, optionally pre-bound to a session. An
    /// unbound conversation adopts the session id from the first reply
    /// that carries one.
    pub fn new(session_id: Option<SessionId>) -> Self {
        Self {
            messages: Vec::new(),
            state: SendState::Idle,
            session_id,
        }
    }

    /// The log in exact append order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Submit one message: optimistic `user` append, single send
    /// attempt, then either the ai reply or a fixed-text error bubble.
    ///
    /// Guards are checked here, not left to the caller: an empty submit
    /// is ignored and a submit while one is in flight is rejected.
    pub async fn submit(
        &mut self,
        api: &dyn AgentApi,
        text: &str,
        files: Vec<FileUpload>,
    ) -> SubmitOutcome {
        if self.state == SendState::Sending {
            return SubmitOutcome::Busy;
        }
        if text.trim().is_empty() && files.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let metadata = files
            .iter()
            .map(|f| FileMeta {
                name: f.name.clone(),
                size: f.size(),
            })
            .collect();
        self.messages.push(Message::user(text, metadata));
        self.state = SendState::Sending;

        match api.send_message(text, &files, self.session_id.as_ref()).await {
            Ok(reply) => {
                // First-turn binding: adopt the backend's session id if
                // this view was not already bound to one.
                if self.session_id.is_none() {
                    if let Some(sid) = reply.session_id {
                        info!(session_id = %sid, "conversation bound to session");
                        self.session_id = Some(SessionId::from(sid));
                    }
                }
                self.messages.push(Message::ai(reply.message));
            }
            Err(e) => {
                error!("chat send failed: {e}");
                self.messages.push(Message::send_failure());
            }
        }

        self.state = SendState::Idle;
        SubmitOutcome::Sent
    }

    /// Empty the log, then best-effort clear server-side history for the
    /// bound session. The local log is the source of truth for what the
    /// user sees: it stays cleared even if the remote call fails.
    ///
    /// Callable only from `Idle`; returns `false` without clearing while
    /// a send is in flight. Destructive and irreversible — callers
    /// confirm with the user before invoking.
    pub async fn clear_history(&mut self, api: &dyn AgentApi) -> bool {
        if self.state == SendState::Sending {
            return false;
        }

        self.messages.clear();

        if let Some(sid) = &self.session_id {
            if let Err(e) = api.clear_history(sid).await {
                warn!("server-side history clear failed: {e}");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Sender, SEND_FAILURE_TEXT};
    use agentchat_api::{ApiError, ChatReply};
    use agentchat_store::{LlmSettings, MsGraphSettings};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted transport: pops one canned send result per call and
    /// records what it was asked to send.
    #[derive(Default)]
    struct FakeApi {
        replies: Mutex<Vec<Result<ChatReply, ApiError>>>,
        seen_sessions: Mutex<Vec<Option<String>>>,
        seen_files: Mutex<Vec<Vec<(String, u64)>>>,
        clear_fails: bool,
        clear_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with_replies(replies: Vec<Result<ChatReply, ApiError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl AgentApi for FakeApi {
        async fn send_message(
            &self,
            _text: &str,
            files: &[FileUpload],
            session_id: Option<&SessionId>,
        ) -> Result<ChatReply, ApiError> {
            self.seen_sessions
                .lock()
                .unwrap()
                .push(session_id.map(|s| s.as_str().to_string()));
            self.seen_files
                .lock()
                .unwrap()
                .push(files.iter().map(|f| (f.name.clone(), f.size())).collect());
            self.replies.lock().unwrap().remove(0)
        }

        async fn clear_history(&self, _session_id: &SessionId) -> Result<(), ApiError> {
            self.clear_calls.fetch_add(1, Ordering::SeqCst);
            if self.clear_fails {
                Err(ApiError::Network("connection refused".into()))
            } else {
                Ok(())
            }
        }

        async fn get_session_settings(
            &self,
            _session_id: &SessionId,
        ) -> Result<Option<LlmSettings>, ApiError> {
            Ok(None)
        }

        async fn save_session_settings(
            &self,
            _session_id: &SessionId,
            _settings: &LlmSettings,
        ) -> Result<(), ApiError> {
            Ok(())
        }

        async fn save_global_settings(
            &self,
            _settings: &MsGraphSettings,
        ) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn ok_reply(message: &str, session_id: Option<&str>) -> Result<ChatReply, ApiError> {
        Ok(ChatReply {
            message: message.into(),
            session_id: session_id.map(String::from),
        })
    }

    #[tokio::test]
    async fn empty_submit_is_a_no_op() {
        let api = FakeApi::default();
        let mut conv = Conversation::new(None);

        let outcome = conv.submit(&api, "   ", Vec::new()).await;
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(conv.messages().is_empty());
        assert_eq!(conv.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn successful_send_appends_user_then_ai() {
        let api = FakeApi::with_replies(vec![ok_reply("hi there", None)]);
        let mut conv = Conversation::new(None);

        let outcome = conv.submit(&api, "hello", Vec::new()).await;
        assert_eq!(outcome, SubmitOutcome::Sent);

        let log = conv.messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Sender::User);
        assert_eq!(log[0].content, "hello");
        assert_eq!(log[1].sender, Sender::Ai);
        assert_eq!(log[1].content, "hi there");
        assert_eq!(conv.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn failed_send_appends_fixed_error_bubble() {
        let api = FakeApi::with_replies(vec![Err(ApiError::Network("timeout".into()))]);
        let mut conv = Conversation::new(None);

        conv.submit(&api, "hello", Vec::new()).await;

        let log = conv.messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Sender::User);
        assert_eq!(log[0].content, "hello");
        assert_eq!(log[1].sender, Sender::System);
        assert!(log[1].is_error);
        assert_eq!(log[1].content, SEND_FAILURE_TEXT);
        assert_eq!(conv.state(), SendState::Idle);
    }

    #[tokio::test]
    async fn submit_while_sending_is_rejected() {
        let api = FakeApi::default();
        let mut conv = Conversation::new(None);
        conv.state = SendState::Sending;

        let outcome = conv.submit(&api, "hello", Vec::new()).await;
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert!(conv.messages().is_empty());
        assert!(api.seen_sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn files_are_logged_as_metadata_only() {
        let api = FakeApi::with_replies(vec![ok_reply("got it", None)]);
        let mut conv = Conversation::new(None);

        let files = vec![FileUpload::new("notes.txt", vec![0u8; 512])];
        conv.submit(&api, "", files).await;

        let log = conv.messages();
        assert_eq!(log[0].files, vec![FileMeta { name: "notes.txt".into(), size: 512 }]);
        // The transport saw the raw bytes.
        assert_eq!(
            api.seen_files.lock().unwrap()[0],
            vec![("notes.txt".to_string(), 512)]
        );
    }

    #[tokio::test]
    async fn first_turn_reply_binds_the_session() {
        let api = FakeApi::with_replies(vec![
            ok_reply("hi", Some("session_from_backend")),
            ok_reply("again", None),
        ]);
        let mut conv = Conversation::new(None);

        conv.submit(&api, "hello", Vec::new()).await;
        assert_eq!(
            conv.session_id().map(SessionId::as_str),
            Some("session_from_backend")
        );

        conv.submit(&api, "more", Vec::new()).await;
        let seen = api.seen_sessions.lock().unwrap();
        assert_eq!(seen[0], None);
        assert_eq!(seen[1], Some("session_from_backend".to_string()));
    }

    #[tokio::test]
    async fn bound_session_is_not_rebound() {
        let api = FakeApi::with_replies(vec![ok_reply("hi", Some("other_session"))]);
        let sid = SessionId::from("session_mine".to_string());
        let mut conv = Conversation::new(Some(sid.clone()));

        conv.submit(&api, "hello", Vec::new()).await;
        assert_eq!(conv.session_id(), Some(&sid));
    }

    #[tokio::test]
    async fn clear_history_empties_log_even_when_remote_clear_fails() {
        let mut api = FakeApi::with_replies(vec![ok_reply("hi", Some("session_x"))]);
        api.clear_fails = true;
        let mut conv = Conversation::new(None);
        conv.submit(&api, "hello", Vec::new()).await;
        assert_eq!(conv.messages().len(), 2);

        assert!(conv.clear_history(&api).await);
        assert!(conv.messages().is_empty());
        assert_eq!(api.clear_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_history_is_rejected_while_sending() {
        let api = FakeApi::with_replies(vec![ok_reply("hi", None)]);
        let mut conv = Conversation::new(None);
        conv.submit(&api, "hello", Vec::new()).await;
        conv.state = SendState::Sending;

        assert!(!conv.clear_history(&api).await);
        assert_eq!(conv.messages().len(), 2);
    }

    #[tokio::test]
    async fn unbound_clear_skips_the_remote_call() {
        let api = FakeApi::default();
        let mut conv = Conversation::new(None);

        assert!(conv.clear_history(&api).await);
        assert_eq!(api.clear_calls.load(Ordering::SeqCst), 0);
    }
}
