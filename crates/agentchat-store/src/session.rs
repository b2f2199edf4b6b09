//! Session identity manager.

use agentchat_common::{SessionId, StoreError};
use tracing::info;

use crate::local_store::LocalStore;

/// Return the profile's session id, generating and persisting one if
/// none exists yet.
///
/// Read-before-write: a persisted id is returned unchanged, so two
/// processes sharing the same store cannot race into different ids once
/// one of them has committed. Idempotent across calls.
pub fn get_or_create_session_id(store: &LocalStore) -> Result<SessionId, StoreError> {
    if let Some(existing) = store.load_session_id()? {
        return Ok(existing);
    }

    let session_id = SessionId::generate();
    store.save_session_id(&session_id)?;
    info!(session_id = %session_id, "generated new session id");
    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_and_persists_on_first_call() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open_at(dir.path());

        let sid = get_or_create_session_id(&store).unwrap();
        assert!(!sid.as_str().is_empty());
        assert_eq!(store.load_session_id().unwrap(), Some(sid));
    }

    #[test]
    fn two_calls_return_the_identical_id() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open_at(dir.path());

        let first = get_or_create_session_id(&store).unwrap();
        let second = get_or_create_session_id(&store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn existing_id_is_never_regenerated() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open_at(dir.path());

        let prior = SessionId::from("session_0123456789ab_1700000000000".to_string());
        store.save_session_id(&prior).unwrap();

        let got = get_or_create_session_id(&store).unwrap();
        assert_eq!(got, prior);
    }

    #[test]
    fn separate_stores_get_separate_ids() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let a = get_or_create_session_id(&LocalStore::open_at(dir_a.path())).unwrap();
        let b = get_or_create_session_id(&LocalStore::open_at(dir_b.path())).unwrap();
        assert_ne!(a, b);
    }
}
