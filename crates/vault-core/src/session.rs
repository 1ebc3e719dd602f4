//! Session manager: establishes and tracks the active owner identity.
//!
//! On `resolve` the manager restores a persisted session when one is still
//! valid, otherwise signs in with the configured bootstrap token, otherwise
//! falls back to a fresh anonymous session. Owner transitions are published
//! over a watch channel so the coordinator can re-scope the item feed.

use std::sync::RwLock;

use tokio::sync::watch;

use crate::backend::VaultBackend;
use crate::error::Result;
use crate::models::{OwnerId, OwnerSession};

/// Persistence seam for the active session between runs
pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> Result<Option<OwnerSession>>;
    fn save_session(&self, session: &OwnerSession) -> Result<()>;
    fn clear_session(&self) -> Result<()>;
}

/// In-process session store, used by tests and ephemeral setups
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: std::sync::Arc<RwLock<Option<OwnerSession>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a stored session, as a previous run would have left it
    #[must_use]
    pub fn with_session(session: OwnerSession) -> Self {
        let store = Self::new();
        *store.inner.write().expect("session lock poisoned") = Some(session);
        store
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> Result<Option<OwnerSession>> {
        Ok(self.inner.read().expect("session lock poisoned").clone())
    }

    fn save_session(&self, session: &OwnerSession) -> Result<()> {
        *self.inner.write().expect("session lock poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        *self.inner.write().expect("session lock poisoned") = None;
        Ok(())
    }
}

/// Establishes exactly one active session for the process lifetime and
/// exposes the current owner plus a readiness flag.
pub struct SessionManager<B: VaultBackend, S: SessionPersistence> {
    backend: B,
    store: S,
    bootstrap_token: Option<String>,
    session: RwLock<Option<OwnerSession>>,
    owner_tx: watch::Sender<Option<OwnerId>>,
}

impl<B: VaultBackend, S: SessionPersistence> SessionManager<B, S> {
    pub fn new(backend: B, store: S, bootstrap_token: Option<String>) -> Self {
        let (owner_tx, _) = watch::channel(None);
        Self {
            backend,
            store,
            bootstrap_token,
            session: RwLock::new(None),
            owner_tx,
        }
    }

    /// Establish the session: persisted first, then bootstrap token, then a
    /// fresh anonymous identity.
    ///
    /// On failure the manager stays not-ready; there is no retry policy.
    pub async fn resolve(&self) -> Result<OwnerId> {
        if let Some(stored) = self.load_persisted()? {
            let owner_id = self.backend.resume_session(&stored).await?;
            tracing::info!(%owner_id, "Restored persisted session");
            self.activate(stored);
            return Ok(owner_id);
        }

        let session = match &self.bootstrap_token {
            Some(token) => {
                tracing::info!("Signing in with bootstrap token");
                self.backend.sign_in_with_token(token).await?
            }
            None => {
                tracing::info!("Signing in anonymously");
                self.backend.sign_in_anonymous().await?
            }
        };

        if let Err(error) = self.store.save_session(&session) {
            tracing::warn!("Failed to persist session: {error}");
        }

        let owner_id = session.owner_id.clone();
        self.activate(session);
        Ok(owner_id)
    }

    /// True once an owner identity is known
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.session
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    /// Current owner identifier, absent until resolved
    #[must_use]
    pub fn owner_id(&self) -> Option<OwnerId> {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|session| session.owner_id.clone())
    }

    /// Active session, if signed in
    #[must_use]
    pub fn current_session(&self) -> Option<OwnerSession> {
        self.session.read().expect("session lock poisoned").clone()
    }

    /// Watch owner transitions; fires on every sign-in and sign-out
    #[must_use]
    pub fn watch_owner(&self) -> watch::Receiver<Option<OwnerId>> {
        self.owner_tx.subscribe()
    }

    /// Tear the session down, clearing persistence and publishing `None`
    pub fn sign_out(&self) -> Result<()> {
        self.store.clear_session()?;
        *self.session.write().expect("session lock poisoned") = None;
        self.owner_tx.send_replace(None);
        Ok(())
    }

    fn load_persisted(&self) -> Result<Option<OwnerSession>> {
        let Some(stored) = self.store.load_session()? else {
            return Ok(None);
        };

        if stored.is_expired() {
            tracing::info!("Discarding expired persisted session");
            if let Err(error) = self.store.clear_session() {
                tracing::warn!("Failed to clear expired session: {error}");
            }
            return Ok(None);
        }

        Ok(Some(stored))
    }

    fn activate(&self, session: OwnerSession) {
        let owner_id = session.owner_id.clone();
        *self.session.write().expect("session lock poisoned") = Some(session);
        self.owner_tx.send_replace(Some(owner_id));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::MemoryBackend;

    fn manager(
        store: MemorySessionStore,
        bootstrap_token: Option<String>,
    ) -> SessionManager<MemoryBackend, MemorySessionStore> {
        SessionManager::new(MemoryBackend::new(), store, bootstrap_token)
    }

    fn stored_session(owner: &str, expires_at: i64) -> OwnerSession {
        OwnerSession {
            owner_id: OwnerId::from(owner),
            access_token: "stored-token".to_string(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn resolves_anonymously_without_token_or_stored_session() {
        let session_manager = manager(MemorySessionStore::new(), None);
        assert!(!session_manager.is_ready());

        let owner = session_manager.resolve().await.unwrap();
        assert!(owner.as_str().starts_with("anon-"));
        assert!(session_manager.is_ready());
        assert_eq!(session_manager.owner_id(), Some(owner));
    }

    #[tokio::test]
    async fn prefers_bootstrap_token_over_anonymous() {
        let session_manager = manager(MemorySessionStore::new(), Some("boot".to_string()));
        let owner = session_manager.resolve().await.unwrap();
        assert_eq!(owner.as_str(), "tok-boot");
    }

    #[tokio::test]
    async fn restores_valid_persisted_session() {
        let future = chrono::Utc::now().timestamp() + 3600;
        let store = MemorySessionStore::with_session(stored_session("persisted-owner", future));
        let session_manager = manager(store, Some("boot".to_string()));

        let owner = session_manager.resolve().await.unwrap();
        // A persisted session wins over the bootstrap token
        assert_eq!(owner.as_str(), "persisted-owner");
    }

    #[tokio::test]
    async fn discards_expired_persisted_session() {
        let store = MemorySessionStore::with_session(stored_session("stale-owner", 0));
        let session_manager = manager(store.clone(), None);

        let owner = session_manager.resolve().await.unwrap();
        assert_ne!(owner.as_str(), "stale-owner");
        // The stale entry was replaced by the fresh session
        let persisted = store.load_session().unwrap().unwrap();
        assert_eq!(persisted.owner_id, owner);
    }

    #[tokio::test]
    async fn resolve_persists_the_new_session() {
        let store = MemorySessionStore::new();
        let session_manager = manager(store.clone(), None);

        let owner = session_manager.resolve().await.unwrap();
        let persisted = store.load_session().unwrap().unwrap();
        assert_eq!(persisted.owner_id, owner);
    }

    #[tokio::test]
    async fn owner_watch_observes_sign_in_and_sign_out() {
        let session_manager = manager(MemorySessionStore::new(), None);
        let mut owner_rx = session_manager.watch_owner();
        assert_eq!(*owner_rx.borrow_and_update(), None);

        let owner = session_manager.resolve().await.unwrap();
        owner_rx.changed().await.unwrap();
        assert_eq!(*owner_rx.borrow_and_update(), Some(owner));

        session_manager.sign_out().unwrap();
        owner_rx.changed().await.unwrap();
        assert_eq!(*owner_rx.borrow_and_update(), None);
        assert!(!session_manager.is_ready());
    }
}
