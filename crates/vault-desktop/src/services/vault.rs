//! Vault service for the desktop application
//!
//! Bundles the HTTP backend, session manager, and item store gateway behind
//! the handful of calls the UI makes.

use tokio::sync::watch;

use vault_core::backend::HttpBackend;
use vault_core::config::VaultConfig;
use vault_core::error::{Error, Result};
use vault_core::models::{ItemDraft, ItemId, OwnerId};
use vault_core::session::SessionManager;
use vault_core::store::{ItemFeed, ItemStore};

use super::KeyringSessionStore;

/// Service wiring for identity and item storage
pub struct VaultService {
    session: SessionManager<HttpBackend, KeyringSessionStore>,
    store: ItemStore<HttpBackend>,
}

impl VaultService {
    /// Build the service from validated startup configuration
    pub fn new(config: &VaultConfig) -> Result<Self> {
        let backend = HttpBackend::new(config)?;
        let session = SessionManager::new(
            backend.clone(),
            KeyringSessionStore::default(),
            config.bootstrap_token.clone(),
        );
        let store = ItemStore::new(backend, config.app_id.clone());
        Ok(Self { session, store })
    }

    /// Establish the session (persisted, token, or anonymous fallback)
    pub async fn resolve_session(&self) -> Result<OwnerId> {
        self.session.resolve().await
    }

    /// Watch owner transitions for feed re-scoping
    pub fn watch_owner(&self) -> watch::Receiver<Option<OwnerId>> {
        self.session.watch_owner()
    }

    pub fn owner_id(&self) -> Option<OwnerId> {
        self.session.owner_id()
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Persist a drafted item for the current owner
    pub async fn save_item(&self, draft: ItemDraft) -> Result<ItemId> {
        let Some(owner_id) = self.session.owner_id() else {
            tracing::error!("Session is not ready; refusing to save item");
            return Err(Error::SessionNotReady);
        };
        self.store.create(&owner_id, draft).await
    }

    /// Delete an item from the current owner's collection
    pub async fn delete_item(&self, id: &ItemId) -> Result<()> {
        let Some(owner_id) = self.session.owner_id() else {
            tracing::error!("Session is not ready; refusing to delete item");
            return Err(Error::SessionNotReady);
        };
        self.store.delete(&owner_id, id).await
    }

    /// Open the live item feed for the given owner
    pub async fn subscribe_items(&self, owner_id: &OwnerId) -> Result<ItemFeed> {
        self.store.subscribe(owner_id).await
    }
}
