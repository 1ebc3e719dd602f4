//! In-memory backend: the collaborator contract without a network.
//!
//! Used as the test double for the session manager and item store gateways.
//! Change propagation is push-based over the same feed shape the HTTP
//! backend produces.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use super::{CollectionPath, DocumentFeed, SubscriptionGuard, VaultBackend};
use crate::error::Result;
use crate::models::{Item, ItemId, NewItem, OwnerId, OwnerSession};

const SESSION_TTL_SECONDS: i64 = 3600;

/// In-process document store keyed by collection path
#[derive(Clone, Default)]
pub struct MemoryBackend {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
}

struct Collection {
    documents: Vec<Item>,
    publisher: watch::Sender<Vec<Item>>,
}

impl Collection {
    fn new() -> Self {
        let (publisher, _) = watch::channel(Vec::new());
        Self {
            documents: Vec::new(),
            publisher,
        }
    }

    fn publish(&self) {
        // send_replace stores the snapshot even while nobody is subscribed
        self.publisher.send_replace(self.documents.clone());
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_session(owner_id: OwnerId) -> OwnerSession {
        OwnerSession {
            owner_id,
            access_token: Uuid::now_v7().to_string(),
            expires_at: chrono::Utc::now().timestamp() + SESSION_TTL_SECONDS,
        }
    }

    fn with_collection<T>(&self, path: &CollectionPath, action: impl FnOnce(&mut Collection) -> T) -> T {
        let mut collections = self.collections.lock().expect("collection lock poisoned");
        let collection = collections
            .entry(path.as_str().to_string())
            .or_insert_with(Collection::new);
        action(collection)
    }
}

impl VaultBackend for MemoryBackend {
    async fn sign_in_anonymous(&self) -> Result<OwnerSession> {
        let owner_id = OwnerId::from(format!("anon-{}", Uuid::now_v7().simple()));
        Ok(Self::fresh_session(owner_id))
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<OwnerSession> {
        // Deterministic owner per token, so repeated sign-ins land on the
        // same collection path
        let owner_id = OwnerId::from(format!("tok-{token}"));
        Ok(Self::fresh_session(owner_id))
    }

    async fn resume_session(&self, session: &OwnerSession) -> Result<OwnerId> {
        Ok(session.owner_id.clone())
    }

    async fn create_document(&self, path: &CollectionPath, document: &NewItem) -> Result<ItemId> {
        let id = ItemId::generate();
        self.with_collection(path, |collection| {
            collection.documents.push(document.clone().into_item(id.clone()));
            collection.publish();
        });
        Ok(id)
    }

    async fn delete_document(&self, path: &CollectionPath, id: &ItemId) -> Result<()> {
        self.with_collection(path, |collection| {
            let before = collection.documents.len();
            collection.documents.retain(|item| item.id != *id);
            if collection.documents.len() == before {
                // Removing an absent document is a no-op, as in the hosted service
                tracing::debug!(%path, %id, "delete for unknown document id");
            }
            collection.publish();
        });
        Ok(())
    }

    async fn subscribe(&self, path: &CollectionPath) -> Result<DocumentFeed> {
        let receiver = self.with_collection(path, |collection| collection.publisher.subscribe());
        Ok(DocumentFeed::new(receiver, SubscriptionGuard::detached()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::ItemDraft;

    fn new_item(owner: &OwnerId, body: &str) -> NewItem {
        NewItem::from_draft(
            ItemDraft::text(Some("title"), body).unwrap(),
            owner.clone(),
        )
    }

    #[tokio::test]
    async fn anonymous_sessions_are_unique() {
        let backend = MemoryBackend::new();
        let first = backend.sign_in_anonymous().await.unwrap();
        let second = backend.sign_in_anonymous().await.unwrap();
        assert_ne!(first.owner_id, second.owner_id);
        assert!(!first.is_expired());
    }

    #[tokio::test]
    async fn token_sign_in_is_deterministic() {
        let backend = MemoryBackend::new();
        let first = backend.sign_in_with_token("abc").await.unwrap();
        let second = backend.sign_in_with_token("abc").await.unwrap();
        assert_eq!(first.owner_id, second.owner_id);
    }

    #[tokio::test]
    async fn created_documents_reach_subscribers() {
        let backend = MemoryBackend::new();
        let owner = OwnerId::from("alice");
        let path = CollectionPath::for_owner("app", &owner);

        let mut feed = backend.subscribe(&path).await.unwrap();
        assert_eq!(feed.next_snapshot().await, Some(Vec::new()));

        let id = backend
            .create_document(&path, &new_item(&owner, "hello"))
            .await
            .unwrap();

        let snapshot = feed.next_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(snapshot[0].content, "hello");
    }

    #[tokio::test]
    async fn delete_removes_exactly_the_targeted_document() {
        let backend = MemoryBackend::new();
        let owner = OwnerId::from("alice");
        let path = CollectionPath::for_owner("app", &owner);

        let keep = backend
            .create_document(&path, &new_item(&owner, "keep"))
            .await
            .unwrap();
        let gone = backend
            .create_document(&path, &new_item(&owner, "gone"))
            .await
            .unwrap();

        backend.delete_document(&path, &gone).await.unwrap();

        let feed = backend.subscribe(&path).await.unwrap();
        let snapshot = feed.current();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, keep);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_noop() {
        let backend = MemoryBackend::new();
        let path = CollectionPath::for_owner("app", &OwnerId::from("alice"));
        assert!(backend
            .delete_document(&path, &ItemId::from("missing"))
            .await
            .is_ok());
    }
}
