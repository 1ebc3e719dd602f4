//! Backend collaborator contract.
//!
//! The vault delegates identity and document storage to an external
//! collaborator. This module defines the contract the rest of the crate
//! programs against, plus two implementations: an HTTP client for the hosted
//! service and an in-memory backend used as the test double.

mod http;
mod memory;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use crate::models::{Item, ItemId, NewItem, OwnerId, OwnerSession};

/// Owner-scoped storage location for a user's items.
///
/// The path is fully determined by the application id and the owner id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Build the canonical per-owner path: `artifacts/{app_id}/users/{owner_id}/files`
    #[must_use]
    pub fn for_owner(app_id: &str, owner_id: &OwnerId) -> Self {
        Self(format!("artifacts/{app_id}/users/{owner_id}/files"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, for URL construction
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live feed of full-collection snapshots.
///
/// The first call to [`DocumentFeed::next_snapshot`] yields the current list
/// immediately; later calls resolve whenever the collection changes. Dropping
/// the feed detaches the subscription.
pub struct DocumentFeed {
    receiver: watch::Receiver<Vec<Item>>,
    guard: SubscriptionGuard,
    delivered_initial: bool,
}

impl DocumentFeed {
    #[must_use]
    pub fn new(receiver: watch::Receiver<Vec<Item>>, guard: SubscriptionGuard) -> Self {
        Self {
            receiver,
            guard,
            delivered_initial: false,
        }
    }

    /// The latest snapshot, without waiting
    #[must_use]
    pub fn current(&self) -> Vec<Item> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the publishing side has gone away (the
    /// subscription failed or was torn down).
    pub async fn next_snapshot(&mut self) -> Option<Vec<Item>> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Consume the feed, keeping its guard alive alongside the raw receiver
    #[must_use]
    pub fn into_parts(self) -> (watch::Receiver<Vec<Item>>, SubscriptionGuard) {
        (self.receiver, self.guard)
    }
}

/// Detaches a live subscription when dropped.
///
/// Backends that drive a feed from a background task hand the task handle
/// over; push-based backends that need no task use [`SubscriptionGuard::detached`].
#[derive(Debug, Default)]
pub struct SubscriptionGuard {
    task: Option<JoinHandle<()>>,
}

impl SubscriptionGuard {
    #[must_use]
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A guard with nothing to tear down
    #[must_use]
    pub fn detached() -> Self {
        Self { task: None }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Contract implemented by every storage/identity collaborator.
///
/// Mirrors the hosted service's surface: two sign-in operations, session
/// resumption for persisted credentials, and per-path document create,
/// delete, and live-list operations.
pub trait VaultBackend: Clone + Send + Sync + 'static {
    /// Create a fresh anonymous session
    async fn sign_in_anonymous(&self) -> Result<OwnerSession>;

    /// Exchange an externally supplied token for a session
    async fn sign_in_with_token(&self, token: &str) -> Result<OwnerSession>;

    /// Adopt a previously persisted, still-valid session
    async fn resume_session(&self, session: &OwnerSession) -> Result<OwnerId>;

    /// Persist a new document; the backend assigns and returns its id
    async fn create_document(&self, path: &CollectionPath, document: &NewItem) -> Result<ItemId>;

    /// Remove one document from the collection
    async fn delete_document(&self, path: &CollectionPath, id: &ItemId) -> Result<()>;

    /// Open a live feed over the collection
    async fn subscribe(&self, path: &CollectionPath) -> Result<DocumentFeed>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn collection_path_is_owner_scoped() {
        let path = CollectionPath::for_owner("demo-app", &OwnerId::from("alice"));
        assert_eq!(path.as_str(), "artifacts/demo-app/users/alice/files");
    }

    #[test]
    fn collection_path_segments_split_on_slash() {
        let path = CollectionPath::for_owner("app", &OwnerId::from("o"));
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["artifacts", "app", "users", "o", "files"]);
    }

    #[tokio::test]
    async fn feed_yields_initial_snapshot_immediately() {
        let (sender, receiver) = watch::channel(Vec::new());
        let mut feed = DocumentFeed::new(receiver, SubscriptionGuard::detached());

        let first = feed.next_snapshot().await;
        assert_eq!(first, Some(Vec::new()));

        drop(sender);
        assert!(feed.next_snapshot().await.is_none());
    }
}
