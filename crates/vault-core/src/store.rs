//! Item store gateway: create/delete/subscribe over an owner-scoped
//! collection.
//!
//! The gateway stamps drafts with owner and creation time on the way in and
//! re-publishes every feed snapshot sorted newest first on the way out. It
//! holds no item state of its own; the feed is the single source of truth.

use tokio::sync::watch;

use crate::backend::{CollectionPath, DocumentFeed, SubscriptionGuard, VaultBackend};
use crate::error::Result;
use crate::models::{sort_newest_first, ItemDraft, ItemId, NewItem, OwnerId};

/// Live feed of owner-scoped item snapshots, sorted newest first
pub type ItemFeed = DocumentFeed;

/// Translates create/delete/list intents into backend calls against the
/// owner's collection path.
pub struct ItemStore<B: VaultBackend> {
    backend: B,
    app_id: String,
}

impl<B: VaultBackend> ItemStore<B> {
    pub fn new(backend: B, app_id: impl Into<String>) -> Self {
        Self {
            backend,
            app_id: app_id.into(),
        }
    }

    fn path_for(&self, owner_id: &OwnerId) -> CollectionPath {
        CollectionPath::for_owner(&self.app_id, owner_id)
    }

    /// Stamp the draft with its owner and the current time, then persist it.
    /// Returns once the backend has acknowledged the write.
    pub async fn create(&self, owner_id: &OwnerId, draft: ItemDraft) -> Result<ItemId> {
        let document = NewItem::from_draft(draft, owner_id.clone());
        let path = self.path_for(owner_id);
        let id = self.backend.create_document(&path, &document).await?;
        tracing::info!(%id, %path, "Created item '{}'", document.filename);
        Ok(id)
    }

    /// Remove one item from the owner's collection.
    ///
    /// User confirmation happens at the UI boundary; by the time this runs
    /// the delete is final.
    pub async fn delete(&self, owner_id: &OwnerId, id: &ItemId) -> Result<()> {
        let path = self.path_for(owner_id);
        self.backend.delete_document(&path, id).await?;
        tracing::info!(%id, %path, "Deleted item");
        Ok(())
    }

    /// Open a live feed over the owner's items.
    ///
    /// Every snapshot is the full current list sorted `created_at`
    /// descending; the first read resolves immediately. Dropping the returned
    /// feed detaches the subscription, and callers keep at most one feed per
    /// owner by dropping the previous one before opening the next.
    pub async fn subscribe(&self, owner_id: &OwnerId) -> Result<ItemFeed> {
        let path = self.path_for(owner_id);
        let mut upstream = self.backend.subscribe(&path).await?;
        tracing::debug!(%path, "Opened item subscription");

        // Consume the upstream's immediate first delivery as the seed so the
        // forwarding task only relays genuine changes afterwards
        let mut initial = upstream.next_snapshot().await.unwrap_or_default();
        sort_newest_first(&mut initial);
        let (sender, receiver) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while let Some(mut items) = upstream.next_snapshot().await {
                sort_newest_first(&mut items);
                if sender.send(items).is_err() {
                    break;
                }
            }
            // Upstream ended: the feed stops updating, per the no-reconnect policy
        });

        Ok(ItemFeed::new(receiver, SubscriptionGuard::from_task(task)))
    }
}
