//! Data models for Vault

mod item;
mod session;

pub use item::{sort_newest_first, Item, ItemDraft, ItemId, ItemKind, NewItem};
pub use session::{OwnerId, OwnerSession};
