//! Item model
//!
//! An item is a stored paste or file record, owned by one session. Text
//! content is stored raw; file content is stored as standard Base64.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::OwnerId;

/// Fallback mime type for files whose type is unknown
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Mime type assigned to all text pastes
pub const TEXT_PLAIN: &str = "text/plain";

/// Opaque item identifier assigned by the backend on creation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Mint a new id using UUID v7 (time-sortable)
    ///
    /// Backends that own id generation (e.g. the in-memory backend) use this;
    /// remote backends return server-assigned ids instead.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Whether an item holds a raw text paste or a Base64-encoded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
    File,
}

/// Form output: a validated item waiting for owner and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub kind: ItemKind,
    pub filename: String,
    pub content: String,
    pub mime_type: String,
}

impl ItemDraft {
    /// Build a text paste draft.
    ///
    /// The body must contain non-whitespace content. An empty or missing
    /// title falls back to a generated `Untitled Paste` label carrying the
    /// local timestamp.
    pub fn text(title: Option<&str>, body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Paste content cannot be empty.".to_string(),
            ));
        }

        let filename = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(untitled_paste_label, ToString::to_string);

        Ok(Self {
            kind: ItemKind::Text,
            filename,
            content: body.to_string(),
            mime_type: TEXT_PLAIN.to_string(),
        })
    }

    /// Build a file draft, encoding the bytes as Base64.
    ///
    /// `reported_mime` is the caller-supplied content type; blank or missing
    /// values fall back to `application/octet-stream`.
    pub fn file(file_name: &str, reported_mime: Option<&str>, bytes: &[u8]) -> Result<Self> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(Error::InvalidInput(
                "Please select a file to upload.".to_string(),
            ));
        }

        let mime_type = reported_mime
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(OCTET_STREAM)
            .to_string();

        Ok(Self {
            kind: ItemKind::File,
            filename: file_name.to_string(),
            content: BASE64_STANDARD.encode(bytes),
            mime_type,
        })
    }
}

/// Document payload persisted by the backend: a draft stamped with its owner
/// and a client-side creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub kind: ItemKind,
    pub filename: String,
    pub content: String,
    pub mime_type: String,
    pub owner_id: OwnerId,
    pub created_at: i64,
}

impl NewItem {
    /// Stamp a draft with its owner and the current time (epoch ms)
    #[must_use]
    pub fn from_draft(draft: ItemDraft, owner_id: OwnerId) -> Self {
        Self {
            kind: draft.kind,
            filename: draft.filename,
            content: draft.content,
            mime_type: draft.mime_type,
            owner_id,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Attach a backend-assigned id, producing a stored item
    #[must_use]
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            kind: self.kind,
            filename: self.filename,
            content: self.content,
            mime_type: self.mime_type,
            owner_id: self.owner_id,
            created_at: self.created_at,
        }
    }
}

/// A stored paste or file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub filename: String,
    pub content: String,
    pub mime_type: String,
    pub owner_id: OwnerId,
    pub created_at: i64,
}

impl Item {
    /// Build a self-contained `data:` reference for view/download.
    ///
    /// File content is already Base64 and is embedded as-is; text content is
    /// encoded here so the reference format stays uniform and safe for
    /// arbitrary characters.
    #[must_use]
    pub fn data_uri(&self) -> String {
        let payload = match self.kind {
            ItemKind::File => self.content.clone(),
            ItemKind::Text => BASE64_STANDARD.encode(self.content.as_bytes()),
        };
        format!("data:{};base64,{}", self.mime_type, payload)
    }

    /// Decode the stored content back to raw bytes
    pub fn content_bytes(&self) -> Result<Vec<u8>> {
        match self.kind {
            ItemKind::Text => Ok(self.content.as_bytes().to_vec()),
            ItemKind::File => BASE64_STANDARD
                .decode(self.content.as_bytes())
                .map_err(|error| Error::Encoding(error.to_string())),
        }
    }
}

/// Sort items newest first: `created_at` descending, ties broken by `id`
/// descending so the order is deterministic within one run.
pub fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn untitled_paste_label() -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("Untitled Paste - {now}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(id: &str, created_at: i64) -> Item {
        Item {
            id: ItemId::from(id),
            kind: ItemKind::Text,
            filename: "t".to_string(),
            content: "c".to_string(),
            mime_type: TEXT_PLAIN.to_string(),
            owner_id: OwnerId::from("owner"),
            created_at,
        }
    }

    #[test]
    fn text_draft_keeps_content_verbatim() {
        let draft = ItemDraft::text(Some("Notes"), "hello").unwrap();
        assert_eq!(draft.kind, ItemKind::Text);
        assert_eq!(draft.filename, "Notes");
        assert_eq!(draft.content, "hello");
        assert_eq!(draft.mime_type, "text/plain");
    }

    #[test]
    fn text_draft_rejects_empty_body() {
        assert!(ItemDraft::text(Some("Notes"), "").is_err());
        assert!(ItemDraft::text(None, "   \n\t").is_err());
    }

    #[test]
    fn text_draft_generates_untitled_label() {
        let draft = ItemDraft::text(None, "body").unwrap();
        assert!(draft.filename.starts_with("Untitled Paste - "));

        let blank_title = ItemDraft::text(Some("   "), "body").unwrap();
        assert!(blank_title.filename.starts_with("Untitled Paste - "));
    }

    #[test]
    fn file_draft_round_trips_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let draft = ItemDraft::file("logo.png", Some("image/png"), &bytes).unwrap();
        assert_eq!(draft.kind, ItemKind::File);
        assert_eq!(draft.filename, "logo.png");
        assert_eq!(draft.mime_type, "image/png");
        assert_eq!(BASE64_STANDARD.decode(&draft.content).unwrap(), bytes);
    }

    #[test]
    fn file_draft_defaults_to_octet_stream() {
        let draft = ItemDraft::file("blob.bin", None, b"abc").unwrap();
        assert_eq!(draft.mime_type, "application/octet-stream");

        let blank = ItemDraft::file("blob.bin", Some("  "), b"abc").unwrap();
        assert_eq!(blank.mime_type, "application/octet-stream");
    }

    #[test]
    fn file_draft_rejects_missing_name() {
        assert!(ItemDraft::file("  ", None, b"abc").is_err());
    }

    #[test]
    fn data_uri_embeds_file_payload_as_is() {
        let draft = ItemDraft::file("a.png", Some("image/png"), b"\x89PNG").unwrap();
        let stored = NewItem::from_draft(draft, OwnerId::from("o")).into_item(ItemId::generate());
        assert_eq!(
            stored.data_uri(),
            format!("data:image/png;base64,{}", stored.content)
        );
    }

    #[test]
    fn data_uri_encodes_text_payload() {
        let draft = ItemDraft::text(Some("t"), "hello, world").unwrap();
        let stored = NewItem::from_draft(draft, OwnerId::from("o")).into_item(ItemId::generate());
        assert_eq!(
            stored.data_uri(),
            format!(
                "data:text/plain;base64,{}",
                BASE64_STANDARD.encode("hello, world")
            )
        );
        // Stored content stays raw text
        assert_eq!(stored.content, "hello, world");
    }

    #[test]
    fn content_bytes_round_trips_both_kinds() {
        let text = NewItem::from_draft(
            ItemDraft::text(Some("t"), "hello").unwrap(),
            OwnerId::from("o"),
        )
        .into_item(ItemId::generate());
        assert_eq!(text.content_bytes().unwrap(), b"hello");

        let bytes = vec![0u8, 1, 2, 254, 255];
        let file = NewItem::from_draft(
            ItemDraft::file("b.bin", None, &bytes).unwrap(),
            OwnerId::from("o"),
        )
        .into_item(ItemId::generate());
        assert_eq!(file.content_bytes().unwrap(), bytes);
    }

    #[test]
    fn sort_orders_newest_first_with_deterministic_ties() {
        let mut items = vec![item("a", 10), item("c", 20), item("b", 20)];
        sort_newest_first(&mut items);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn generated_ids_are_unique_and_time_ordered() {
        let first = ItemId::generate();
        let second = ItemId::generate();
        assert_ne!(first, second);
        // UUID v7 sorts by creation time
        assert!(second > first);
    }

    #[test]
    fn new_item_serializes_kind_lowercase() {
        let new_item = NewItem::from_draft(
            ItemDraft::text(Some("t"), "body").unwrap(),
            OwnerId::from("o"),
        );
        let json = serde_json::to_value(&new_item).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["owner_id"], "o");
    }
}
