//! Item card: one stored paste or file, with its actions
//!
//! Actions are download (save the decoded content to disk), copy to the
//! clipboard, and delete behind a yes/no confirmation. Action failures are
//! logged and never remove the card.

use std::time::Duration;

use dioxus::prelude::*;
use rfd::{
    AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel,
};

use vault_core::models::{Item, ItemKind};

use crate::state::AppState;

const PREVIEW_MAX_CHARS: usize = 400;
const COPY_FEEDBACK_DELAY: Duration = Duration::from_secs(2);

#[component]
pub fn ItemCard(item: Item) -> Element {
    let state = use_context::<AppState>();
    let mut copied = use_signal(|| false);

    let kind_label = match item.kind {
        ItemKind::Text => "Paste",
        ItemKind::File => "File",
    };
    let badge_style = match item.kind {
        ItemKind::Text => "background: #eef2ff; color: #4338ca;",
        ItemKind::File => "background: #fef3c7; color: #b45309;",
    };
    let saved_label = format_saved_at(item.created_at);
    let mime_note = (item.kind == ItemKind::File).then(|| item.mime_type.clone());
    let image_preview = (item.kind == ItemKind::File && item.mime_type.starts_with("image/"))
        .then(|| item.data_uri());
    let text_preview = (item.kind == ItemKind::Text).then(|| preview_snippet(&item.content));
    let copy_label = if copied() { "Copied!" } else { "Copy" };

    let download = {
        let item = item.clone();
        move |_| {
            let item = item.clone();
            spawn(async move {
                let Some(handle) = AsyncFileDialog::new()
                    .set_file_name(&item.filename)
                    .save_file()
                    .await
                else {
                    return;
                };
                let bytes = match item.content_bytes() {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        tracing::error!("Could not decode '{}': {error}", item.filename);
                        return;
                    }
                };
                if let Err(error) = std::fs::write(handle.path(), &bytes) {
                    tracing::error!("Could not save '{}': {error}", item.filename);
                } else {
                    tracing::info!("Saved '{}' to {}", item.filename, handle.path().display());
                }
            });
        }
    };

    let copy = {
        let content = item.content.clone();
        move |_| {
            let result = arboard::Clipboard::new()
                .and_then(|mut clipboard| clipboard.set_text(content.clone()));
            match result {
                Ok(()) => {
                    copied.set(true);
                    spawn(async move {
                        tokio::time::sleep(COPY_FEEDBACK_DELAY).await;
                        copied.set(false);
                    });
                }
                Err(error) => tracing::error!("Clipboard copy failed: {error}"),
            }
        }
    };

    let delete = {
        let id = item.id.clone();
        let filename = item.filename.clone();
        move |_| {
            let Some(service) = (state.vault)() else {
                tracing::error!("Vault service is not available");
                return;
            };
            let id = id.clone();
            let filename = filename.clone();
            spawn(async move {
                let confirmed = AsyncMessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title("Delete Item")
                    .set_description(format!("Are you sure you want to delete '{filename}'?"))
                    .set_buttons(MessageButtons::YesNo)
                    .show()
                    .await;
                if confirmed != MessageDialogResult::Yes {
                    return;
                }
                if let Err(error) = service.delete_item(&id).await {
                    tracing::error!("Error deleting item '{}': {error}", filename);
                }
            });
        }
    };

    rsx! {
        div {
            class: "item-card",
            style: "
                padding: 16px;
                background: white;
                border-radius: 12px;
                border: 1px solid #e5e7eb;
                display: flex;
                flex-direction: column;
                gap: 8px;
            ",

            div {
                style: "display: flex; align-items: center; gap: 8px;",
                span {
                    style: "
                        padding: 2px 8px;
                        border-radius: 9999px;
                        font-size: 11px;
                        font-weight: 600;
                        {badge_style}
                    ",
                    "{kind_label}"
                }
                span {
                    style: "
                        font-size: 14px;
                        font-weight: 600;
                        overflow: hidden;
                        text-overflow: ellipsis;
                        white-space: nowrap;
                    ",
                    title: "{item.filename}",
                    "{item.filename}"
                }
            }

            p {
                style: "margin: 0; font-size: 12px; color: #6b7280;",
                "Saved: {saved_label}"
            }

            if let Some(snippet) = text_preview {
                pre {
                    style: "
                        margin: 0;
                        padding: 8px;
                        background: #f9fafb;
                        border-radius: 8px;
                        font-size: 12px;
                        white-space: pre-wrap;
                        word-break: break-word;
                        max-height: 120px;
                        overflow: hidden;
                    ",
                    "{snippet}"
                }
            }

            if let Some(uri) = image_preview {
                img {
                    src: "{uri}",
                    style: "max-height: 120px; border-radius: 8px; object-fit: contain; align-self: flex-start;",
                }
            }

            if let Some(mime) = mime_note {
                p {
                    style: "margin: 0; font-size: 11px; color: #9ca3af;",
                    "{mime}"
                }
            }

            div {
                style: "display: flex; gap: 8px; margin-top: 4px;",
                ActionButton { label: "Download", onclick: download }
                ActionButton { label: copy_label.to_string(), onclick: copy }
                ActionButton { label: "Delete", danger: true, onclick: delete }
            }
        }
    }
}

#[component]
fn ActionButton(
    label: String,
    #[props(default = false)] danger: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    let style = if danger {
        "border: 1px solid #fecaca; background: #fef2f2; color: #b91c1c;"
    } else {
        "border: 1px solid #d1d5db; background: white; color: #374151;"
    };

    rsx! {
        button {
            style: "
                padding: 6px 12px;
                border-radius: 8px;
                font-size: 12px;
                font-weight: 600;
                cursor: pointer;
                {style}
            ",
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

/// Render the creation time in the viewer's local timezone
fn format_saved_at(epoch_ms: i64) -> String {
    use chrono::TimeZone as _;

    chrono::Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map_or_else(
            || "unknown time".to_string(),
            |time| time.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

/// Truncate text content for the inline preview
fn preview_snippet(content: &str) -> String {
    if content.chars().count() <= PREVIEW_MAX_CHARS {
        return content.to_string();
    }
    let truncated: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn saved_at_renders_epoch_millis() {
        // Only sanity-check the shape; the exact value depends on the local tz
        let rendered = format_saved_at(1_700_000_000_000);
        assert_eq!(rendered.len(), "2023-11-14 22:13:20".len());
        assert!(rendered.starts_with("2023-11-1"));
    }

    #[test]
    fn saved_at_handles_out_of_range_values() {
        assert_eq!(format_saved_at(i64::MAX), "unknown time");
    }

    #[test]
    fn short_content_previews_verbatim() {
        assert_eq!(preview_snippet("fn main() {}"), "fn main() {}");
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let content = "x".repeat(PREVIEW_MAX_CHARS + 50);
        let snippet = preview_snippet(&content);
        assert_eq!(snippet.chars().count(), PREVIEW_MAX_CHARS + 3);
        assert!(snippet.ends_with("..."));
    }
}
