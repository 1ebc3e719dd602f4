//! Upload form: paste text or select a file, then save it to the vault.
//!
//! One submission may be in flight at a time; validation and save failures
//! surface as transient inline messages that clear after a fixed delay.

use std::time::Duration;

use dioxus::prelude::*;
use rfd::AsyncFileDialog;

use vault_core::models::{ItemDraft, ItemKind};

use crate::state::{AppState, UploadMode};

const MESSAGE_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// A file picked through the file dialog, read fully into memory
#[derive(Clone, PartialEq, Eq)]
struct SelectedFile {
    name: String,
    bytes: Vec<u8>,
}

/// Transient feedback shown under the form
#[derive(Clone, PartialEq, Eq)]
enum FormNotice {
    Success(String),
    Error(String),
}

#[component]
pub fn UploadForm() -> Element {
    let state = use_context::<AppState>();
    let mode = (state.upload_mode)();
    let auth_ready = (state.auth_ready)();

    let mut paste_title = use_signal(String::new);
    let mut paste_text = use_signal(String::new);
    let mut selected_file = use_signal(|| None::<SelectedFile>);
    let mut saving = use_signal(|| false);
    let notice = use_signal(|| None::<FormNotice>);
    let notice_version = use_signal(|| 0u64);

    let pick_file = move |_| {
        spawn(async move {
            if let Some(handle) = AsyncFileDialog::new().pick_file().await {
                let name = handle.file_name();
                let bytes = handle.read().await;
                tracing::debug!("Selected file '{}' ({} bytes)", name, bytes.len());
                selected_file.set(Some(SelectedFile { name, bytes }));
            }
        });
    };

    let submit = move |_| {
        if saving() || !(state.auth_ready)() {
            return;
        }
        let Some(service) = (state.vault)() else {
            tracing::error!("Vault service is not available");
            return;
        };

        let draft = match (state.upload_mode)() {
            UploadMode::Text => {
                let title = paste_title();
                let body = paste_text();
                ItemDraft::text(Some(title.as_str()), &body)
            }
            UploadMode::File => match selected_file() {
                Some(file) => {
                    let mime = infer_mime_type(&file.name);
                    ItemDraft::file(&file.name, mime.as_deref(), &file.bytes)
                }
                None => {
                    show_transient_notice(
                        notice,
                        notice_version,
                        FormNotice::Error("Error: Please select a file to upload.".to_string()),
                    );
                    return;
                }
            },
        };

        let draft = match draft {
            Ok(draft) => draft,
            Err(error) => {
                show_transient_notice(
                    notice,
                    notice_version,
                    FormNotice::Error(format!("Error: {error}")),
                );
                return;
            }
        };

        saving.set(true);
        let filename = draft.filename.clone();
        let kind = draft.kind;
        spawn(async move {
            match service.save_item(draft).await {
                Ok(id) => {
                    tracing::info!(%id, "Saved item '{}'", filename);
                    let message = match kind {
                        ItemKind::Text => {
                            paste_text.set(String::new());
                            paste_title.set(String::new());
                            "Text paste saved successfully!".to_string()
                        }
                        ItemKind::File => {
                            selected_file.set(None);
                            format!("File '{filename}' saved and encoded to Base64.")
                        }
                    };
                    show_transient_notice(notice, notice_version, FormNotice::Success(message));
                }
                Err(error) => {
                    tracing::error!("Error saving content: {error}");
                    show_transient_notice(
                        notice,
                        notice_version,
                        FormNotice::Error(format!("Error: {error}")),
                    );
                }
            }
            saving.set(false);
        });
    };

    let save_label = if saving() {
        "Saving..."
    } else {
        match mode {
            UploadMode::Text => "Save Paste",
            UploadMode::File => "Save File",
        }
    };
    let can_submit = auth_ready && !saving();
    let button_style = if can_submit {
        "background: #4f46e5; cursor: pointer;"
    } else {
        "background: #9ca3af; cursor: not-allowed;"
    };
    let selected_hint = selected_file().map(|file| {
        format!(
            "Selected: {} ({} KB). Will be encoded to Base64 and saved.",
            file.name,
            format_file_size_kb(file.bytes.len())
        )
    });
    let notice_banner = notice().map(|value| match value {
        FormNotice::Success(message) => (
            "background: #dcfce7; color: #15803d;",
            message,
        ),
        FormNotice::Error(message) => (
            "background: #fee2e2; color: #b91c1c;",
            message,
        ),
    });

    rsx! {
        div {
            class: "upload-form",
            style: "padding: 20px; display: flex; flex-direction: column; gap: 12px;",

            if mode == UploadMode::Text {
                input {
                    r#type: "text",
                    placeholder: "Title (optional, e.g., 'React Hook Logic')",
                    value: "{paste_title}",
                    style: "padding: 10px 12px; border: 1px solid #d1d5db; border-radius: 8px; font-size: 14px;",
                    oninput: move |evt| paste_title.set(evt.value()),
                }
                textarea {
                    placeholder: "Paste your text or code here...",
                    value: "{paste_text}",
                    rows: "8",
                    style: "
                        padding: 10px 12px;
                        border: 1px solid #d1d5db;
                        border-radius: 8px;
                        font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
                        font-size: 13px;
                        resize: vertical;
                    ",
                    oninput: move |evt| paste_text.set(evt.value()),
                }
            } else {
                button {
                    style: "
                        align-self: flex-start;
                        padding: 8px 16px;
                        border: 1px solid #c7d2fe;
                        border-radius: 9999px;
                        background: #eef2ff;
                        color: #4338ca;
                        font-size: 13px;
                        font-weight: 600;
                        cursor: pointer;
                    ",
                    onclick: pick_file,
                    "Select a file..."
                }
                if let Some(hint) = selected_hint {
                    p {
                        style: "margin: 0; font-size: 13px; color: #6b7280;",
                        "{hint}"
                    }
                }
            }

            button {
                disabled: !can_submit,
                style: "
                    padding: 12px;
                    border: none;
                    border-radius: 8px;
                    color: white;
                    font-size: 14px;
                    font-weight: 600;
                    {button_style}
                ",
                onclick: submit,
                "{save_label}"
            }

            if let Some((banner_style, message)) = notice_banner {
                div {
                    style: "padding: 10px; text-align: center; border-radius: 8px; font-size: 13px; {banner_style}",
                    "{message}"
                }
            }

            if !auth_ready {
                div {
                    style: "padding: 10px; text-align: center; border-radius: 8px; background: #fef9c3; color: #a16207; font-size: 13px;",
                    "Initializing vault connection..."
                }
            }
        }
    }
}

/// Show a notice and clear it after the delay, unless a newer notice has
/// replaced it in the meantime (latest wins).
fn show_transient_notice(
    mut notice: Signal<Option<FormNotice>>,
    mut version: Signal<u64>,
    value: FormNotice,
) {
    let current = version() + 1;
    version.set(current);
    notice.set(Some(value));

    spawn(async move {
        tokio::time::sleep(MESSAGE_CLEAR_DELAY).await;
        if version() == current {
            notice.set(None);
        }
    });
}

/// Guess a mime type from the file name; `None` lets the draft fall back to
/// `application/octet-stream`.
fn infer_mime_type(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first_raw()
        .map(str::to_string)
}

/// Whole-KB size label, matching the selected-file hint
fn format_file_size_kb(len: usize) -> usize {
    (len + 512) / 1024
}
