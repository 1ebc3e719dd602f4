//! Upload mode tab control

use dioxus::prelude::*;

use crate::state::{AppState, UploadMode};

/// Mutually exclusive input mode selector for the upload form
#[component]
pub fn UploadTabs() -> Element {
    let mut state = use_context::<AppState>();
    let mode = (state.upload_mode)();

    rsx! {
        div {
            class: "upload-tabs",
            style: "display: flex; border-bottom: 1px solid #e5e7eb;",

            TabButton {
                label: "Paste Text/Code",
                active: mode == UploadMode::Text,
                onclick: move |_| state.upload_mode.set(UploadMode::Text),
            }
            TabButton {
                label: "Upload File (Base64)",
                active: mode == UploadMode::File,
                onclick: move |_| state.upload_mode.set(UploadMode::File),
            }
        }
    }
}

#[component]
fn TabButton(label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let style = if active {
        "background: #4f46e5; color: white;"
    } else {
        "background: white; color: #374151;"
    };

    rsx! {
        button {
            style: "
                flex: 1;
                padding: 12px 16px;
                border: none;
                font-size: 14px;
                font-weight: 600;
                cursor: pointer;
                transition: background 0.15s;
                {style}
            ",
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}
