//! Item list component

use dioxus::prelude::*;

use super::ItemCard;
use crate::state::AppState;

/// Live list of the owner's items, newest first
#[component]
pub fn ItemList() -> Element {
    let state = use_context::<AppState>();
    let items = (state.items)();
    let ready = (state.auth_ready)();
    let count = items.len();

    rsx! {
        div {
            class: "item-list",
            style: "display: flex; flex-direction: column; gap: 12px;",

            h2 {
                style: "margin: 8px 0 0 0; font-size: 20px; font-weight: 700;",
                "Your Saved Items ({count})"
            }

            if items.is_empty() {
                if ready {
                    div {
                        style: "
                            padding: 40px;
                            text-align: center;
                            background: white;
                            border-radius: 12px;
                            border: 1px solid #e5e7eb;
                            color: #6b7280;
                        ",
                        "You have no saved items yet. Use the form above to store your first paste or file!"
                    }
                }
            } else {
                div {
                    class: "item-grid",
                    style: "display: grid; gap: 12px; grid-template-columns: repeat(auto-fill, minmax(360px, 1fr));",

                    for item in items {
                        ItemCard { key: "{item.id}", item }
                    }
                }
            }
        }
    }
}
