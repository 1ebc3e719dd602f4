//! Header with the owner identity badge

use dioxus::prelude::*;

use crate::state::AppState;

#[component]
pub fn Header() -> Element {
    let state = use_context::<AppState>();
    let owner = (state.owner_id)();
    let ready = (state.auth_ready)();

    rsx! {
        div {
            class: "header",
            style: "
                padding: 16px;
                background: white;
                border-radius: 12px;
                border: 1px solid #e5e7eb;
            ",

            h1 {
                style: "margin: 0 0 4px 0; font-size: 26px; font-weight: 700;",
                span { style: "color: #4f46e5;", "Secure" }
                " Data Vault"
            }

            p {
                style: "margin: 0; font-size: 13px; color: #6b7280;",
                if ready {
                    if let Some(owner) = owner {
                        span { style: "font-weight: 500;", "Owner ID:" }
                        code {
                            style: "
                                margin-left: 6px;
                                padding: 2px 8px;
                                border-radius: 6px;
                                background: #eef2ff;
                                color: #3730a3;
                                font-size: 12px;
                            ",
                            "{owner}"
                        }
                    }
                } else {
                    "Resolving session..."
                }
            }
        }
    }
}
