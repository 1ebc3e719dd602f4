//! Main application component
//!
//! The root coordinator: resolves startup configuration, establishes the
//! session, and keeps exactly one live item feed attached to the current
//! owner.

use std::sync::Arc;

use dioxus::prelude::*;

use vault_core::config::VaultConfig;
use vault_core::models::{Item, OwnerId};

use crate::components::{Header, ItemList, UploadForm, UploadTabs};
use crate::services::VaultService;
use crate::state::{AppState, UploadMode};

/// Root application component
#[component]
pub fn App() -> Element {
    // State signals
    let mut items = use_signal(Vec::<Item>::new);
    let mut owner_id = use_signal(|| None::<OwnerId>);
    let mut auth_ready = use_signal(|| false);
    let upload_mode = use_signal(|| UploadMode::Text);
    let mut vault: Signal<Option<Arc<VaultService>>> = use_signal(|| None);
    let mut config_error = use_signal(|| None::<String>);
    let mut services_initialized = use_signal(|| false);

    // Initialize services and wire the session to the item feed (only once)
    use_effect(move || {
        if services_initialized() {
            return;
        }
        services_initialized.set(true); // Mark immediately to prevent double init

        let config = match VaultConfig::from_env() {
            Ok(config) => config,
            Err(error) => {
                tracing::error!("Vault backend configuration is missing: {error}");
                config_error.set(Some(error.to_string()));
                return;
            }
        };

        let service = match VaultService::new(&config) {
            Ok(service) => Arc::new(service),
            Err(error) => {
                tracing::error!("Failed to initialize vault services: {error}");
                config_error.set(Some(error.to_string()));
                return;
            }
        };
        vault.set(Some(service.clone()));

        // Establish the session; on failure the app stays not-ready
        {
            let service = service.clone();
            spawn(async move {
                match service.resolve_session().await {
                    Ok(owner) => tracing::info!(%owner, "Session established"),
                    Err(error) => tracing::error!("Error during authentication: {error}"),
                }
            });
        }

        // Track owner transitions; at most one item feed is open at a time,
        // and the previous one is dropped before a new one is attached
        spawn(async move {
            let mut owner_rx = service.watch_owner();
            loop {
                let current = owner_rx.borrow_and_update().clone();
                owner_id.set(current.clone());
                auth_ready.set(current.is_some());

                let Some(owner) = current else {
                    items.set(Vec::new());
                    if owner_rx.changed().await.is_err() {
                        return;
                    }
                    continue;
                };

                match service.subscribe_items(&owner).await {
                    Ok(mut feed) => {
                        tracing::info!(%owner, "Attached item feed");
                        loop {
                            tokio::select! {
                                snapshot = feed.next_snapshot() => match snapshot {
                                    Some(list) => items.set(list),
                                    None => {
                                        tracing::error!("Item feed ended; list will no longer update");
                                        if owner_rx.changed().await.is_err() {
                                            return;
                                        }
                                        break;
                                    }
                                },
                                changed = owner_rx.changed() => {
                                    if changed.is_err() {
                                        return;
                                    }
                                    break;
                                }
                            }
                        }
                        // Feed dropped here, detaching before any new one opens
                    }
                    Err(error) => {
                        tracing::error!("Failed to open item feed: {error}");
                        if owner_rx.changed().await.is_err() {
                            return;
                        }
                    }
                }
            }
        });
    });

    use_context_provider(|| AppState {
        items,
        owner_id,
        auth_ready,
        upload_mode,
        vault,
        config_error,
    });

    rsx! {
        div {
            class: "app-container",
            style: "
                min-height: 100vh;
                font-family: system-ui, -apple-system, sans-serif;
                background: #f3f4f6;
                color: #1f2937;
                display: flex;
                justify-content: center;
                padding: 24px;
            ",

            div {
                style: "width: 100%; max-width: 920px; display: flex; flex-direction: column; gap: 20px;",

                Header {}

                if let Some(error) = config_error() {
                    div {
                        class: "config-error",
                        style: "
                            padding: 16px;
                            border-radius: 10px;
                            background: #fef2f2;
                            color: #b91c1c;
                            border: 1px solid #fecaca;
                        ",
                        "Vault is not configured: {error}"
                    }
                } else {
                    div {
                        style: "background: white; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); overflow: hidden;",
                        UploadTabs {}
                        UploadForm {}
                    }

                    ItemList {}
                }
            }
        }
    }
}
