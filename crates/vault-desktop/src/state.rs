//! Application state management
//!
//! Top-level state owned by the root coordinator and shared with components
//! via a Dioxus context provider; no module-level singletons.

use std::sync::Arc;

use dioxus::prelude::*;

use vault_core::models::{Item, OwnerId};

use crate::services::VaultService;

/// Which input mode the upload form is in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadMode {
    Text,
    File,
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Current item snapshot, already sorted newest first by the gateway
    pub items: Signal<Vec<Item>>,
    /// Owner identifier, absent until the session resolves
    pub owner_id: Signal<Option<OwnerId>>,
    /// True once an owner identity is known
    pub auth_ready: Signal<bool>,
    /// Active upload form tab
    pub upload_mode: Signal<UploadMode>,
    /// Vault service (session manager + item store), absent if startup failed
    pub vault: Signal<Option<Arc<VaultService>>>,
    /// Fatal configuration error shown instead of the data UI
    pub config_error: Signal<Option<String>>,
}
