//! vault-core - Core library for Vault
//!
//! This crate contains the shared models, configuration, the backend
//! collaborator contract, and the session/store gateways used by the
//! Vault client.

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use models::{Item, ItemDraft, ItemId, ItemKind, OwnerId};
