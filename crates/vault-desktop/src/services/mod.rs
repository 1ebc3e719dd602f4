//! Client services
//!
//! Session persistence and the vault service wiring used by the UI.

mod session_store;
mod vault;

pub use session_store::KeyringSessionStore;
pub use vault::VaultService;
