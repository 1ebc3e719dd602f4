//! Client configuration resolved at startup.
//!
//! The vault client needs an application id, the backend connection values
//! (base URL plus public API key), and optionally a bootstrap session token.
//! All of these arrive from the environment; missing connection configuration
//! is a fatal condition for data functionality.

use crate::error::{Error, Result};

const APP_ID_VAR: &str = "VAULT_APP_ID";
const BACKEND_URL_VAR: &str = "VAULT_BACKEND_URL";
const API_KEY_VAR: &str = "VAULT_API_KEY";
const BOOTSTRAP_TOKEN_VAR: &str = "VAULT_BOOTSTRAP_TOKEN";

/// Startup configuration for the vault client.
///
/// These are safe-to-ship public endpoints/keys; secret credentials must
/// never be stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Application identifier used in every collection path
    pub app_id: String,
    /// Base URL of the backend collaborator, without a trailing slash
    pub backend_url: String,
    /// Public API key sent with every backend request
    pub api_key: String,
    /// Optional externally supplied session token for initial sign-in
    pub bootstrap_token: Option<String>,
}

impl VaultConfig {
    /// Build and validate a configuration from explicit values
    pub fn new(
        app_id: impl Into<String>,
        backend_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let app_id = require_value(app_id.into(), APP_ID_VAR)?;
        let backend_url = require_http_url(backend_url.into(), BACKEND_URL_VAR)?;
        let api_key = require_value(api_key.into(), API_KEY_VAR)?;

        Ok(Self {
            app_id,
            backend_url,
            api_key,
            bootstrap_token: None,
        })
    }

    /// Attach an optional bootstrap token, discarding blank values
    #[must_use]
    pub fn with_bootstrap_token(mut self, token: Option<String>) -> Self {
        self.bootstrap_token = normalize_text_option(token);
        self
    }

    /// Resolve the configuration from environment variables.
    ///
    /// Requires `VAULT_APP_ID`, `VAULT_BACKEND_URL`, and `VAULT_API_KEY`;
    /// `VAULT_BOOTSTRAP_TOKEN` is optional.
    pub fn from_env() -> Result<Self> {
        Self::new(
            std::env::var(APP_ID_VAR).unwrap_or_default(),
            std::env::var(BACKEND_URL_VAR).unwrap_or_default(),
            std::env::var(API_KEY_VAR).unwrap_or_default(),
        )
        .map(|config| config.with_bootstrap_token(std::env::var(BOOTSTRAP_TOKEN_VAR).ok()))
    }
}

/// Normalizes optional text config by trimming whitespace and removing
/// empties. Returns `None` when the input is `None` or the trimmed value is
/// empty.
#[must_use]
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check whether a value looks like an HTTP(S) URL
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn require_value(raw: String, field: &str) -> Result<String> {
    normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config(format!("{field} is required and must not be empty")))
}

fn require_http_url(raw: String, field: &str) -> Result<String> {
    let value = require_value(raw, field)?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(format!(
            "{field} must include http:// or https://"
        )))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_validates_required_fields() {
        assert!(VaultConfig::new("", "https://vault.example.com", "key").is_err());
        assert!(VaultConfig::new("app", "   ", "key").is_err());
        assert!(VaultConfig::new("app", "https://vault.example.com", "").is_err());
    }

    #[test]
    fn new_rejects_non_http_urls() {
        assert!(VaultConfig::new("app", "vault.example.com", "key").is_err());
    }

    #[test]
    fn new_trims_trailing_slash() {
        let config = VaultConfig::new("app", "https://vault.example.com/", "key").unwrap();
        assert_eq!(config.backend_url, "https://vault.example.com");
    }

    #[test]
    fn bootstrap_token_discards_blank_values() {
        let config = VaultConfig::new("app", "https://vault.example.com", "key")
            .unwrap()
            .with_bootstrap_token(Some("   ".to_string()));
        assert_eq!(config.bootstrap_token, None);

        let config = VaultConfig::new("app", "https://vault.example.com", "key")
            .unwrap()
            .with_bootstrap_token(Some(" token ".to_string()));
        assert_eq!(config.bootstrap_token.as_deref(), Some("token"));
    }

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
        assert_eq!(
            normalize_text_option(Some(" value ".to_string())),
            Some("value".to_string())
        );
    }
}
