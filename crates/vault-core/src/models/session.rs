//! Owner session model

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Identifier of the authenticated session scoping a user's items
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OwnerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An established session: the owner identity plus the credentials needed to
/// talk to the backend on its behalf.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSession {
    pub owner_id: OwnerId,
    pub access_token: String,
    /// Expiry as unix seconds
    pub expires_at: i64,
}

impl OwnerSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for OwnerSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OwnerSession")
            .field("owner_id", &self.owner_id)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn unix_timestamp_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: i64) -> OwnerSession {
        OwnerSession {
            owner_id: OwnerId::from("owner"),
            access_token: "secret".to_string(),
            expires_at,
        }
    }

    #[test]
    fn session_expiry_respects_skew() {
        assert!(session(0).is_expired());
        assert!(session(unix_timestamp_now() + 30).is_expired());
        assert!(!session(unix_timestamp_now() + 3600).is_expired());
    }

    #[test]
    fn debug_redacts_access_token() {
        let rendered = format!("{:?}", session(0));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }
}
