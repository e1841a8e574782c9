//! Authentication models owned by the session manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access/refresh token pair plus the server's expiry hint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds. Not persisted, so it is `0` after a restore.
    #[serde(rename = "expires_in", default)]
    pub expires_in_seconds: i64,
}

impl Credentials {
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in_seconds: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in_seconds,
        }
    }
}

// Tokens never reach logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}

/// Profile of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(alias = "name")]
    pub display_name: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only view of the session handed to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub tenant_id: Option<String>,
    pub authenticated: bool,
}

/// What kind of committed change produced a session notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionChange {
    Restored,
    LoggedIn,
    Registered,
    Refreshed,
    ProfileLoaded,
    LoggedOut,
}

/// A committed session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub change: SessionChange,
    pub snapshot: SessionSnapshot,
}
