//! Session state and the shared credential store

use crate::error::CoreError;
use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// User role as carried in the access token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Unknown role strings are rejected so callers deny by default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGER" => Ok(Role::Manager),
            "USER" => Ok(Role::User),
            other => Err(CoreError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Terminal session failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionError {
    #[error("token refresh failed")]
    RefreshFailed,
}

/// The live credential pair plus the claims decoded from the access token.
///
/// Created on login, replaced by the token refresher, destroyed on
/// sign-out or terminal refresh failure. Exactly one session is live per
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Subject claim of the access token
    pub email: String,
    pub role: Role,
    /// Expiry of the access token as epoch seconds
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Tenant scoping all entity reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<SessionError>,
}

impl Session {
    /// Whether the access token is within `skew` seconds of expiry.
    pub fn is_stale(&self, now: i64, skew: i64) -> bool {
        now >= self.expires_at - skew
    }

    /// A session authorizes requests only while it carries an access token
    /// and no terminal error.
    pub fn is_usable(&self) -> bool {
        !self.access_token.is_empty() && self.last_error.is_none()
    }

    /// Mark the session terminally failed: the access token is cleared so
    /// no further request can be authorized with it.
    pub fn into_refresh_failed(mut self) -> Self {
        self.access_token.clear();
        self.last_error = Some(SessionError::RefreshFailed);
        self
    }
}

/// The single injected session service.
///
/// Lock-free reads via `arc-swap`; mutations are limited to login/logout
/// and the token refresher. Consumers that need to react to sign-in or
/// sign-out subscribe to the watch channel instead of polling.
pub struct SessionStore {
    current: ArcSwapOption<Session>,
    changed: watch::Sender<Option<Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (changed, _) = watch::channel(None);
        Self {
            current: ArcSwapOption::empty(),
            changed,
        }
    }

    /// Current session, if any.
    pub fn get(&self) -> Option<Arc<Session>> {
        self.current.load_full()
    }

    /// Replace the session wholesale and notify subscribers.
    pub fn set(&self, session: Session) {
        let session = Arc::new(session);
        self.current.store(Some(session.clone()));
        let _ = self.changed.send_replace(Some(session));
    }

    /// Destroy the session (sign-out or terminal failure).
    pub fn clear(&self) {
        self.current.store(None);
        let _ = self.changed.send_replace(None);
    }

    /// Subscribe to session changes. The receiver observes the value at
    /// subscription time plus every subsequent `set`/`clear`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.changed.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.get().is_some())
            .finish()
    }
}
