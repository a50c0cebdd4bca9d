//! Navigation guard over the session state

use super::routes::RoleRouteTable;
use crate::session::{Role, Session, SessionStore};

/// Authentication state as seen by the guard.
///
/// `Loading` exists only before the first session resolution (e.g. while
/// a persisted session is being read back); once the store has been
/// consulted the state is one of the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Unauthenticated,
    Authenticated { role: Role },
}

impl AuthState {
    /// Resolve the state from the credential store. A session that has
    /// lost its access token (terminal refresh failure) counts as
    /// unauthenticated.
    pub fn resolve(store: &SessionStore) -> Self {
        match store.get() {
            Some(session) if session.is_usable() => Self::Authenticated { role: session.role },
            _ => Self::Unauthenticated,
        }
    }

    /// Resolve from a session value directly.
    pub fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(s) if s.is_usable() => Self::Authenticated { role: s.role },
            _ => Self::Unauthenticated,
        }
    }
}

/// Outcome of a navigation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Per-navigation allow/deny/redirect policy.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    table: RoleRouteTable,
}

impl RouteGuard {
    pub fn new(table: RoleRouteTable) -> Self {
        Self { table }
    }

    /// Decide a navigation. Deterministic for every (state, path) pair.
    pub fn decide(&self, state: AuthState, path: &str) -> RouteDecision {
        let public = is_public(path);

        match state {
            // Session resolution still in flight; the caller re-evaluates
            // once the store settles.
            AuthState::Loading => RouteDecision::Allow,
            AuthState::Unauthenticated => {
                if public {
                    RouteDecision::Allow
                } else {
                    RouteDecision::RedirectToLogin
                }
            }
            AuthState::Authenticated { role } => {
                if path.starts_with("/auth/login") {
                    RouteDecision::RedirectToDashboard
                } else if public || self.table.allows(role, path) {
                    RouteDecision::Allow
                } else {
                    tracing::debug!(%role, path, "route not permitted for role");
                    RouteDecision::RedirectToDashboard
                }
            }
        }
    }
}

/// Routes reachable without a session.
fn is_public(path: &str) -> bool {
    path == "/" || path.starts_with("/auth")
}
