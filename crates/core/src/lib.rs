//! Tally core types and utilities
//!
//! Shared foundation for the Tally admin client: the session/credential
//! store, role-based route access, and configuration loading. The HTTP
//! client and CLI crates build on top of this.

pub mod access;
pub mod config;
pub mod error;
pub mod session;

pub use access::{AuthState, RoleRouteTable, RouteDecision, RouteGuard};
pub use config::TallyConfig;
pub use error::{CoreError, CoreResult};
pub use session::{Role, Session, SessionError, SessionStore};
