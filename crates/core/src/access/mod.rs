pub mod guard;
pub mod routes;

pub use guard::{AuthState, RouteDecision, RouteGuard};
pub use routes::RoleRouteTable;
