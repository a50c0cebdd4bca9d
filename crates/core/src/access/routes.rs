//! Role-to-route mapping

use crate::session::Role;
use std::collections::HashMap;

/// Static mapping from role to allowed route prefixes.
///
/// Every known role maps to a non-empty set; a role absent from the table
/// maps to the empty set, so lookups deny by default. Prefixes within one
/// role are assumed non-overlapping.
#[derive(Debug, Clone)]
pub struct RoleRouteTable {
    routes: HashMap<Role, Vec<String>>,
}

impl RoleRouteTable {
    /// Table for the stock admin panel layout.
    pub fn standard() -> Self {
        let mut routes = HashMap::new();
        routes.insert(
            Role::Admin,
            prefixes(&[
                "/users",
                "/settings",
                "/transactions",
                "/categories",
                "/products",
                "/purchases",
                "/dashboard",
            ]),
        );
        routes.insert(
            Role::Manager,
            prefixes(&[
                "/categories",
                "/products",
                "/transactions",
                "/purchases",
                "/dashboard",
            ]),
        );
        routes.insert(
            Role::User,
            prefixes(&["/products", "/purchases", "/dashboard"]),
        );
        Self { routes }
    }

    /// Build a custom table. Useful for tests and non-standard deployments.
    pub fn from_entries(entries: impl IntoIterator<Item = (Role, Vec<String>)>) -> Self {
        Self {
            routes: entries.into_iter().collect(),
        }
    }

    /// The single capability check: does `role` have access to `path`?
    /// Matching is prefix-based.
    pub fn allows(&self, role: Role, path: &str) -> bool {
        self.routes
            .get(&role)
            .is_some_and(|allowed| allowed.iter().any(|prefix| path.starts_with(prefix)))
    }

    /// Allowed prefixes for a role; empty for roles not in the table.
    pub fn allowed_prefixes(&self, role: Role) -> &[String] {
        self.routes.get(&role).map_or(&[], Vec::as_slice)
    }
}

impl Default for RoleRouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn prefixes(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| (*p).to_string()).collect()
}
