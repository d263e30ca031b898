//! Console route surface

use crate::models::Role;

/// Login screen
pub const LOGIN_PATH: &str = "/";
/// Admin home
pub const ADMIN_HOME: &str = "/admin";
/// Employee home
pub const EMPLOYEE_DASHBOARD: &str = "/employee/dashboard";
/// Daily truck opening form
pub const EMPLOYEE_OPENING_DETAILS: &str = "/employee/opening-details";

/// Which part of the console a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Login,
    Admin,
    Employee,
    Other,
}

impl RouteKind {
    /// The role a protected subtree belongs to
    pub fn owner(self) -> Option<Role> {
        match self {
            RouteKind::Admin => Some(Role::Admin),
            RouteKind::Employee => Some(Role::Employee),
            RouteKind::Login | RouteKind::Other => None,
        }
    }
}

/// Paths the guard redirects between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub login: &'static str,
    pub admin_home: &'static str,
    pub employee_home: &'static str,
    /// Where an employee lands straight after signing in
    pub employee_landing: &'static str,
    pub admin_prefix: &'static str,
    pub employee_prefix: &'static str,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            login: LOGIN_PATH,
            admin_home: ADMIN_HOME,
            employee_home: EMPLOYEE_DASHBOARD,
            employee_landing: EMPLOYEE_OPENING_DETAILS,
            admin_prefix: "/admin",
            employee_prefix: "/employee",
        }
    }
}

impl RouteTable {
    pub fn classify(&self, path: &str) -> RouteKind {
        if path == self.login {
            RouteKind::Login
        } else if in_subtree(path, self.admin_prefix) {
            RouteKind::Admin
        } else if in_subtree(path, self.employee_prefix) {
            RouteKind::Employee
        } else {
            RouteKind::Other
        }
    }

    /// Home route for a role
    pub fn home(&self, role: Role) -> &'static str {
        match role {
            Role::Admin => self.admin_home,
            Role::Employee => self.employee_home,
        }
    }

    /// Route to open right after a successful login
    pub fn landing(&self, role: Role) -> &'static str {
        match role {
            Role::Admin => self.admin_home,
            Role::Employee => self.employee_landing,
        }
    }
}

fn in_subtree(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
