//! Signed-in principal

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::role::{Role, admin_flag};

/// The identity returned by a successful login
///
/// Mirrors the backend's employee document. `emp_id` is required, `emp_name`
/// is optional, and `isAdmin` becomes a [`Role`]. Fields the guard does not
/// consult (contact number, username, creation date, ...) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "emp_id")]
    pub id: String,

    #[serde(rename = "emp_name", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "isAdmin", default, with = "admin_flag")]
    pub role: Role,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            role,
            extra: Map::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
