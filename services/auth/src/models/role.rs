//! Role model and related functionality

use serde::{Deserialize, Deserializer, Serializer};

/// What a signed-in principal is allowed to see
///
/// The backend encodes this as a single `isAdmin` flag. A principal whose
/// flag is missing or null is treated as an employee so route resolution
/// stays deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn from_admin_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Role::Admin,
            Some(false) | None => Role::Employee,
        }
    }
}

/// Serde adapter between [`Role`] and the backend's `isAdmin` boolean
pub(crate) mod admin_flag {
    use super::*;

    pub fn serialize<S>(role: &Role, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(role.is_admin())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Role, D::Error>
    where
        D: Deserializer<'de>,
    {
        let flag = Option::<bool>::deserialize(deserializer)?;
        Ok(Role::from_admin_flag(flag))
    }
}
