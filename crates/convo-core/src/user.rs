//! Authenticated user model.

use serde::{Deserialize, Serialize};

/// Role assigned to a service account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    /// Parses the wire representation of a role. Anything that is not
    /// "admin" is treated as a regular user.
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Returns the wire representation of this role.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// An authenticated service user.
///
/// Constructed on a successful login or restored from persisted credentials,
/// and immutable afterwards. The session controller drops it wholesale when
/// the token is invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account name
    pub name: String,
    /// Account role
    pub role: UserRole,
    /// Opaque bearer credential, attached to authenticated calls via the
    /// `X-Auth-Token` header
    pub auth_token: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        role: UserRole,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            auth_token: auth_token.into(),
        }
    }

    /// Whether this user may call admin-only endpoints.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_wire_is_case_insensitive() {
        assert_eq!(UserRole::from_wire("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_wire("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from_wire("user"), UserRole::User);
        assert_eq!(UserRole::from_wire("anything-else"), UserRole::User);
    }

    #[test]
    fn admin_check() {
        let user = User::new("alice", UserRole::Admin, "T1");
        assert!(user.is_admin());
        let user = User::new("bob", UserRole::User, "T2");
        assert!(!user.is_admin());
    }
}
