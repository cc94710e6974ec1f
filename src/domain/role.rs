//! User roles
//!
//! The backend reports roles as short strings (`SAdmin`, `Admin`, `User`).
//! Anything else, including an absent role, maps to [`Role::Unauthenticated`].

use serde::{Deserialize, Serialize};

/// Coarse authorization level of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full access, including user administration
    SuperAdmin,
    /// Workplace management
    Admin,
    /// Read-only access to workplaces
    User,
    /// No session
    #[default]
    Unauthenticated,
}

impl Role {
    /// Roles that can be assigned to a new account
    pub const ASSIGNABLE: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SAdmin",
            Self::Admin => "Admin",
            Self::User => "User",
            Self::Unauthenticated => "",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "SAdmin" => Self::SuperAdmin,
            "Admin" => Self::Admin,
            "User" => Self::User,
            _ => Self::Unauthenticated,
        }
    }

    /// Parse an optional stored role string
    pub fn from_stored(s: Option<&str>) -> Self {
        s.map(Self::parse).unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Set of roles allowed to use a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(&'static [Role]);

impl RoleSet {
    pub const ANYONE: RoleSet = RoleSet(&[
        Role::SuperAdmin,
        Role::Admin,
        Role::User,
        Role::Unauthenticated,
    ]);
    pub const SIGNED_IN: RoleSet = RoleSet(&[Role::SuperAdmin, Role::Admin, Role::User]);
    pub const MANAGERS: RoleSet = RoleSet(&[Role::SuperAdmin, Role::Admin]);
    pub const SUPER_ADMIN: RoleSet = RoleSet(&[Role::SuperAdmin]);

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn roles(&self) -> &'static [Role] {
        self.0
    }
}
