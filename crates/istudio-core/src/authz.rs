//! Roles, permissions, and the authorization decision core.
//!
//! This module is the single source of truth for the role → permission
//! mapping and for access decisions. Everything here is pure and
//! synchronous; the guard component and the HTTP middleware both delegate
//! to [`evaluate`] so that route-level and component-level checks cannot
//! drift apart.
//!
//! # Roles
//!
//! | Role   | Permissions                  |
//! |--------|------------------------------|
//! | admin  | read, write, delete, admin   |
//! | editor | read, write, delete          |
//! | user   | read, write                  |
//! | guest  | read                         |
//!
//! Role strings are normalized to lower-case before lookup. A role that is
//! not in the table falls back to the default set (`read` only), so an
//! unknown or mistyped role never escalates privileges.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An atomic capability checked against a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Admin,
}

impl Permission {
    /// Wire/display name of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
            Permission::Admin => "admin",
        }
    }

    /// Case-insensitive parse; returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Permission> {
        match s.trim().to_lowercase().as_str() {
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "delete" => Some(Permission::Delete),
            "admin" => Some(Permission::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::parse(s).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// Error returned when parsing an unknown permission name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

/// A recognized system role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    User,
    Guest,
}

impl Role {
    /// Wire/display name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }

    /// Case-insensitive parse; returns `None` for unrecognized roles.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "editor" => Some(Role::Editor),
            "user" => Some(Role::User),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    /// The static permission set granted to this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => &[
                Permission::Read,
                Permission::Write,
                Permission::Delete,
                Permission::Admin,
            ],
            Role::Editor => &[Permission::Read, Permission::Write, Permission::Delete],
            Role::User => &[Permission::Read, Permission::Write],
            Role::Guest => &[Permission::Read],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission set applied to roles that are not in the mapping.
pub const DEFAULT_PERMISSIONS: &[Permission] = &[Permission::Read];

/// Resolves the permission set for a role string.
///
/// Unrecognized roles get [`DEFAULT_PERMISSIONS`].
pub fn permissions_for_role(role: &str) -> &'static [Permission] {
    match Role::parse(role) {
        Some(role) => role.permissions(),
        None => DEFAULT_PERMISSIONS,
    }
}

/// Pure membership test: does `role` grant `permission`?
pub fn has_permission(role: &str, permission: Permission) -> bool {
    permissions_for_role(role).contains(&permission)
}

/// The authenticated actor evaluated for authorization.
///
/// Owned by the session collaborator; created on sign-in and dropped on
/// sign-out or session expiry. When `permissions_override` is set it
/// replaces the role-derived permission set entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: String,
    pub permissions_override: Option<HashSet<Permission>>,
}

impl Principal {
    pub fn new(id: Uuid, role: impl Into<String>) -> Self {
        Self {
            id,
            role: role.into(),
            permissions_override: None,
        }
    }

    pub fn with_override(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions_override = Some(permissions.into_iter().collect());
        self
    }

    /// Effective permission check: the override wins when present,
    /// otherwise the role mapping applies.
    pub fn has_permission(&self, permission: Permission) -> bool {
        match &self.permissions_override {
            Some(set) => set.contains(&permission),
            None => has_permission(&self.role, permission),
        }
    }

    pub fn is_admin(&self) -> bool {
        Role::parse(&self.role) == Some(Role::Admin)
    }

    /// Permission names for embedding into token claims.
    pub fn permission_names(&self) -> Vec<String> {
        match &self.permissions_override {
            Some(set) => {
                let mut names: Vec<String> = set.iter().map(|p| p.as_str().to_string()).collect();
                names.sort();
                names
            }
            None => permissions_for_role(&self.role)
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }
}

/// Why an access decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionReason {
    NoSession,
    InsufficientRole,
    InsufficientPermission,
    Ok,
}

/// A transient, derived authorization decision. Recomputed whenever the
/// principal, route, or required permission changes; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl AccessDecision {
    pub fn ok() -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::Ok,
        }
    }

    pub fn denied(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Evaluates whether `principal` may access a resource guarded by
/// `admin_only` and/or `required_permission`.
///
/// Check order matches the guard: session presence, then the admin-only
/// flag, then the required permission. With neither constraint set, any
/// authenticated principal is allowed.
pub fn evaluate(
    principal: Option<&Principal>,
    admin_only: bool,
    required_permission: Option<Permission>,
) -> AccessDecision {
    let Some(principal) = principal else {
        return AccessDecision::denied(DecisionReason::NoSession);
    };

    if admin_only && !principal.is_admin() {
        return AccessDecision::denied(DecisionReason::InsufficientRole);
    }

    if let Some(required) = required_permission
        && !principal.has_permission(required)
    {
        return AccessDecision::denied(DecisionReason::InsufficientPermission);
    }

    AccessDecision::ok()
}
