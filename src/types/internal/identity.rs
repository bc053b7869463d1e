use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InternalError;
use crate::types::db::user;

/// Role carried by an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

/// Roles that count as administrators. Changing who is an admin is an edit here only.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin, Role::SuperAdmin];

/// Roles allowed to perform super-admin operations
pub const SUPER_ADMIN_ROLES: &[Role] = &[Role::SuperAdmin];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Parse the stored column value
    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            other => Err(InternalError::parse("role", format!("unknown role '{}'", other))),
        }
    }

    pub fn is_in(&self, set: &[Role]) -> bool {
        set.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of organizational container an identity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantKind {
    Studio,
    Talent,
}

impl TenantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Studio => "STUDIO",
            Self::Talent => "TALENT",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InternalError> {
        match value {
            "STUDIO" => Ok(Self::Studio),
            "TALENT" => Ok(Self::Talent),
            other => Err(InternalError::parse("tenant_kind", format!("unknown tenant kind '{}'", other))),
        }
    }
}

impl fmt::Display for TenantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful credential check. Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Identity as currently stored, loaded fresh for authorization decisions
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<String>,
    /// Set when the session subject was not found and the identity was recovered by email
    pub recovered_by_email: bool,
}

impl Identity {
    /// Build from a stored row, rejecting unknown role values
    pub fn from_model(model: &user::Model, recovered_by_email: bool) -> Result<Self, InternalError> {
        Ok(Self {
            id: model.id.clone(),
            email: model.email.clone(),
            role: Role::parse(&model.role)?,
            tenant_id: model.tenant_id.clone(),
            recovered_by_email,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_in(ADMIN_ROLES)
    }
}
