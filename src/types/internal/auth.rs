use serde::{Deserialize, Serialize};

use crate::types::internal::identity::{Role, TenantKind};

/// Session token claims
///
/// `role` and `tenant_kind` are hints for display and routing. Authorization decisions
/// reload both from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: String,

    /// Email at issue time, used for identity recovery
    pub email: String,

    pub role: Role,

    pub tenant_kind: Option<TenantKind>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token id
    pub jti: String,
}

/// A freshly issued session token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: Claims,
}

/// Why a presented token does not count as a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggedOutReason {
    Missing,
    Expired,
    Invalid,
    Revoked,
}

impl LoggedOutReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
            Self::Revoked => "revoked",
        }
    }
}

/// Outcome of reading a session token
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLookup {
    Valid(Claims),
    LoggedOut(LoggedOutReason),
}

/// What the route guard established for a request, stored in request extensions
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedSession {
    Authenticated(Claims),
    /// Public path, or no valid session
    Anonymous,
    /// Lookup timed out and a fail-open override forwarded the request
    Degraded,
}

pub const SESSION_COOKIE_NAME: &str = "castgate.session-token";
pub const SECURE_SESSION_COOKIE_NAME: &str = "__Secure-castgate.session-token";

/// Cookie name for the session token
pub fn session_cookie_name(secure: bool) -> &'static str {
    if secure {
        SECURE_SESSION_COOKIE_NAME
    } else {
        SESSION_COOKIE_NAME
    }
}
