use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    SignInSuccess,
    SignInFailure,
    SignOut,
    IdentityCreated,
    IdentityMismatch,
    AccessDenied,
    GuardFailOpen,
    TenantProvisioned,
    DeletionBlocked,
    RegionDeleted,
    RoleChanged,
    CliSessionStart,
    CliSessionEnd,
    Custom(String),
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::SignInSuccess => "sign_in_success",
            Self::SignInFailure => "sign_in_failure",
            Self::SignOut => "sign_out",
            Self::IdentityCreated => "identity_created",
            Self::IdentityMismatch => "identity_mismatch",
            Self::AccessDenied => "access_denied",
            Self::GuardFailOpen => "guard_fail_open",
            Self::TenantProvisioned => "tenant_provisioned",
            Self::DeletionBlocked => "deletion_blocked",
            Self::RegionDeleted => "region_deleted",
            Self::RoleChanged => "role_changed",
            Self::CliSessionStart => "cli_session_start",
            Self::CliSessionEnd => "cli_session_end",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit event structure for building and storing audit logs
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub jwt_id: Option<String>,
    pub request_id: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            user_id: None,
            ip_address: None,
            jwt_id: None,
            request_id: None,
            data: HashMap::new(),
        }
    }
}
