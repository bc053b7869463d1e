use crate::errors::internal::{DatabaseError, InternalError, TenantError};
use crate::types::internal::access::{Denial, DependencyReport};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for resource endpoints
#[derive(Object, Debug)]
pub struct AccessErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Number of rows of one type blocking a delete
#[derive(Object, Debug, Clone, PartialEq)]
pub struct DependentCountResponse {
    pub kind: String,
    pub count: u64,
}

/// 409 body for a delete refused because other rows still reference the entity
#[derive(Object, Debug)]
pub struct DependencyConflictResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Entity type that was to be deleted
    pub entity: String,
    /// Entity id
    pub id: String,
    /// Exact count per dependent type
    pub dependents: Vec<DependentCountResponse>,
}

/// Errors returned by authorization-gated endpoints
#[derive(ApiResponse, Debug)]
pub enum AccessError {
    /// No valid session
    #[oai(status = 401)]
    Unauthenticated(Json<AccessErrorResponse>),

    /// Authenticated but not entitled
    #[oai(status = 403)]
    Forbidden(Json<AccessErrorResponse>),

    /// Absent, or hidden from this caller
    #[oai(status = 404)]
    NotFound(Json<AccessErrorResponse>),

    /// Delete refused, dependents still reference the entity
    #[oai(status = 409)]
    DependencyConflict(Json<DependencyConflictResponse>),

    /// Conflicting state
    #[oai(status = 409)]
    Conflict(Json<AccessErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<AccessErrorResponse>),

    /// Transient failure, the client should retry
    #[oai(status = 503)]
    TryAgain(Json<AccessErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AccessErrorResponse>),
}

impl AccessError {
    fn build(error: &str, message: &str, status_code: u16) -> Json<AccessErrorResponse> {
        Json(AccessErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
            status_code,
        })
    }

    pub fn unauthenticated() -> Self {
        AccessError::Unauthenticated(Self::build("unauthenticated", "Authentication required", 401))
    }

    pub fn forbidden() -> Self {
        AccessError::Forbidden(Self::build(
            "forbidden",
            "You do not have permission to perform this action",
            403,
        ))
    }

    pub fn not_found() -> Self {
        AccessError::NotFound(Self::build("not_found", "Resource not found", 404))
    }

    pub fn conflict(message: &str) -> Self {
        AccessError::Conflict(Self::build("conflict", message, 409))
    }

    pub fn validation_failed(message: &str) -> Self {
        AccessError::ValidationFailed(Self::build("validation_failed", message, 400))
    }

    pub fn try_again() -> Self {
        AccessError::TryAgain(Self::build(
            "try_again",
            "The service is temporarily unavailable, please try again",
            503,
        ))
    }

    pub fn dependency_conflict(report: DependencyReport) -> Self {
        let message = format!(
            "Cannot delete {} while {} dependent record(s) reference it",
            report.entity,
            report.total()
        );
        AccessError::DependencyConflict(Json(DependencyConflictResponse {
            error: "has_dependents".to_string(),
            message,
            status_code: 409,
            entity: report.entity,
            id: report.id,
            dependents: report
                .dependents
                .into_iter()
                .map(|d| DependentCountResponse { kind: d.kind, count: d.count })
                .collect(),
        }))
    }

    pub fn from_denial(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => Self::unauthenticated(),
            Denial::Forbidden => Self::forbidden(),
            Denial::NotFound => Self::not_found(),
        }
    }

    /// Convert InternalError to AccessError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Tenant(TenantError::KindMismatch { expected, actual }) => {
                tracing::debug!("Tenant kind mismatch: expected {}, found {}", expected, actual);
                Self::forbidden()
            }
            InternalError::Database(DatabaseError::Duplicate { entity, .. }) => {
                Self::conflict(&format!("A {} with that name already exists", entity))
            }
            InternalError::Database(DatabaseError::StillReferenced { entity, .. }) => {
                Self::conflict(&format!("The {} is still referenced by other records", entity))
            }
            _ if err.is_transient() => {
                tracing::warn!("Transient error in access check: {}", err);
                Self::try_again()
            }
            _ => {
                tracing::error!("Unexpected error in access check: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn internal_server_error() -> Self {
        AccessError::InternalError(Self::build("internal_error", "An internal error occurred", 500))
    }

    /// HTTP status of the variant
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Unauthenticated(json)
            | AccessError::Forbidden(json)
            | AccessError::NotFound(json)
            | AccessError::Conflict(json)
            | AccessError::ValidationFailed(json)
            | AccessError::TryAgain(json)
            | AccessError::InternalError(json) => json.0.status_code,
            AccessError::DependencyConflict(json) => json.0.status_code,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AccessError::Unauthenticated(json)
            | AccessError::Forbidden(json)
            | AccessError::NotFound(json)
            | AccessError::Conflict(json)
            | AccessError::ValidationFailed(json)
            | AccessError::TryAgain(json)
            | AccessError::InternalError(json) => json.0.message.clone(),
            AccessError::DependencyConflict(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for AccessError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl From<Denial> for AccessError {
    fn from(denial: Denial) -> Self {
        Self::from_denial(denial)
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
