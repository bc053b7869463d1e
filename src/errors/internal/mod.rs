use thiserror::Error;

pub mod audit;
pub mod credential;
pub mod database;
pub mod tenant;

pub use audit::AuditError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use tenant::TenantError;

/// Internal error type for store and provider operations
///
/// Infrastructure errors are shared; domain errors live in their own enums.
/// Not exposed via API - endpoints must convert to AuthError or AccessError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error("Timed out: {operation} exceeded {budget_ms}ms")]
    Timeout {
        operation: String,
        budget_ms: u64,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: &str, budget: std::time::Duration) -> InternalError {
        InternalError::Timeout {
            operation: operation.to_string(),
            budget_ms: budget.as_millis() as u64,
        }
    }

    /// Transient failures the caller may retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            InternalError::Timeout { .. }
                | InternalError::Database(DatabaseError::TransactionBegin { .. })
        )
    }
}
