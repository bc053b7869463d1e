use crate::errors::internal::{CredentialError, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Email and password do not match a stored identity
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Email is not a well-formed address
    #[oai(status = 400)]
    MalformedEmail(Json<AuthErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<AuthErrorResponse>),

    /// An identity with this email already exists
    #[oai(status = 409)]
    DuplicateEmail(Json<AuthErrorResponse>),

    /// No valid session
    #[oai(status = 401)]
    Unauthenticated(Json<AuthErrorResponse>),

    /// Transient failure, the client should retry
    #[oai(status = 503)]
    TryAgain(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    fn build(error: &str, message: &str, status_code: u16) -> AuthErrorResponse {
        AuthErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
            status_code,
        }
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(Self::build(
            "invalid_credentials",
            "Invalid email or password",
            401,
        )))
    }

    pub fn malformed_email() -> Self {
        AuthError::MalformedEmail(Json(Self::build(
            "malformed_email",
            "Email address is not valid",
            400,
        )))
    }

    pub fn validation_failed(message: String) -> Self {
        AuthError::ValidationFailed(Json(AuthErrorResponse {
            error: "validation_failed".to_string(),
            message,
            status_code: 400,
        }))
    }

    pub fn duplicate_email() -> Self {
        AuthError::DuplicateEmail(Json(Self::build(
            "duplicate_email",
            "An account with this email already exists",
            409,
        )))
    }

    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(Self::build(
            "unauthenticated",
            "Authentication required",
            401,
        )))
    }

    pub fn try_again() -> Self {
        AuthError::TryAgain(Json(Self::build(
            "try_again",
            "The service is temporarily unavailable, please try again",
            503,
        )))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::MalformedEmail) => {
                tracing::debug!("Malformed email rejected");
                Self::malformed_email()
            }
            InternalError::Credential(CredentialError::PasswordTooShort { .. }) => {
                tracing::debug!("Password validation failed: {}", err);
                Self::validation_failed(err.to_string())
            }
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::info!("Duplicate sign-up attempt for {}", email);
                Self::duplicate_email()
            }
            InternalError::Credential(CredentialError::IdentityNotFound { user_id }) => {
                tracing::debug!("Session subject {} not found", user_id);
                Self::unauthenticated()
            }
            InternalError::Timeout { operation, .. } => {
                tracing::warn!("Timeout in {}: {}", operation, err);
                Self::try_again()
            }
            _ if err.is_transient() => {
                tracing::warn!("Transient error in auth operation: {}", err);
                Self::try_again()
            }
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Generic internal server error without internal details
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(Self::build(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::MalformedEmail(json) => json.0.message.clone(),
            AuthError::ValidationFailed(json) => json.0.message.clone(),
            AuthError::DuplicateEmail(json) => json.0.message.clone(),
            AuthError::Unauthenticated(json) => json.0.message.clone(),
            AuthError::TryAgain(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
