use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    /// Email did not pass format validation. Distinct from a failed match.
    #[error("Malformed email address")]
    MalformedEmail,

    #[error("Password must be at least {min_length} characters")]
    PasswordTooShort { min_length: usize },

    #[error("Identity already exists: {0}")]
    DuplicateEmail(String),

    #[error("Identity not found: {user_id}")]
    IdentityNotFound { user_id: String },

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}
