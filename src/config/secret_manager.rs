use std::fmt;
use std::sync::Arc;

use crate::config::{EnvironmentProvider, SystemEnvironment};

pub const AUTH_SECRET_MIN_LENGTH: usize = 32;
pub const PEPPER_MIN_LENGTH: usize = 16;

const AUTH_SECRET_VAR: &str = "AUTH_SECRET";
const PEPPER_VAR: &str = "PASSWORD_PEPPER";

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// Rotating `AUTH_SECRET` invalidates every outstanding session token.
pub struct SecretManager {
    auth_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::init_with(&SystemEnvironment)
    }

    /// Load and validate all secrets from the given provider
    pub fn init_with(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let auth_secret = env.get_var(AUTH_SECRET_VAR).ok_or_else(|| SecretError::missing(AUTH_SECRET_VAR))?;
        let password_pepper = env.get_var(PEPPER_VAR).ok_or_else(|| SecretError::missing(PEPPER_VAR))?;

        Self::from_values(&auth_secret, &password_pepper)
    }

    /// Build from known values, with the same length rules as `init`
    pub fn from_values(auth_secret: &str, password_pepper: &str) -> Result<Self, SecretError> {
        check_length(AUTH_SECRET_VAR, auth_secret, AUTH_SECRET_MIN_LENGTH)?;
        check_length(PEPPER_VAR, password_pepper, PEPPER_MIN_LENGTH)?;

        Ok(Self {
            auth_secret: auth_secret.to_string(),
            password_pepper: password_pepper.to_string(),
        })
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Session token signing secret
    pub fn auth_secret(&self) -> &str {
        &self.auth_secret
    }

    /// Pepper for password hashing
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }
}

fn check_length(name: &str, value: &str, min_length: usize) -> Result<(), SecretError> {
    if value.len() < min_length {
        return Err(SecretError::invalid_length(name, min_length, value.len()));
    }
    Ok(())
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("auth_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}
