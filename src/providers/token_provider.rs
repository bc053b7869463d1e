use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::stores::SessionStore;
use crate::types::internal::auth::{Claims, IssuedSession, LoggedOutReason, SessionLookup};
use crate::types::internal::identity::{Identity, TenantKind};

/// Reads a presented session token
///
/// Async because revocation is a store round trip. Callers bound it with a timeout
/// and decide what an indeterminate result means.
#[async_trait]
pub trait SessionReader: Send + Sync {
    async fn read_session(&self, token: &str) -> Result<SessionLookup, InternalError>;
}

/// Issues and reads HS256 session tokens
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    session_store: Arc<SessionStore>,
    crypto: CryptoProvider,
    session_max_age: Duration,
}

impl TokenProvider {
    pub fn new(
        secret_manager: Arc<SecretManager>,
        session_store: Arc<SessionStore>,
        session_max_age: Duration,
    ) -> Self {
        Self {
            secret_manager,
            session_store,
            crypto: CryptoProvider::new(),
            session_max_age,
        }
    }

    pub fn session_max_age(&self) -> Duration {
        self.session_max_age
    }

    /// Issue a session for `identity`
    ///
    /// `tenant_kind` is embedded as a hint only.
    pub fn issue(&self, identity: &Identity, tenant_kind: Option<TenantKind>) -> Result<IssuedSession, InternalError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            role: identity.role,
            tenant_kind,
            iat: now,
            exp: now + self.session_max_age.as_secs() as i64,
            jti: Uuid::new_v4().to_string(),
        };

        let token = self.encode_claims(&claims)?;
        Ok(IssuedSession { token, claims })
    }

    /// Sign an existing claim set
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret_manager.auth_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("session_encode", e.to_string()))
    }

    /// Verify signature and expiry, without the revocation check
    pub fn decode(&self, token: &str) -> SessionLookup {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.auth_secret().as_bytes()),
            &validation,
        ) {
            Ok(data) => SessionLookup::Valid(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => SessionLookup::LoggedOut(LoggedOutReason::Expired),
                _ => {
                    tracing::debug!("Rejected session token: {}", e);
                    SessionLookup::LoggedOut(LoggedOutReason::Invalid)
                }
            },
        }
    }

    fn jti_hash(&self, jti: &str) -> Result<String, InternalError> {
        self.crypto.hmac_sha256_hex(self.secret_manager.auth_secret(), jti)
    }

    /// Revoke the session these claims belong to
    pub async fn revoke(&self, claims: &Claims) -> Result<(), InternalError> {
        let jti_hash = self.jti_hash(&claims.jti)?;
        self.session_store.revoke(&jti_hash, &claims.sub, claims.exp).await
    }
}

#[async_trait]
impl SessionReader for TokenProvider {
    async fn read_session(&self, token: &str) -> Result<SessionLookup, InternalError> {
        let claims = match self.decode(token) {
            SessionLookup::Valid(claims) => claims,
            logged_out => return Ok(logged_out),
        };

        if self.session_store.is_revoked(&self.jti_hash(&claims.jti)?).await? {
            return Ok(SessionLookup::LoggedOut(LoggedOutReason::Revoked));
        }

        Ok(SessionLookup::Valid(claims))
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("session_max_age", &self.session_max_age)
            .finish()
    }
}
