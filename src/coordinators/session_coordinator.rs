use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::internal::CredentialError;
use crate::errors::{AccessError, InternalError};
use crate::providers::{AuthorizationProvider, TenantProvider, TokenProvider};
use crate::stores::CredentialStore;
use crate::types::db::user;
use crate::types::internal::auth::{Claims, IssuedSession};
use crate::types::internal::context::RequestContext;
use crate::types::internal::identity::{Identity, Role};
use crate::types::internal::tenant::Actor;

/// Sign-up, sign-in, sign-out and session introspection workflows
pub struct SessionCoordinator {
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
    tenant_provider: Arc<TenantProvider>,
    authorization_provider: Arc<AuthorizationProvider>,
    audit_logger: Arc<AuditLogger>,
}

impl SessionCoordinator {
    /// Create SessionCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            token_provider: app_data.token_provider.clone(),
            tenant_provider: app_data.tenant_provider.clone(),
            authorization_provider: app_data.authorization_provider.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Create a USER identity with a password
    pub async fn sign_up(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let created = self.credential_store.create_identity(email, password, Role::User).await?;

        tracing::info!("Identity {} signed up", created.id);
        if let Err(audit_err) = self
            .audit_logger
            .log_identity_created(ctx, &created.id, &created.email, Role::User)
            .await
        {
            tracing::error!("Failed to log identity creation: {:?}", audit_err);
        }

        Ok(created)
    }

    /// Verify credentials and issue a session
    ///
    /// # Returns
    /// * `Ok(Some(session))` - credentials matched
    /// * `Ok(None)` - no match
    /// * `Err(CredentialError::MalformedEmail)` - rejected before any lookup
    pub async fn sign_in(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<Option<IssuedSession>, InternalError> {
        let verified = match self.credential_store.verify_credentials(email, password).await {
            Ok(verified) => verified,
            Err(InternalError::Credential(CredentialError::MalformedEmail)) => {
                self.audit_sign_in_failure(ctx, email, "malformed_email").await;
                return Err(CredentialError::MalformedEmail.into());
            }
            Err(e) => return Err(e),
        };

        let Some(verified) = verified else {
            self.audit_sign_in_failure(ctx, email, "no_match").await;
            return Ok(None);
        };

        let user = self
            .credential_store
            .find_by_id(&verified.id)
            .await?
            .ok_or_else(|| CredentialError::IdentityNotFound {
                user_id: verified.id.clone(),
            })?;
        let identity = Identity::from_model(&user, false)?;

        // Embedded kind is a display hint, so a slow lookup just omits it
        let tenant_kind = match self.tenant_provider.resolve_tenant(&identity).await {
            Ok(resolution) => resolution.kind(),
            Err(e) => {
                tracing::warn!("Tenant hint unavailable for {}: {}", identity.id, e);
                None
            }
        };

        let session = self.token_provider.issue(&identity, tenant_kind)?;

        tracing::info!("Identity {} signed in", identity.id);
        let ctx = ctx.clone().with_actor_id(identity.id.clone());
        if let Err(audit_err) = self
            .audit_logger
            .log_sign_in_success(&ctx, &identity.id, &session.claims.jti)
            .await
        {
            tracing::error!("Failed to log sign-in: {:?}", audit_err);
        }

        Ok(Some(session))
    }

    async fn audit_sign_in_failure(&self, ctx: &RequestContext, email: &str, reason: &str) {
        tracing::debug!("Sign-in failed: {}", reason);
        if let Err(audit_err) = self.audit_logger.log_sign_in_failure(ctx, email, reason).await {
            tracing::error!("Failed to log sign-in failure: {:?}", audit_err);
        }
    }

    /// Revoke the presented session. Without one there is nothing to revoke.
    pub async fn sign_out(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let Some(claims) = ctx.claims.as_ref() else {
            return Ok(());
        };

        self.token_provider.revoke(claims).await?;

        tracing::info!("Identity {} signed out", claims.sub);
        if let Err(audit_err) = self.audit_logger.log_sign_out(ctx).await {
            tracing::error!("Failed to log sign-out: {:?}", audit_err);
        }

        Ok(())
    }

    /// Identity and tenant as currently stored, plus the presented claims
    pub async fn current_session(&self, ctx: &RequestContext) -> Result<(Actor, Claims), AccessError> {
        let actor = self.authorization_provider.require_authenticated(ctx).await?;
        let claims = ctx.claims.clone().ok_or_else(AccessError::unauthenticated)?;
        Ok((actor, claims))
    }
}
