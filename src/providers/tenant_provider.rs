use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::stores::{CredentialStore, TenantStore};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;
use crate::types::internal::identity::Identity;
use crate::types::internal::tenant::{ProvisionedProfile, ProvisionedStudio, TenantResolution};

/// Maps a session to the identity and tenant it acts as, from the store as it is now
pub struct TenantProvider {
    credential_store: Arc<CredentialStore>,
    tenant_store: Arc<TenantStore>,
    audit_logger: Arc<AuditLogger>,
    lookup_timeout: Duration,
}

impl TenantProvider {
    pub fn new(
        credential_store: Arc<CredentialStore>,
        tenant_store: Arc<TenantStore>,
        audit_logger: Arc<AuditLogger>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            credential_store,
            tenant_store,
            audit_logger,
            lookup_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, InternalError>
    where
        F: Future<Output = Result<T, InternalError>>,
    {
        tokio::time::timeout(self.lookup_timeout, fut)
            .await
            .map_err(|_| InternalError::timeout(operation, self.lookup_timeout))?
    }

    /// Load the identity a session refers to
    ///
    /// Falls back to the claimed email when the subject id is gone, which is audited.
    /// `None` means the session refers to nothing.
    pub async fn resolve_identity(
        &self,
        ctx: &RequestContext,
        claims: &Claims,
    ) -> Result<Option<Identity>, InternalError> {
        let by_id = self
            .bounded("resolve_identity", self.credential_store.find_by_id(&claims.sub))
            .await?;

        if let Some(user) = by_id {
            return Ok(Some(Identity::from_model(&user, false)?));
        }

        let by_email = self
            .bounded("resolve_identity_by_email", self.credential_store.find_by_email(&claims.email))
            .await?;

        let Some(user) = by_email else {
            tracing::debug!("Session subject {} no longer exists", claims.sub);
            return Ok(None);
        };

        tracing::warn!(
            "Session subject {} not found, recovered identity {} by email",
            claims.sub,
            user.id
        );
        if let Err(audit_err) = self
            .audit_logger
            .log_identity_mismatch(ctx, &claims.sub, &user.id, &user.email)
            .await
        {
            tracing::error!("Failed to log identity mismatch: {:?}", audit_err);
        }

        Ok(Some(Identity::from_model(&user, true)?))
    }

    /// Tenant kind and concrete entity for `identity`. Never taken from the token.
    pub async fn resolve_tenant(&self, identity: &Identity) -> Result<TenantResolution, InternalError> {
        self.bounded("resolve_tenant", self.tenant_store.resolve(identity)).await
    }

    /// Lazily create the talent profile. Refused for studio tenants.
    pub async fn initialize_profile(
        &self,
        ctx: &RequestContext,
        identity: &Identity,
    ) -> Result<ProvisionedProfile, InternalError> {
        let provisioned = self.tenant_store.provision_profile(identity).await?;

        if provisioned.created {
            tracing::info!("Initialized profile {} for identity {}", provisioned.value.id, identity.id);
            if let Err(audit_err) = self
                .audit_logger
                .log_provisioned(ctx, "profile", &provisioned.value.id)
                .await
            {
                tracing::error!("Failed to log profile provisioning: {:?}", audit_err);
            }
        }

        Ok(provisioned)
    }

    /// Lazily create the studio. Refused for talent tenants.
    pub async fn initialize_studio(
        &self,
        ctx: &RequestContext,
        identity: &Identity,
        name: &str,
        region_id: Option<String>,
    ) -> Result<ProvisionedStudio, InternalError> {
        let provisioned = self.tenant_store.provision_studio(identity, name, region_id).await?;

        if provisioned.created {
            tracing::info!("Initialized studio {} for identity {}", provisioned.value.id, identity.id);
            if let Err(audit_err) = self
                .audit_logger
                .log_provisioned(ctx, "studio", &provisioned.value.id)
                .await
            {
                tracing::error!("Failed to log studio provisioning: {:?}", audit_err);
            }
        }

        Ok(provisioned)
    }
}
