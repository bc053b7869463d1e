use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::internal::{CredentialError, DatabaseError};
use crate::errors::{AccessError, InternalError};
use crate::providers::AuthorizationProvider;
use crate::stores::{CredentialStore, RegionStore};
use crate::types::db::region;
use crate::types::internal::context::RequestContext;
use crate::types::internal::identity::Role;

/// Administrative workflows: reference data and role management
pub struct AdminCoordinator {
    authorization_provider: Arc<AuthorizationProvider>,
    credential_store: Arc<CredentialStore>,
    region_store: Arc<RegionStore>,
    audit_logger: Arc<AuditLogger>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authorization_provider: app_data.authorization_provider.clone(),
            credential_store: app_data.credential_store.clone(),
            region_store: app_data.region_store.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    pub async fn list_regions(&self, ctx: &RequestContext) -> Result<Vec<region::Model>, AccessError> {
        self.authorization_provider.require_admin(ctx).await?;
        Ok(self.region_store.list_regions().await?)
    }

    pub async fn create_region(&self, ctx: &RequestContext, name: &str) -> Result<region::Model, AccessError> {
        self.authorization_provider.require_admin(ctx).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AccessError::validation_failed("Region name must not be empty"));
        }

        let region = self.region_store.create_region(name).await?;
        tracing::info!("Region {} ({}) created by {}", region.id, region.name, ctx.actor_id);
        Ok(region)
    }

    /// Delete a region nothing references
    ///
    /// # Errors
    /// 409 with per-type counts of locations, casting calls, profiles and studios
    pub async fn delete_region(&self, ctx: &RequestContext, id: &str) -> Result<(), AccessError> {
        self.authorization_provider.require_admin(ctx).await?;

        let region = self
            .region_store
            .find_region(id)
            .await?
            .ok_or_else(AccessError::not_found)?;

        let report = self.region_store.dependency_report(&region.id).await?;
        self.authorization_provider.ensure_no_dependents(ctx, report).await?;

        match self.region_store.delete_region(&region.id).await {
            Ok(true) => {}
            Ok(false) => return Err(AccessError::not_found()),
            Err(InternalError::Database(DatabaseError::StillReferenced { .. })) => {
                // A dependent arrived after the count
                let report = self.region_store.dependency_report(&region.id).await?;
                self.authorization_provider.ensure_no_dependents(ctx, report).await?;
                return Err(AccessError::conflict("Region is still referenced by other records"));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Region {} deleted by {}", region.id, ctx.actor_id);
        if let Err(audit_err) = self.audit_logger.log_region_deleted(ctx, &region.id, &region.name).await {
            tracing::error!("Failed to log region deletion: {:?}", audit_err);
        }

        Ok(())
    }

    /// Change another identity's role. Super admins only, never their own.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
        new_role: &str,
    ) -> Result<(Role, Role), AccessError> {
        let actor = self.authorization_provider.require_super_admin(ctx).await?;

        let new_role = Role::parse(new_role)
            .map_err(|_| AccessError::validation_failed("Role must be USER, ADMIN or SUPER_ADMIN"))?;

        if actor.identity.id == target_user_id {
            tracing::info!("Identity {} attempted to change its own role", actor.identity.id);
            return Err(AccessError::forbidden());
        }

        let target = self
            .credential_store
            .find_by_id(target_user_id)
            .await?
            .ok_or_else(AccessError::not_found)?;
        let old_role = Role::parse(&target.role)?;

        match self.credential_store.update_role(target_user_id, new_role).await {
            Ok(_) => {}
            Err(InternalError::Credential(CredentialError::IdentityNotFound { .. })) => {
                return Err(AccessError::not_found());
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            "Role of {} changed from {} to {} by {}",
            target_user_id,
            old_role,
            new_role,
            actor.identity.id
        );
        if let Err(audit_err) = self
            .audit_logger
            .log_role_changed(ctx, target_user_id, old_role, new_role)
            .await
        {
            tracing::error!("Failed to log role change: {:?}", audit_err);
        }

        Ok((old_role, new_role))
    }
}
