use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::AccessError;
use crate::providers::AuthorizationProvider;
use crate::stores::{CastingStore, TenantStore};
use crate::types::db::{application, casting_call, external_actor, project};
use crate::types::dto::tenant::ProfileResponse;
use crate::types::internal::access::AccessMode;
use crate::types::internal::context::RequestContext;

/// Reads and deletes of studio-scoped resources, each behind its access predicate
pub struct CastingCoordinator {
    authorization_provider: Arc<AuthorizationProvider>,
    casting_store: Arc<CastingStore>,
    tenant_store: Arc<TenantStore>,
}

impl CastingCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authorization_provider: app_data.authorization_provider.clone(),
            casting_store: app_data.casting_store.clone(),
            tenant_store: app_data.tenant_store.clone(),
        }
    }

    pub async fn get_application(&self, ctx: &RequestContext, id: &str) -> Result<application::Model, AccessError> {
        self.authorization_provider
            .can_access_application(ctx, id, AccessMode::Read)
            .await
    }

    /// Withdraw an application. Only the applicant may.
    pub async fn withdraw_application(&self, ctx: &RequestContext, id: &str) -> Result<(), AccessError> {
        let application = self
            .authorization_provider
            .can_access_application(ctx, id, AccessMode::Delete)
            .await?;

        if !self.casting_store.delete_application(&application.id).await? {
            return Err(AccessError::not_found());
        }
        tracing::info!("Application {} withdrawn by {}", application.id, ctx.actor_id);
        Ok(())
    }

    pub async fn get_project(&self, ctx: &RequestContext, id: &str) -> Result<project::Model, AccessError> {
        self.authorization_provider
            .can_access_project(ctx, id, AccessMode::Read)
            .await
    }

    /// Delete a project that no casting call references
    pub async fn delete_project(&self, ctx: &RequestContext, id: &str) -> Result<(), AccessError> {
        let project = self
            .authorization_provider
            .can_access_project(ctx, id, AccessMode::Delete)
            .await?;

        let report = self.casting_store.project_dependents(&project.id).await?;
        self.authorization_provider.ensure_no_dependents(ctx, report).await?;

        if !self.casting_store.delete_project(&project.id).await? {
            return Err(AccessError::not_found());
        }
        tracing::info!("Project {} deleted by {}", project.id, ctx.actor_id);
        Ok(())
    }

    pub async fn get_casting_call(&self, ctx: &RequestContext, id: &str) -> Result<casting_call::Model, AccessError> {
        self.authorization_provider
            .can_access_casting_call(ctx, id, AccessMode::Read)
            .await
    }

    /// Delete a casting call. Its applications go with it.
    pub async fn delete_casting_call(&self, ctx: &RequestContext, id: &str) -> Result<(), AccessError> {
        let call = self
            .authorization_provider
            .can_access_casting_call(ctx, id, AccessMode::Delete)
            .await?;

        if !self.casting_store.delete_casting_call(&call.id).await? {
            return Err(AccessError::not_found());
        }
        tracing::info!("Casting call {} deleted by {}", call.id, ctx.actor_id);
        Ok(())
    }

    pub async fn get_external_actor(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<external_actor::Model, AccessError> {
        self.authorization_provider
            .can_access_external_actor(ctx, id, AccessMode::Read)
            .await
    }

    pub async fn get_profile(&self, ctx: &RequestContext, id: &str) -> Result<ProfileResponse, AccessError> {
        let profile = self
            .authorization_provider
            .can_access_profile(ctx, id, AccessMode::Read)
            .await?;

        let skills = self.tenant_store.profile_skills(&profile.id).await?;
        let location_ids = self.tenant_store.profile_location_ids(&profile.id).await?;

        Ok(ProfileResponse::from_model(profile, skills, location_ids))
    }
}
