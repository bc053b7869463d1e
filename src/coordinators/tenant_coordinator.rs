use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::AccessError;
use crate::providers::{AuthorizationProvider, TenantProvider};
use crate::stores::{RegionStore, TenantStore};
use crate::types::dto::tenant::{ProfileResponse, StudioResponse};
use crate::types::internal::context::RequestContext;
use crate::types::internal::tenant::Provisioned;

/// Lazy provisioning of the entity an identity acts through
pub struct TenantCoordinator {
    authorization_provider: Arc<AuthorizationProvider>,
    tenant_provider: Arc<TenantProvider>,
    tenant_store: Arc<TenantStore>,
    region_store: Arc<RegionStore>,
}

impl TenantCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authorization_provider: app_data.authorization_provider.clone(),
            tenant_provider: app_data.tenant_provider.clone(),
            tenant_store: app_data.tenant_store.clone(),
            region_store: app_data.region_store.clone(),
        }
    }

    /// Ensure the caller has a talent profile
    ///
    /// Studio tenants are refused with 403.
    pub async fn initialize_profile(
        &self,
        ctx: &RequestContext,
    ) -> Result<Provisioned<ProfileResponse>, AccessError> {
        let actor = self.authorization_provider.require_authenticated(ctx).await?;

        let provisioned = self.tenant_provider.initialize_profile(ctx, &actor.identity).await?;

        let skills = self.tenant_store.profile_skills(&provisioned.value.id).await?;
        let location_ids = self.tenant_store.profile_location_ids(&provisioned.value.id).await?;

        Ok(Provisioned {
            value: ProfileResponse::from_model(provisioned.value, skills, location_ids),
            created: provisioned.created,
        })
    }

    /// Ensure the caller has a studio
    ///
    /// Talent tenants are refused with 403. `name` is ignored when the studio exists.
    pub async fn initialize_studio(
        &self,
        ctx: &RequestContext,
        name: &str,
        region_id: Option<String>,
    ) -> Result<Provisioned<StudioResponse>, AccessError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccessError::validation_failed("Studio name must not be empty"));
        }

        let actor = self.authorization_provider.require_authenticated(ctx).await?;

        if let Some(region_id) = region_id.as_deref() {
            if self.region_store.find_region(region_id).await?.is_none() {
                return Err(AccessError::validation_failed("Unknown region"));
            }
        }

        let provisioned = self
            .tenant_provider
            .initialize_studio(ctx, &actor.identity, name, region_id)
            .await?;

        Ok(Provisioned {
            value: StudioResponse::from(provisioned.value),
            created: provisioned.created,
        })
    }
}
