use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::app_data::AppData;
use crate::api::helpers;
use crate::coordinators::TenantCoordinator;
use crate::errors::AccessError;
use crate::types::dto::tenant::{InitializeProfileResponse, InitializeStudioRequest, InitializeStudioResponse};

/// Tenant initialization endpoints
pub struct TenantApi {
    app_data: Arc<AppData>,
    tenant_coordinator: TenantCoordinator,
}

impl TenantApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            tenant_coordinator: TenantCoordinator::new(app_data.clone()),
            app_data,
        }
    }
}

#[derive(Tags)]
enum TenantTags {
    /// Profile and studio initialization
    Tenant,
}

#[OpenApi(prefix_path = "/tenant")]
impl TenantApi {
    /// Ensure the caller has a talent profile
    ///
    /// Returns 201 the first time, 200 with the same profile afterwards.
    #[oai(path = "/profile", method = "post", tag = "TenantTags::Tenant")]
    async fn initialize_profile(&self, req: &Request) -> Result<InitializeProfileResponse, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;

        let provisioned = self.tenant_coordinator.initialize_profile(&ctx).await?;

        Ok(if provisioned.created {
            InitializeProfileResponse::Created(Json(provisioned.value))
        } else {
            InitializeProfileResponse::Existing(Json(provisioned.value))
        })
    }

    /// Ensure the caller has a studio
    #[oai(path = "/studio", method = "post", tag = "TenantTags::Tenant")]
    async fn initialize_studio(
        &self,
        req: &Request,
        body: Json<InitializeStudioRequest>,
    ) -> Result<InitializeStudioResponse, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let body = body.0;

        let provisioned = self
            .tenant_coordinator
            .initialize_studio(&ctx, &body.name, body.region_id)
            .await?;

        Ok(if provisioned.created {
            InitializeStudioResponse::Created(Json(provisioned.value))
        } else {
            InitializeStudioResponse::Existing(Json(provisioned.value))
        })
    }
}
