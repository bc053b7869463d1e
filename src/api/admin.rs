use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::app_data::AppData;
use crate::api::helpers;
use crate::coordinators::AdminCoordinator;
use crate::errors::AccessError;
use crate::types::dto::admin::{ChangeRoleRequest, ChangeRoleResponse, CreateRegionRequest, RegionResponse};
use crate::types::dto::common::DeletedResponse;

/// Admin endpoints
pub struct AdminApi {
    app_data: Arc<AppData>,
    admin_coordinator: AdminCoordinator,
}

impl AdminApi {
    /// Create a new AdminApi over the shared AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            admin_coordinator: AdminCoordinator::new(app_data.clone()),
            app_data,
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Reference data management
    Regions,
    /// Role management
    Roles,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    #[oai(path = "/regions", method = "get", tag = "AdminTags::Regions")]
    async fn list_regions(&self, req: &Request) -> Result<Json<Vec<RegionResponse>>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let regions = self.admin_coordinator.list_regions(&ctx).await?;
        Ok(Json(regions.into_iter().map(RegionResponse::from).collect()))
    }

    #[oai(path = "/regions", method = "post", tag = "AdminTags::Regions")]
    async fn create_region(
        &self,
        req: &Request,
        body: Json<CreateRegionRequest>,
    ) -> Result<Json<RegionResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let region = self.admin_coordinator.create_region(&ctx, &body.name).await?;
        Ok(Json(region.into()))
    }

    /// Delete a region
    ///
    /// Refused with 409 and per-type counts while locations, casting calls, profiles or
    /// studios reference it.
    #[oai(path = "/regions/:id", method = "delete", tag = "AdminTags::Regions")]
    async fn delete_region(&self, req: &Request, id: Path<String>) -> Result<Json<DeletedResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        self.admin_coordinator.delete_region(&ctx, &id.0).await?;
        Ok(Json(DeletedResponse {
            message: "Region deleted".to_string(),
            id: id.0,
        }))
    }

    /// Change another identity's role (super admin only)
    #[oai(path = "/users/:id/role", method = "put", tag = "AdminTags::Roles")]
    async fn change_role(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<ChangeRoleRequest>,
    ) -> Result<Json<ChangeRoleResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let (old_role, new_role) = self.admin_coordinator.change_role(&ctx, &id.0, &body.role).await?;
        Ok(Json(ChangeRoleResponse {
            user_id: id.0,
            old_role: old_role.to_string(),
            new_role: new_role.to_string(),
        }))
    }
}
