use poem_openapi::Object;

use crate::types::db::region;

/// Request to create a region
#[derive(Object, Debug)]
pub struct CreateRegionRequest {
    pub name: String,
}

#[derive(Object, Debug)]
pub struct RegionResponse {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

impl From<region::Model> for RegionResponse {
    fn from(model: region::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

/// Request to change an identity's role
#[derive(Object, Debug)]
pub struct ChangeRoleRequest {
    /// USER, ADMIN or SUPER_ADMIN
    pub role: String,
}

/// Response after a role change
#[derive(Object, Debug)]
pub struct ChangeRoleResponse {
    pub user_id: String,
    pub old_role: String,
    pub new_role: String,
}
