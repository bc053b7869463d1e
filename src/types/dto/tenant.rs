use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::{profile, studio};

/// Talent profile with its skills and locations
#[derive(Object, Debug, Clone)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub availability: bool,
    pub region_id: Option<String>,
    pub skills: Vec<String>,
    pub location_ids: Vec<String>,
}

impl ProfileResponse {
    pub fn from_model(model: profile::Model, skills: Vec<String>, location_ids: Vec<String>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            display_name: model.display_name,
            bio: model.bio,
            availability: model.availability,
            region_id: model.region_id,
            skills,
            location_ids,
        }
    }
}

#[derive(Object, Debug)]
pub struct InitializeStudioRequest {
    pub name: String,
    pub region_id: Option<String>,
}

#[derive(Object, Debug, Clone)]
pub struct StudioResponse {
    pub id: String,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub region_id: Option<String>,
}

impl From<studio::Model> for StudioResponse {
    fn from(model: studio::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_email: model.contact_email,
            contact_phone: model.contact_phone,
            region_id: model.region_id,
        }
    }
}

/// 201 on first initialization, 200 when it already existed
#[derive(ApiResponse)]
pub enum InitializeProfileResponse {
    #[oai(status = 201)]
    Created(Json<ProfileResponse>),
    #[oai(status = 200)]
    Existing(Json<ProfileResponse>),
}

#[derive(ApiResponse)]
pub enum InitializeStudioResponse {
    #[oai(status = 201)]
    Created(Json<StudioResponse>),
    #[oai(status = 200)]
    Existing(Json<StudioResponse>),
}
