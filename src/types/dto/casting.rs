use poem_openapi::Object;

use crate::types::db::{application, casting_call, external_actor, project};

#[derive(Object, Debug)]
pub struct ProjectResponse {
    pub id: String,
    pub studio_id: String,
    pub name: String,
    pub created_at: i64,
}

impl From<project::Model> for ProjectResponse {
    fn from(model: project::Model) -> Self {
        Self {
            id: model.id,
            studio_id: model.studio_id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CastingCallResponse {
    pub id: String,
    pub studio_id: String,
    pub project_id: Option<String>,
    pub region_id: Option<String>,
    pub title: String,
    pub status: String,
    pub created_at: i64,
}

impl From<casting_call::Model> for CastingCallResponse {
    fn from(model: casting_call::Model) -> Self {
        Self {
            id: model.id,
            studio_id: model.studio_id,
            project_id: model.project_id,
            region_id: model.region_id,
            title: model.title,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct ApplicationResponse {
    pub id: String,
    pub casting_call_id: String,
    pub profile_id: String,
    pub status: String,
    pub created_at: i64,
}

impl From<application::Model> for ApplicationResponse {
    fn from(model: application::Model) -> Self {
        Self {
            id: model.id,
            casting_call_id: model.casting_call_id,
            profile_id: model.profile_id,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct ExternalActorResponse {
    pub id: String,
    pub studio_id: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<external_actor::Model> for ExternalActorResponse {
    fn from(model: external_actor::Model) -> Self {
        Self {
            id: model.id,
            studio_id: model.studio_id,
            name: model.name,
            email: model.email,
        }
    }
}
