use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::app_data::AppData;
use crate::api::helpers;
use crate::coordinators::CastingCoordinator;
use crate::errors::AccessError;
use crate::types::dto::casting::{ApplicationResponse, CastingCallResponse, ExternalActorResponse, ProjectResponse};
use crate::types::dto::common::DeletedResponse;
use crate::types::dto::tenant::ProfileResponse;

/// Studio-scoped resource endpoints, each gated by its access predicate
pub struct CastingApi {
    app_data: Arc<AppData>,
    casting_coordinator: CastingCoordinator,
}

impl CastingApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            casting_coordinator: CastingCoordinator::new(app_data.clone()),
            app_data,
        }
    }
}

#[derive(Tags)]
enum CastingTags {
    Applications,
    Projects,
    CastingCalls,
    ExternalActors,
    Profiles,
}

fn deleted(id: String, what: &str) -> Json<DeletedResponse> {
    Json(DeletedResponse {
        message: format!("{} deleted", what),
        id,
    })
}

#[OpenApi]
impl CastingApi {
    /// Application, visible to its applicant and the studio that owns the casting call
    #[oai(path = "/applications/:id", method = "get", tag = "CastingTags::Applications")]
    async fn get_application(&self, req: &Request, id: Path<String>) -> Result<Json<ApplicationResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let application = self.casting_coordinator.get_application(&ctx, &id.0).await?;
        Ok(Json(application.into()))
    }

    /// Withdraw an application
    #[oai(path = "/applications/:id", method = "delete", tag = "CastingTags::Applications")]
    async fn withdraw_application(&self, req: &Request, id: Path<String>) -> Result<Json<DeletedResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        self.casting_coordinator.withdraw_application(&ctx, &id.0).await?;
        Ok(deleted(id.0, "Application"))
    }

    #[oai(path = "/projects/:id", method = "get", tag = "CastingTags::Projects")]
    async fn get_project(&self, req: &Request, id: Path<String>) -> Result<Json<ProjectResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let project = self.casting_coordinator.get_project(&ctx, &id.0).await?;
        Ok(Json(project.into()))
    }

    /// Delete a project
    ///
    /// Refused with 409 while casting calls reference it.
    #[oai(path = "/projects/:id", method = "delete", tag = "CastingTags::Projects")]
    async fn delete_project(&self, req: &Request, id: Path<String>) -> Result<Json<DeletedResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        self.casting_coordinator.delete_project(&ctx, &id.0).await?;
        Ok(deleted(id.0, "Project"))
    }

    #[oai(path = "/casting-calls/:id", method = "get", tag = "CastingTags::CastingCalls")]
    async fn get_casting_call(&self, req: &Request, id: Path<String>) -> Result<Json<CastingCallResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let call = self.casting_coordinator.get_casting_call(&ctx, &id.0).await?;
        Ok(Json(call.into()))
    }

    #[oai(path = "/casting-calls/:id", method = "delete", tag = "CastingTags::CastingCalls")]
    async fn delete_casting_call(&self, req: &Request, id: Path<String>) -> Result<Json<DeletedResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        self.casting_coordinator.delete_casting_call(&ctx, &id.0).await?;
        Ok(deleted(id.0, "Casting call"))
    }

    #[oai(path = "/external-actors/:id", method = "get", tag = "CastingTags::ExternalActors")]
    async fn get_external_actor(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<ExternalActorResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let actor = self.casting_coordinator.get_external_actor(&ctx, &id.0).await?;
        Ok(Json(actor.into()))
    }

    /// Talent profile, visible to its owner, admins and studios it applied to
    #[oai(path = "/profiles/:id", method = "get", tag = "CastingTags::Profiles")]
    async fn get_profile(&self, req: &Request, id: Path<String>) -> Result<Json<ProfileResponse>, AccessError> {
        let ctx = helpers::request_context(&self.app_data, req).await;
        let profile = self.casting_coordinator.get_profile(&ctx, &id.0).await?;
        Ok(Json(profile))
    }
}
