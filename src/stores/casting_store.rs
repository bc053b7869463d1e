use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;
use crate::errors::internal::database::is_foreign_key_violation;
use crate::types::db::{application, casting_call, external_actor, project};
use crate::types::internal::access::DependencyReport;

/// Studio-scoped domain rows: projects, casting calls, applications and external actors
///
/// Reads here are unscoped. Callers must pass results through an access predicate.
pub struct CastingStore {
    db: DatabaseConnection,
}

impl CastingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_project(&self, studio_id: &str, name: &str) -> Result<project::Model, InternalError> {
        project::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            studio_id: Set(studio_id.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_project", e))
    }

    pub async fn create_casting_call(
        &self,
        studio_id: &str,
        project_id: Option<&str>,
        region_id: Option<&str>,
        title: &str,
    ) -> Result<casting_call::Model, InternalError> {
        casting_call::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            studio_id: Set(studio_id.to_string()),
            project_id: Set(project_id.map(str::to_string)),
            region_id: Set(region_id.map(str::to_string)),
            title: Set(title.to_string()),
            status: Set("OPEN".to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_casting_call", e))
    }

    pub async fn create_application(
        &self,
        casting_call_id: &str,
        profile_id: &str,
    ) -> Result<application::Model, InternalError> {
        application::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            casting_call_id: Set(casting_call_id.to_string()),
            profile_id: Set(profile_id.to_string()),
            status: Set("SUBMITTED".to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_application", e))
    }

    pub async fn create_external_actor(
        &self,
        studio_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> Result<external_actor::Model, InternalError> {
        external_actor::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            studio_id: Set(studio_id.to_string()),
            name: Set(name.to_string()),
            email: Set(email.map(str::to_string)),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_external_actor", e))
    }

    pub async fn find_project(&self, id: &str) -> Result<Option<project::Model>, InternalError> {
        project::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_project", e))
    }

    pub async fn find_casting_call(&self, id: &str) -> Result<Option<casting_call::Model>, InternalError> {
        casting_call::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_casting_call", e))
    }

    pub async fn find_application(&self, id: &str) -> Result<Option<application::Model>, InternalError> {
        application::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_application", e))
    }

    pub async fn find_external_actor(&self, id: &str) -> Result<Option<external_actor::Model>, InternalError> {
        external_actor::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_external_actor", e))
    }

    /// Whether `profile_id` has applied to any casting call owned by `studio_id`
    pub async fn has_applied_to_studio(&self, profile_id: &str, studio_id: &str) -> Result<bool, InternalError> {
        let call_ids: Vec<String> = casting_call::Entity::find()
            .select_only()
            .column(casting_call::Column::Id)
            .filter(casting_call::Column::StudioId.eq(studio_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_studio_casting_calls", e))?;

        if call_ids.is_empty() {
            return Ok(false);
        }

        let applications = application::Entity::find()
            .filter(application::Column::ProfileId.eq(profile_id))
            .filter(application::Column::CastingCallId.is_in(call_ids))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_studio_applications", e))?;

        Ok(applications > 0)
    }

    /// Rows that would block deleting a project
    pub async fn project_dependents(&self, project_id: &str) -> Result<DependencyReport, InternalError> {
        let casting_calls = casting_call::Entity::find()
            .filter(casting_call::Column::ProjectId.eq(project_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_project_casting_calls", e))?;

        Ok(DependencyReport::new("project", project_id).with("casting_calls", casting_calls))
    }

    /// # Errors
    /// `DatabaseError::StillReferenced` when a casting call was attached after the last count
    pub async fn delete_project(&self, id: &str) -> Result<bool, InternalError> {
        let result = project::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    InternalError::Database(DatabaseError::StillReferenced {
                        entity: "project".to_string(),
                        id: id.to_string(),
                    })
                } else {
                    InternalError::database("delete_project", e)
                }
            })?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_casting_call(&self, id: &str) -> Result<bool, InternalError> {
        let result = casting_call::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_casting_call", e))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_application(&self, id: &str) -> Result<bool, InternalError> {
        let result = application::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_application", e))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::TenantStore;
    use crate::types::internal::identity::{Identity, Role};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn user(db: &DatabaseConnection, id: &str) -> Identity {
        crate::types::db::user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(format!("{}@example.com", id)),
            password_hash: Set(None),
            role: Set("USER".to_string()),
            tenant_id: Set(None),
            created_at: Set(0),
            updated_at: Set(0),
        }
        .insert(db)
        .await
        .unwrap();

        Identity {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            role: Role::User,
            tenant_id: None,
            recovered_by_email: false,
        }
    }

    async fn setup() -> (CastingStore, TenantStore, String, String) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let tenants = TenantStore::new(db.clone());
        let studio = tenants
            .provision_studio(&user(&db, "studio-owner").await, "Northlight", None)
            .await
            .unwrap()
            .value;
        let profile = tenants
            .provision_profile(&user(&db, "talent").await)
            .await
            .unwrap()
            .value;

        (CastingStore::new(db), tenants, studio.id, profile.id)
    }

    #[tokio::test]
    async fn test_project_dependents_counts_casting_calls() {
        let (store, _tenants, studio_id, _profile_id) = setup().await;

        let project = store.create_project(&studio_id, "Pilot").await.unwrap();
        assert!(store.project_dependents(&project.id).await.unwrap().is_clear());

        store
            .create_casting_call(&studio_id, Some(&project.id), None, "Lead")
            .await
            .unwrap();
        store
            .create_casting_call(&studio_id, Some(&project.id), None, "Extra")
            .await
            .unwrap();

        let report = store.project_dependents(&project.id).await.unwrap();
        assert_eq!(report.count_of("casting_calls"), Some(2));
    }

    #[tokio::test]
    async fn test_delete_referenced_project_reports_still_referenced() {
        let (store, _tenants, studio_id, _profile_id) = setup().await;

        let project = store.create_project(&studio_id, "Pilot").await.unwrap();
        store
            .create_casting_call(&studio_id, Some(&project.id), None, "Lead")
            .await
            .unwrap();

        let result = store.delete_project(&project.id).await;
        assert!(matches!(
            result,
            Err(InternalError::Database(DatabaseError::StillReferenced { .. }))
        ));
    }

    #[tokio::test]
    async fn test_has_applied_to_studio() {
        let (store, tenants, studio_id, profile_id) = setup().await;
        let other_studio = tenants
            .provision_studio(&user(&store.db, "rival").await, "Rival", None)
            .await
            .unwrap()
            .value;

        let call = store.create_casting_call(&studio_id, None, None, "Lead").await.unwrap();
        store.create_application(&call.id, &profile_id).await.unwrap();

        assert!(store.has_applied_to_studio(&profile_id, &studio_id).await.unwrap());
        assert!(!store.has_applied_to_studio(&profile_id, &other_studio.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_casting_call_removes_its_applications() {
        let (store, _tenants, studio_id, profile_id) = setup().await;

        let call = store.create_casting_call(&studio_id, None, None, "Lead").await.unwrap();
        let application = store.create_application(&call.id, &profile_id).await.unwrap();

        assert!(store.delete_casting_call(&call.id).await.unwrap());
        assert!(store.find_application(&application.id).await.unwrap().is_none());
        assert!(!store.delete_casting_call(&call.id).await.unwrap());
    }
}
