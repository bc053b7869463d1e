use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;
use crate::errors::internal::database::{is_foreign_key_violation, is_unique_violation};
use crate::types::db::{casting_call, location, profile, region, studio};
use crate::types::internal::access::DependencyReport;

/// Reference data: regions and their locations
pub struct RegionStore {
    db: DatabaseConnection,
}

impl RegionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_regions(&self) -> Result<Vec<region::Model>, InternalError> {
        region::Entity::find()
            .order_by_asc(region::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_regions", e))
    }

    pub async fn find_region(&self, id: &str) -> Result<Option<region::Model>, InternalError> {
        region::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_region", e))
    }

    /// # Errors
    /// `DatabaseError::Duplicate` when the name is taken
    pub async fn create_region(&self, name: &str) -> Result<region::Model, InternalError> {
        region::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::Database(DatabaseError::Duplicate {
                    entity: "region".to_string(),
                    value: name.to_string(),
                })
            } else {
                InternalError::database("create_region", e)
            }
        })
    }

    pub async fn create_location(&self, region_id: &str, name: &str) -> Result<location::Model, InternalError> {
        location::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            region_id: Set(region_id.to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_location", e))
    }

    /// Exact count of every row type that references the region
    pub async fn dependency_report(&self, region_id: &str) -> Result<DependencyReport, InternalError> {
        let locations = location::Entity::find()
            .filter(location::Column::RegionId.eq(region_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_region_locations", e))?;

        let casting_calls = casting_call::Entity::find()
            .filter(casting_call::Column::RegionId.eq(region_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_region_casting_calls", e))?;

        let profiles = profile::Entity::find()
            .filter(profile::Column::RegionId.eq(region_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_region_profiles", e))?;

        let studios = studio::Entity::find()
            .filter(studio::Column::RegionId.eq(region_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_region_studios", e))?;

        Ok(DependencyReport::new("region", region_id)
            .with("locations", locations)
            .with("casting_calls", casting_calls)
            .with("profiles", profiles)
            .with("studios", studios))
    }

    /// Returns false when no such region existed
    ///
    /// # Errors
    /// `DatabaseError::StillReferenced` when a dependent row appeared after the last count
    pub async fn delete_region(&self, id: &str) -> Result<bool, InternalError> {
        let result = region::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    InternalError::Database(DatabaseError::StillReferenced {
                        entity: "region".to_string(),
                        id: id.to_string(),
                    })
                } else {
                    InternalError::database("delete_region", e)
                }
            })?;
        Ok(result.rows_affected > 0)
    }
}
