use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::{DatabaseError, TenantError, database::is_unique_violation};
use crate::types::db::{profile, profile_location, profile_skill, studio, tenant, user};
use crate::types::internal::identity::{Identity, TenantKind};
use crate::types::internal::tenant::{Provisioned, ProvisionedProfile, ProvisionedStudio, TenantResolution};

/// Tenants, studios and talent profiles
///
/// Provisioning is idempotent through unique constraints (`profiles.user_id`,
/// `studios.tenant_id`) and a conditional update on `users.tenant_id`.
pub struct TenantStore {
    db: DatabaseConnection,
}

impl TenantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_tenant(&self, tenant_id: &str) -> Result<Option<tenant::Model>, InternalError> {
        tenant::Entity::find_by_id(tenant_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_tenant", e))
    }

    pub async fn find_studio(&self, studio_id: &str) -> Result<Option<studio::Model>, InternalError> {
        studio::Entity::find_by_id(studio_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_studio", e))
    }

    pub async fn find_studio_by_tenant(&self, tenant_id: &str) -> Result<Option<studio::Model>, InternalError> {
        studio::Entity::find()
            .filter(studio::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_studio_by_tenant", e))
    }

    pub async fn find_profile(&self, profile_id: &str) -> Result<Option<profile::Model>, InternalError> {
        profile::Entity::find_by_id(profile_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_profile", e))
    }

    pub async fn find_profile_by_user(&self, user_id: &str) -> Result<Option<profile::Model>, InternalError> {
        profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_profile_by_user", e))
    }

    pub async fn profile_skills(&self, profile_id: &str) -> Result<Vec<String>, InternalError> {
        let rows = profile_skill::Entity::find()
            .filter(profile_skill::Column::ProfileId.eq(profile_id))
            .order_by_asc(profile_skill::Column::Skill)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("profile_skills", e))?;
        Ok(rows.into_iter().map(|r| r.skill).collect())
    }

    pub async fn profile_location_ids(&self, profile_id: &str) -> Result<Vec<String>, InternalError> {
        let rows = profile_location::Entity::find()
            .filter(profile_location::Column::ProfileId.eq(profile_id))
            .order_by_asc(profile_location::Column::LocationId)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("profile_locations", e))?;
        Ok(rows.into_iter().map(|r| r.location_id).collect())
    }

    /// Resolve the entity an identity acts through, from the rows as they are now
    pub async fn resolve(&self, identity: &Identity) -> Result<TenantResolution, InternalError> {
        let Some(tenant_id) = identity.tenant_id.as_deref() else {
            // Profiles created before tenants existed
            let profile = self.find_profile_by_user(&identity.id).await?;
            return Ok(match profile {
                Some(profile) => TenantResolution::Talent {
                    tenant_id: None,
                    profile_id: profile.id,
                },
                None => TenantResolution::Uninitialized { kind: None },
            });
        };

        let tenant = self
            .find_tenant(tenant_id)
            .await?
            .ok_or_else(|| TenantError::DanglingTenant {
                tenant_id: tenant_id.to_string(),
            })?;

        match TenantKind::parse(&tenant.kind)? {
            TenantKind::Studio => Ok(match self.find_studio_by_tenant(&tenant.id).await? {
                Some(studio) => TenantResolution::Studio {
                    tenant_id: tenant.id,
                    studio_id: studio.id,
                },
                None => TenantResolution::Uninitialized {
                    kind: Some(TenantKind::Studio),
                },
            }),
            TenantKind::Talent => Ok(match self.find_profile_by_user(&identity.id).await? {
                Some(profile) => TenantResolution::Talent {
                    tenant_id: Some(tenant.id),
                    profile_id: profile.id,
                },
                None => TenantResolution::Uninitialized {
                    kind: Some(TenantKind::Talent),
                },
            }),
        }
    }

    /// Make sure `user_id` is linked to a tenant of `kind`, creating one if needed
    ///
    /// Runs inside the caller's transaction. The link is a conditional update on
    /// `tenant_id IS NULL`, so when two callers race only one link sticks and the
    /// other adopts the winner's tenant.
    async fn ensure_tenant(
        txn: &DatabaseTransaction,
        user_id: &str,
        kind: TenantKind,
        name: &str,
    ) -> Result<Provisioned<tenant::Model>, InternalError> {
        if let Some(existing) = Self::linked_tenant(txn, user_id).await? {
            Self::check_kind(&existing, kind)?;
            return Ok(Provisioned {
                value: existing,
                created: false,
            });
        }

        let candidate = tenant::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            kind: Set(kind.as_str().to_string()),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(txn)
        .await
        .map_err(|e| InternalError::database("insert_tenant", e))?;

        let linked = user::Entity::update_many()
            .col_expr(user::Column::TenantId, Expr::value(candidate.id.clone()))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::TenantId.is_null())
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("link_tenant", e))?;

        if linked.rows_affected == 1 {
            return Ok(Provisioned {
                value: candidate,
                created: true,
            });
        }

        // Lost the race, or the identity is gone
        tenant::Entity::delete_by_id(candidate.id.clone())
            .exec(txn)
            .await
            .map_err(|e| InternalError::database("discard_tenant", e))?;

        let winner = Self::linked_tenant(txn, user_id)
            .await?
            .ok_or_else(|| TenantError::ConflictUnresolved {
                resource: "tenant".to_string(),
                owner_id: user_id.to_string(),
            })?;
        Self::check_kind(&winner, kind)?;

        Ok(Provisioned {
            value: winner,
            created: false,
        })
    }

    async fn linked_tenant(
        txn: &DatabaseTransaction,
        user_id: &str,
    ) -> Result<Option<tenant::Model>, InternalError> {
        let user = user::Entity::find_by_id(user_id.to_string())
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_user_tenant", e))?;

        let Some(tenant_id) = user.and_then(|u| u.tenant_id) else {
            return Ok(None);
        };

        let tenant = tenant::Entity::find_by_id(tenant_id.clone())
            .one(txn)
            .await
            .map_err(|e| InternalError::database("find_tenant", e))?
            .ok_or(TenantError::DanglingTenant { tenant_id })?;

        Ok(Some(tenant))
    }

    fn check_kind(tenant: &tenant::Model, expected: TenantKind) -> Result<(), InternalError> {
        let actual = TenantKind::parse(&tenant.kind)?;
        if actual != expected {
            return Err(TenantError::KindMismatch { expected, actual }.into());
        }
        Ok(())
    }

    async fn begin(&self) -> Result<DatabaseTransaction, InternalError> {
        self.db
            .begin()
            .await
            .map_err(|source| InternalError::Database(DatabaseError::TransactionBegin { source }))
    }

    async fn commit(txn: DatabaseTransaction) -> Result<(), InternalError> {
        txn.commit()
            .await
            .map_err(|source| InternalError::Database(DatabaseError::TransactionCommit { source }))
    }

    /// Create the talent profile for `identity` if it has none
    ///
    /// New profiles are available and carry no skills or locations. Calling again
    /// returns the existing row with `created: false`.
    pub async fn provision_profile(&self, identity: &Identity) -> Result<ProvisionedProfile, InternalError> {
        let txn = self.begin().await?;

        Self::ensure_tenant(&txn, &identity.id, TenantKind::Talent, &identity.email).await?;

        let existing = profile::Entity::find()
            .filter(profile::Column::UserId.eq(identity.id.as_str()))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_profile_by_user", e))?;

        if let Some(existing) = existing {
            Self::commit(txn).await?;
            return Ok(Provisioned {
                value: existing,
                created: false,
            });
        }

        let now = Utc::now().timestamp();
        let inserted = profile::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(identity.id.clone()),
            display_name: Set(None),
            bio: Set(None),
            availability: Set(true),
            region_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(profile) => {
                Self::commit(txn).await?;
                Ok(Provisioned {
                    value: profile,
                    created: true,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                txn.rollback()
                    .await
                    .map_err(|e| InternalError::database("rollback_provisioning", e))?;
                let winner = self
                    .find_profile_by_user(&identity.id)
                    .await?
                    .ok_or_else(|| TenantError::ConflictUnresolved {
                        resource: "profile".to_string(),
                        owner_id: identity.id.clone(),
                    })?;
                Ok(Provisioned {
                    value: winner,
                    created: false,
                })
            }
            Err(e) => Err(InternalError::database("insert_profile", e)),
        }
    }

    /// Create the studio for `identity` if its tenant has none
    pub async fn provision_studio(
        &self,
        identity: &Identity,
        name: &str,
        region_id: Option<String>,
    ) -> Result<ProvisionedStudio, InternalError> {
        let txn = self.begin().await?;

        let tenant = Self::ensure_tenant(&txn, &identity.id, TenantKind::Studio, name).await?.value;

        let existing = studio::Entity::find()
            .filter(studio::Column::TenantId.eq(tenant.id.as_str()))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_studio_by_tenant", e))?;

        if let Some(existing) = existing {
            Self::commit(txn).await?;
            return Ok(Provisioned {
                value: existing,
                created: false,
            });
        }

        let inserted = studio::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            contact_email: Set(Some(identity.email.clone())),
            contact_phone: Set(None),
            tenant_id: Set(tenant.id.clone()),
            region_id: Set(region_id),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(studio) => {
                Self::commit(txn).await?;
                Ok(Provisioned {
                    value: studio,
                    created: true,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                txn.rollback()
                    .await
                    .map_err(|e| InternalError::database("rollback_provisioning", e))?;
                let winner = self
                    .find_studio_by_tenant(&tenant.id)
                    .await?
                    .ok_or_else(|| TenantError::ConflictUnresolved {
                        resource: "studio".to_string(),
                        owner_id: tenant.id.clone(),
                    })?;
                Ok(Provisioned {
                    value: winner,
                    created: false,
                })
            }
            Err(e) => Err(InternalError::database("insert_studio", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::CredentialStore;
    use crate::types::internal::identity::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, PaginatorTrait};

    async fn setup() -> (DatabaseConnection, TenantStore, Identity) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let credentials = CredentialStore::new(db.clone(), "test-pepper-for-unit-tests".to_string()).unwrap();
        let user = credentials
            .create_identity("talent@example.com", "password-1", Role::User)
            .await
            .unwrap();
        let identity = Identity::from_model(&user, false).unwrap();

        (db.clone(), TenantStore::new(db), identity)
    }

    async fn reload(db: &DatabaseConnection, identity: &Identity) -> Identity {
        let row = user::Entity::find_by_id(identity.id.clone()).one(db).await.unwrap().unwrap();
        Identity::from_model(&row, false).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_without_tenant_is_uninitialized() {
        let (_db, store, identity) = setup().await;

        let resolution = store.resolve(&identity).await.unwrap();

        assert_eq!(resolution, TenantResolution::Uninitialized { kind: None });
    }

    #[tokio::test]
    async fn test_provision_profile_creates_available_profile_once() {
        let (db, store, identity) = setup().await;

        let first = store.provision_profile(&identity).await.unwrap();
        assert!(first.created);
        assert!(first.value.availability);
        assert!(store.profile_skills(&first.value.id).await.unwrap().is_empty());
        assert!(store.profile_location_ids(&first.value.id).await.unwrap().is_empty());

        let second = store.provision_profile(&identity).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.value.id, first.value.id);

        let profiles = profile::Entity::find().count(&db).await.unwrap();
        assert_eq!(profiles, 1);
        let tenants = tenant::Entity::find().count(&db).await.unwrap();
        assert_eq!(tenants, 1);

        let identity = reload(&db, &identity).await;
        let resolution = store.resolve(&identity).await.unwrap();
        assert_eq!(resolution.profile_id(), Some(first.value.id.as_str()));
        assert_eq!(resolution.kind(), Some(TenantKind::Talent));
    }

    #[tokio::test]
    async fn test_provision_studio_refused_for_talent_tenant() {
        let (db, store, identity) = setup().await;

        store.provision_profile(&identity).await.unwrap();
        let identity = reload(&db, &identity).await;

        let result = store.provision_studio(&identity, "Blue Door Pictures", None).await;

        assert!(matches!(
            result,
            Err(InternalError::Tenant(TenantError::KindMismatch {
                expected: TenantKind::Studio,
                actual: TenantKind::Talent
            }))
        ));
        let studios = studio::Entity::find().count(&db).await.unwrap();
        assert_eq!(studios, 0);
    }

    #[tokio::test]
    async fn test_provision_studio_is_idempotent() {
        let (db, store, identity) = setup().await;

        let first = store.provision_studio(&identity, "Blue Door Pictures", None).await.unwrap();
        let second = store.provision_studio(&identity, "Renamed", None).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.value.id, second.value.id);
        assert_eq!(second.value.name, "Blue Door Pictures");

        let identity = reload(&db, &identity).await;
        let resolution = store.resolve(&identity).await.unwrap();
        assert_eq!(resolution.studio_id(), Some(first.value.id.as_str()));
    }

    #[tokio::test]
    async fn test_dangling_tenant_reference_is_an_error() {
        let (_db, store, mut identity) = setup().await;
        identity.tenant_id = Some("missing-tenant".to_string());

        let result = store.resolve(&identity).await;

        assert!(matches!(
            result,
            Err(InternalError::Tenant(TenantError::DanglingTenant { .. }))
        ));
    }
}
