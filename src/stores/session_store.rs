use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::errors::internal::database::is_unique_violation;
use crate::types::db::session_revocation::{self, Entity as SessionRevocation};

/// Signed-out sessions
///
/// Tokens are stateless; a revocation row outlives the token it names only until
/// `expires_at`, after which the token fails on expiry anyway.
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a revocation. Revoking the same token twice is not an error.
    pub async fn revoke(&self, jti_hash: &str, user_id: &str, expires_at: i64) -> Result<(), InternalError> {
        let row = session_revocation::ActiveModel {
            jti_hash: Set(jti_hash.to_string()),
            user_id: Set(user_id.to_string()),
            expires_at: Set(expires_at),
            revoked_at: Set(Utc::now().timestamp()),
        };

        match row.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Ok(()),
            Err(e) => Err(InternalError::database("revoke_session", e)),
        }
    }

    pub async fn is_revoked(&self, jti_hash: &str) -> Result<bool, InternalError> {
        let found = SessionRevocation::find_by_id(jti_hash.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session_revocation", e))?;
        Ok(found.is_some())
    }

    /// Drop revocations whose tokens have expired
    pub async fn purge_expired(&self, now: i64) -> Result<u64, InternalError> {
        let result = SessionRevocation::delete_many()
            .filter(session_revocation::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("purge_session_revocations", e))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::CredentialStore;
    use crate::types::internal::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn test_revoke_is_idempotent_and_purge_drops_expired_rows() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let user = CredentialStore::new(db.clone(), "test-pepper-0123456789".to_string())
            .unwrap()
            .create_identity("talent@example.com", "correct-horse-battery", Role::User)
            .await
            .unwrap();
        let store = SessionStore::new(db);

        store.revoke("old", &user.id, 100).await.unwrap();
        store.revoke("old", &user.id, 100).await.unwrap();
        store.revoke("live", &user.id, 10_000).await.unwrap();

        assert_eq!(store.purge_expired(5_000).await.unwrap(), 1);
        assert!(!store.is_revoked("old").await.unwrap());
        assert!(store.is_revoked("live").await.unwrap());
    }
}
