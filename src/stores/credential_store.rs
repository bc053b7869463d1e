use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, database::is_unique_violation};
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::identity::{Role, VerifiedIdentity};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_EMAIL_LENGTH: usize = 254;

/// Hashed when the store is built so unknown emails cost the same as known ones
const DUMMY_PASSWORD: &str = "castgate-dummy-password-for-timing";

/// CredentialStore manages identities and their password hashes
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
    dummy_hash: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    ///
    /// Pays one Argon2 hash up front for the dummy used on unknown emails, so the
    /// first failed sign-in is not slower than the rest.
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - The secret key used for password hashing (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Result<Self, InternalError> {
        let mut store = Self {
            db,
            password_pepper,
            dummy_hash: String::new(),
        };
        store.dummy_hash = store.hash_password(DUMMY_PASSWORD)?;
        Ok(store)
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Create a new identity with an Argon2id password hash
    ///
    /// # Errors
    /// * `CredentialError::MalformedEmail` - email failed format validation
    /// * `CredentialError::PasswordTooShort` - password under `MIN_PASSWORD_LENGTH`
    /// * `CredentialError::DuplicateEmail` - an identity already uses this email
    pub async fn create_identity(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let email = normalize_email(email)?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooShort {
                min_length: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let password_hash = self.hash_password(password)?;
        let now = Utc::now().timestamp();

        let new_user = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.clone()),
            password_hash: Set(Some(password_hash)),
            role: Set(role.as_str().to_string()),
            tenant_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                InternalError::from(CredentialError::DuplicateEmail(email.clone()))
            } else {
                InternalError::database("create_identity", e)
            }
        })
    }

    /// Verify an email and password
    ///
    /// # Returns
    /// * `Ok(Some(identity))` - credentials match
    /// * `Ok(None)` - no such email, no password set, or wrong password
    /// * `Err(CredentialError::MalformedEmail)` - email failed format validation
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<VerifiedIdentity>, InternalError> {
        let email = normalize_email(email)?;

        let user = User::find()
            .filter(user::Column::Email.eq(&email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("verify_credentials", e))?;

        let stored_hash = user.as_ref().and_then(|u| u.password_hash.clone());

        let Some(stored_hash) = stored_hash else {
            // Same Argon2 cost as a real check
            let _ = self.password_matches(&self.dummy_hash, password);
            return Ok(None);
        };

        if !self.password_matches(&stored_hash, password)? {
            return Ok(None);
        }

        match user {
            Some(user) => Ok(Some(VerifiedIdentity {
                role: Role::parse(&user.role)?,
                id: user.id,
                email: user.email,
            })),
            None => Ok(None),
        }
    }

    fn password_matches(&self, stored_hash: &str, password: &str) -> Result<bool, InternalError> {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Stored password hash is unparseable: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Look up by email, case-insensitively. Malformed input matches nothing.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        let Ok(email) = normalize_email(email) else {
            return Ok(None);
        };

        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Replace an identity's role, returning the updated row
    pub async fn update_role(&self, user_id: &str, role: Role) -> Result<user::Model, InternalError> {
        let existing = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CredentialError::IdentityNotFound {
                user_id: user_id.to_string(),
            })?;

        let mut active: ActiveModel = existing.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_role", e))
    }
}

/// Trim and lowercase an email, rejecting anything that is not `local@domain.tld`
pub fn normalize_email(email: &str) -> Result<String, CredentialError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return Err(CredentialError::MalformedEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(CredentialError::MalformedEmail);
    };

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok {
        return Err(CredentialError::MalformedEmail);
    }

    Ok(email)
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialStore {{ db: <connection>, password_pepper: <redacted> }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, CredentialStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = CredentialStore::new(db.clone(), "test-pepper-for-unit-tests".to_string()).unwrap();

        (db, credential_store)
    }

    #[tokio::test]
    async fn test_dummy_hash_is_ready_when_store_is_built() {
        let (_db, store) = setup_test_db().await;

        assert!(store.dummy_hash.starts_with("$argon2id$"));
        assert!(store.password_matches(&store.dummy_hash, DUMMY_PASSWORD).unwrap());

        // Unknown email goes through the prebuilt dummy, not a fresh hash
        let before = store.dummy_hash.clone();
        assert!(store.verify_credentials("nobody@example.com", "whatever-pass").await.unwrap().is_none());
        assert_eq!(store.dummy_hash, before);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM ").unwrap(), "jane@example.com");

        for bad in ["", "jane", "jane@", "@example.com", "jane@example", "ja ne@example.com", "a@b@c.com", "jane@.com", "jane@example..com"] {
            assert!(
                matches!(normalize_email(bad), Err(CredentialError::MalformedEmail)),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_create_identity_hashes_password_and_lowercases_email() {
        let (db, store) = setup_test_db().await;

        let created = store
            .create_identity("Casting@Studio.io", "correct-horse", Role::User)
            .await
            .unwrap();

        let row = User::find_by_id(created.id.clone()).one(&db).await.unwrap().unwrap();
        assert_eq!(row.email, "casting@studio.io");
        assert_eq!(row.role, "USER");
        let hash = row.password_hash.unwrap();
        assert_ne!(hash, "correct-horse");
        assert!(hash.starts_with("$argon2id"));
    }

    #[tokio::test]
    async fn test_create_identity_rejects_duplicate_email_case_insensitively() {
        let (_db, store) = setup_test_db().await;

        store.create_identity("dup@example.com", "password-1", Role::User).await.unwrap();
        let result = store.create_identity("DUP@example.com", "password-2", Role::User).await;

        match result {
            Err(InternalError::Credential(CredentialError::DuplicateEmail(email))) => {
                assert_eq!(email, "dup@example.com");
            }
            other => panic!("Expected DuplicateEmail, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_identity_rejects_short_password() {
        let (_db, store) = setup_test_db().await;

        let result = store.create_identity("short@example.com", "1234567", Role::User).await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::PasswordTooShort { min_length: 8 }))
        ));
    }

    #[tokio::test]
    async fn test_verify_credentials_matches_and_never_returns_hash() {
        let (_db, store) = setup_test_db().await;

        let created = store.create_identity("actor@example.com", "break-a-leg", Role::Admin).await.unwrap();

        let verified = store
            .verify_credentials("ACTOR@example.com", "break-a-leg")
            .await
            .unwrap()
            .expect("credentials should match");

        assert_eq!(verified.id, created.id);
        assert_eq!(verified.email, "actor@example.com");
        assert_eq!(verified.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_verify_credentials_wrong_password_and_unknown_email_are_no_match() {
        let (_db, store) = setup_test_db().await;

        store.create_identity("actor@example.com", "break-a-leg", Role::User).await.unwrap();

        assert!(store.verify_credentials("actor@example.com", "wrong-pass").await.unwrap().is_none());
        assert!(store.verify_credentials("nobody@example.com", "break-a-leg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_verify_credentials_malformed_email_is_distinct_from_no_match() {
        let (_db, store) = setup_test_db().await;

        let result = store.verify_credentials("not-an-email", "whatever").await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::MalformedEmail))
        ));
    }

    #[tokio::test]
    async fn test_identity_without_password_hash_never_matches() {
        let (db, store) = setup_test_db().await;

        let now = Utc::now().timestamp();
        ActiveModel {
            id: Set("oauth-user".to_string()),
            email: Set("linked@example.com".to_string()),
            password_hash: Set(None),
            role: Set("USER".to_string()),
            tenant_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        let result = store.verify_credentials("linked@example.com", "").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_role() {
        let (_db, store) = setup_test_db().await;

        let created = store.create_identity("promote@example.com", "password-1", Role::User).await.unwrap();
        let updated = store.update_role(&created.id, Role::Admin).await.unwrap();
        assert_eq!(updated.role, "ADMIN");

        let missing = store.update_role("no-such-user", Role::Admin).await;
        assert!(matches!(
            missing,
            Err(InternalError::Credential(CredentialError::IdentityNotFound { .. }))
        ));
    }
}
