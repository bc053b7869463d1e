// Administrator creation from the command line

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::types::internal::context::RequestContext;
use crate::types::internal::identity::Role;

/// Create an ADMIN (or SUPER_ADMIN) account with a generated password
///
/// The password is printed once and never stored in plain text.
///
/// # Returns
/// * `Ok(user_id)` - Account created
/// * `Err(...)` - Malformed or duplicate email, or a store failure
pub async fn create_admin(app_data: &AppData, email: &str, super_admin: bool) -> Result<String, InternalError> {
    let ctx = RequestContext::for_cli("create-admin");
    let role = if super_admin { Role::SuperAdmin } else { Role::Admin };

    if let Err(audit_err) = app_data
        .audit_logger
        .log_cli_session_start(&ctx, "create-admin", vec![format!("--role={}", role)])
        .await
    {
        eprintln!("Warning: Failed to log CLI session start: {:?}", audit_err);
    }

    let result = create_admin_impl(app_data, &ctx, email, role).await;

    let (success, error_message) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    if let Err(audit_err) = app_data
        .audit_logger
        .log_cli_session_end(&ctx, "create-admin", success, error_message)
        .await
    {
        eprintln!("Warning: Failed to log CLI session end: {:?}", audit_err);
    }

    result
}

async fn create_admin_impl(
    app_data: &AppData,
    ctx: &RequestContext,
    email: &str,
    role: Role,
) -> Result<String, InternalError> {
    let password = CryptoProvider::new().generate_secure_password();

    let created = app_data.credential_store.create_identity(email, &password, role).await?;

    if let Err(audit_err) = app_data
        .audit_logger
        .log_identity_created(ctx, &created.id, &created.email, role)
        .await
    {
        eprintln!("Warning: Failed to log identity creation: {:?}", audit_err);
    }

    println!("\n=== {} account created ===", role);
    println!("Email:    {}", created.email);
    println!("Password: {}", password);
    println!("\nThis password will not be shown again.\n");

    tracing::info!("{} account {} created from CLI", role, created.id);

    Ok(created.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GateSettings, SecretManager};
    use crate::types::db::audit_event;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, EntityTrait};
    use std::sync::Arc;

    async fn app_data() -> AppData {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let secrets = SecretManager::from_values("test-auth-secret-at-least-32-characters", "test-pepper-16-chars")
            .unwrap();
        AppData::from_parts(db, Arc::new(secrets), GateSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_create_admin_sets_role_and_audits() {
        let app_data = app_data().await;

        let user_id = create_admin(&app_data, "Ops@Example.com", true).await.unwrap();

        let user = app_data.credential_store.find_by_id(&user_id).await.unwrap().unwrap();
        assert_eq!(user.email, "ops@example.com");
        assert_eq!(user.role, "SUPER_ADMIN");

        let events: Vec<String> = audit_event::Entity::find()
            .all(&app_data.db)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert!(events.contains(&"cli_session_start".to_string()));
        assert!(events.contains(&"identity_created".to_string()));
        assert!(events.contains(&"cli_session_end".to_string()));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_email() {
        let app_data = app_data().await;

        create_admin(&app_data, "ops@example.com", false).await.unwrap();
        assert!(create_admin(&app_data, "ops@example.com", false).await.is_err());
    }
}
