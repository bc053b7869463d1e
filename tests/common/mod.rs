#![allow(dead_code)]

use std::sync::Arc;

use castgate_backend::api::{AdminApi, AuthApi, CastingApi, HealthApi, TenantApi};
use castgate_backend::app_data::AppData;
use castgate_backend::config::{GateSettings, SecretManager};
use castgate_backend::middleware::RouteGuard;
use castgate_backend::types::db::user;
use castgate_backend::types::internal::identity::{Identity, Role};
use migration::{Migrator, MigratorTrait};
use poem::middleware::CookieJarManager;
use poem::test::TestClient;
use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use sea_orm::Database;

pub const TEST_AUTH_SECRET: &str = "integration-auth-secret-at-least-32-chars";
pub const TEST_PEPPER: &str = "integration-pepper-16";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Insecure cookies so the plain cookie name is used over http
pub fn test_settings() -> GateSettings {
    GateSettings::default().with_cookie_secure(false)
}

/// Fresh in-memory database with migrations applied, wired into AppData
pub async fn setup_app_data(settings: GateSettings) -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let secrets = SecretManager::from_values(TEST_AUTH_SECRET, TEST_PEPPER).expect("Invalid test secrets");
    Arc::new(AppData::from_parts(db, Arc::new(secrets), settings).expect("Failed to wire AppData"))
}

/// The full routed application, as the binary serves it
pub fn build_app(app_data: Arc<AppData>) -> impl Endpoint {
    let api_service = OpenApiService::new(
        (
            HealthApi::new(app_data.clone()),
            AuthApi::new(app_data.clone()),
            TenantApi::new(app_data.clone()),
            CastingApi::new(app_data.clone()),
            AdminApi::new(app_data.clone()),
        ),
        "castgate API",
        "test",
    );

    Route::new()
        .nest("/api", api_service)
        .with(RouteGuard::from_app_data(&app_data))
        .with(CookieJarManager::new())
}

pub async fn setup_client() -> (Arc<AppData>, TestClient<impl Endpoint>) {
    let app_data = setup_app_data(test_settings()).await;
    let client = TestClient::new(build_app(app_data.clone()));
    (app_data, client)
}

pub async fn create_user(app_data: &AppData, email: &str, role: Role) -> user::Model {
    app_data
        .credential_store
        .create_identity(email, TEST_PASSWORD, role)
        .await
        .expect("Failed to create test identity")
}

/// Session token for an existing identity
pub async fn token_for(app_data: &AppData, user_id: &str) -> String {
    let row = app_data
        .credential_store
        .find_by_id(user_id)
        .await
        .expect("Lookup failed")
        .expect("Identity missing");
    let identity = Identity::from_model(&row, false).expect("Invalid identity row");

    app_data
        .token_provider
        .issue(&identity, None)
        .expect("Failed to issue token")
        .token
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Studio owner with a provisioned studio, returns (user_id, studio_id, token)
pub async fn studio_owner(app_data: &AppData, email: &str, name: &str) -> (String, String, String) {
    let user = create_user(app_data, email, Role::User).await;
    let identity = Identity::from_model(&user, false).expect("Invalid identity row");
    let studio = app_data
        .tenant_store
        .provision_studio(&identity, name, None)
        .await
        .expect("Failed to provision studio")
        .value;
    let token = token_for(app_data, &user.id).await;
    (user.id, studio.id, token)
}

/// Talent with a provisioned profile, returns (user_id, profile_id, token)
pub async fn talent(app_data: &AppData, email: &str) -> (String, String, String) {
    let user = create_user(app_data, email, Role::User).await;
    let identity = Identity::from_model(&user, false).expect("Invalid identity row");
    let profile = app_data
        .tenant_store
        .provision_profile(&identity)
        .await
        .expect("Failed to provision profile")
        .value;
    let token = token_for(app_data, &user.id).await;
    (user.id, profile.id, token)
}

/// Give an existing identity a new role and a session that carries it
pub async fn promote(app_data: &AppData, user_id: &str, role: Role) -> String {
    app_data
        .credential_store
        .update_role(user_id, role)
        .await
        .expect("Failed to change role");
    token_for(app_data, user_id).await
}
