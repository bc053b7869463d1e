use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::audit::AuditLogger;
use crate::config::{GateSettings, SecretManager};
use crate::errors::InternalError;
use crate::providers::{AuthorizationProvider, TenantProvider, TokenProvider};
use crate::stores::{AuditStore, CastingStore, CredentialStore, RegionStore, SessionStore, TenantStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once at startup and shared across coordinators,
/// the route guard and the CLI.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ├─ stores (one DatabaseConnection pool shared by all)
///   ├─ audit_logger
///   ├─ token_provider      (also the route guard's SessionReader)
///   ├─ tenant_provider
///   └─ authorization_provider
///   ↓ wrapped in Arc<AppData>
///   ├─ SessionCoordinator / TenantCoordinator / CastingCoordinator / AdminCoordinator
///   └─ RouteGuard
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<GateSettings>,
    pub secret_manager: Arc<SecretManager>,
    pub audit_store: Arc<AuditStore>,
    pub credential_store: Arc<CredentialStore>,
    pub tenant_store: Arc<TenantStore>,
    pub casting_store: Arc<CastingStore>,
    pub region_store: Arc<RegionStore>,
    pub session_store: Arc<SessionStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub token_provider: Arc<TokenProvider>,
    pub tenant_provider: Arc<TenantProvider>,
    pub authorization_provider: Arc<AuthorizationProvider>,
}

impl AppData {
    /// Initialize all application data from the process environment
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub async fn init(db: DatabaseConnection, settings: GateSettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = SecretManager::init()
            .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?;
        tracing::debug!("Secret manager initialized");

        let app_data = Self::from_parts(db, Arc::new(secret_manager), settings)?;

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Wire stores and providers around an existing connection and secrets
    pub fn from_parts(
        db: DatabaseConnection,
        secret_manager: Arc<SecretManager>,
        settings: GateSettings,
    ) -> Result<Self, InternalError> {
        let settings = Arc::new(settings);

        // Audit store first, everything else logs through it
        let audit_store = Arc::new(AuditStore::new(db.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));

        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            secret_manager.password_pepper().to_string(),
        )?);
        let tenant_store = Arc::new(TenantStore::new(db.clone()));
        let casting_store = Arc::new(CastingStore::new(db.clone()));
        let region_store = Arc::new(RegionStore::new(db.clone()));
        let session_store = Arc::new(SessionStore::new(db.clone()));

        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            session_store.clone(),
            settings.session_max_age,
        ));
        let tenant_provider = Arc::new(TenantProvider::new(
            credential_store.clone(),
            tenant_store.clone(),
            audit_logger.clone(),
            settings.tenant_lookup_timeout,
        ));
        let authorization_provider = Arc::new(AuthorizationProvider::new(
            tenant_provider.clone(),
            casting_store.clone(),
            tenant_store.clone(),
            audit_logger.clone(),
        ));

        Ok(Self {
            db,
            settings,
            secret_manager,
            audit_store,
            credential_store,
            tenant_store,
            casting_store,
            region_store,
            session_store,
            audit_logger,
            token_provider,
            tenant_provider,
            authorization_provider,
        })
    }
}
