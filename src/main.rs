use std::sync::Arc;

use clap::Parser;
use poem::middleware::CookieJarManager;
use poem::{EndpointExt, Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;

use castgate_backend::api::{AdminApi, AuthApi, CastingApi, HealthApi, TenantApi};
use castgate_backend::app_data::AppData;
use castgate_backend::cli::{Cli, Commands, execute_command, migrate};
use castgate_backend::config::{BootstrapSettings, GateSettings, init_database, init_logging, migrate_database};
use castgate_backend::middleware::RouteGuard;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let command = cli.command();

    let bootstrap_settings = BootstrapSettings::from_env()?;
    tracing::debug!("Bootstrap settings: {:?}", bootstrap_settings);

    if command == Commands::Migrate {
        return migrate::run_migrations(&bootstrap_settings).await;
    }

    let gate_settings = GateSettings::from_env()?;

    let db = init_database(&bootstrap_settings).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, gate_settings).await?);

    if command != Commands::Serve {
        return execute_command(command, &app_data).await;
    }

    let purged = app_data.session_store.purge_expired(chrono::Utc::now().timestamp()).await?;
    tracing::info!("Purged {} expired session revocations", purged);

    let server_url = format!("http://localhost:{}/api", bootstrap_settings.server_port());

    let api_service = OpenApiService::new(
        (
            HealthApi::new(app_data.clone()),
            AuthApi::new(app_data.clone()),
            TenantApi::new(app_data.clone()),
            CastingApi::new(app_data.clone()),
            AdminApi::new(app_data.clone()),
        ),
        "castgate API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();

    // Every route sits behind the guard; public paths are exempted inside it.
    // The cookie jar wraps the guard so the session cookie is parsed before the check.
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(RouteGuard::from_app_data(&app_data))
        .with(CookieJarManager::new());

    let address = bootstrap_settings.server_address();
    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
