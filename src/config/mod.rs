mod bootstrap_settings;
mod config_spec;
mod database;
mod env_provider;
mod errors;
mod gate_settings;
mod logging;
mod secret_manager;

pub use bootstrap_settings::BootstrapSettings;
pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use database::{init_database, migrate_database};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use gate_settings::{GateSettings, GuardFailurePolicy};
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use secret_manager::{SecretError, SecretManager};
