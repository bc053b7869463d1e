// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod casting;
pub mod health;
pub mod helpers;
pub mod tenant;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use casting::CastingApi;
pub use health::HealthApi;
pub use tenant::TenantApi;
