// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate.

pub mod access_policy;
pub mod authorization_provider;
pub mod crypto_provider;
pub mod tenant_provider;
pub mod token_provider;

pub use authorization_provider::AuthorizationProvider;
pub use crypto_provider::CryptoProvider;
pub use tenant_provider::TenantProvider;
pub use token_provider::{SessionReader, TokenProvider};
