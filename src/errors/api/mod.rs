// API-facing error types
pub mod access;
pub mod auth;

pub use access::AccessError;
pub use auth::AuthError;
