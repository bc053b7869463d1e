pub mod access;
pub mod audit;
pub mod auth;
pub mod context;
pub mod identity;
pub mod tenant;

pub use auth::Claims;
pub use identity::{ADMIN_ROLES, Role, SUPER_ADMIN_ROLES, TenantKind};
