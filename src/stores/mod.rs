// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod casting_store;
pub mod credential_store;
pub mod region_store;
pub mod session_store;
pub mod tenant_store;

pub use audit_store::AuditStore;
pub use casting_store::CastingStore;
pub use credential_store::CredentialStore;
pub use region_store::RegionStore;
pub use session_store::SessionStore;
pub use tenant_store::TenantStore;
