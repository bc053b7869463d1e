// Coordinators layer - Workflow orchestration
//
// Coordinators handle pure workflow orchestration by composing provider operations
// for specific API endpoints. They determine the sequence of operations without
// containing business logic themselves.

pub mod admin_coordinator;
pub mod casting_coordinator;
pub mod session_coordinator;
pub mod tenant_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use casting_coordinator::CastingCoordinator;
pub use session_coordinator::SessionCoordinator;
pub use tenant_coordinator::TenantCoordinator;
