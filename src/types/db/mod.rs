// Database entities - SeaORM models
pub mod application;
pub mod audit_event;
pub mod casting_call;
pub mod external_actor;
pub mod location;
pub mod profile;
pub mod profile_location;
pub mod profile_skill;
pub mod project;
pub mod region;
pub mod session_revocation;
pub mod studio;
pub mod tenant;
pub mod user;
