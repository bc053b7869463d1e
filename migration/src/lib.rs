pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_identity_tables;
mod m20250301_000002_create_casting_tables;
mod m20250301_000003_create_session_revocations;
mod m20250301_000004_create_audit_events;

/// Single migrator for the one application database
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_identity_tables::Migration),
            Box::new(m20250301_000002_create_casting_tables::Migration),
            Box::new(m20250301_000003_create_session_revocations::Migration),
            Box::new(m20250301_000004_create_audit_events::Migration),
        ]
    }
}
