use thiserror::Error;

use crate::types::internal::TenantKind;

#[derive(Error, Debug)]
pub enum TenantError {
    /// Provisioning asked for a kind the identity's tenant is not
    #[error("Tenant kind mismatch: expected {expected}, found {actual}")]
    KindMismatch {
        expected: TenantKind,
        actual: TenantKind,
    },

    /// A unique-constraint race was lost but the winning row could not be re-read
    #[error("Provisioned {resource} vanished after conflict for {owner_id}")]
    ConflictUnresolved { resource: String, owner_id: String },

    #[error("Tenant {tenant_id} referenced by identity does not exist")]
    DanglingTenant { tenant_id: String },
}
