use crate::types::db::{profile, studio};
use crate::types::internal::identity::{Identity, TenantKind};

/// Concrete domain entity an identity acts through
#[derive(Debug, Clone, PartialEq)]
pub enum TenantResolution {
    Studio { tenant_id: String, studio_id: String },
    Talent { tenant_id: Option<String>, profile_id: String },
    /// No studio or profile yet. `kind` is the tenant kind if a tenant is already linked.
    Uninitialized { kind: Option<TenantKind> },
}

impl TenantResolution {
    pub fn kind(&self) -> Option<TenantKind> {
        match self {
            Self::Studio { .. } => Some(TenantKind::Studio),
            Self::Talent { .. } => Some(TenantKind::Talent),
            Self::Uninitialized { kind } => *kind,
        }
    }

    pub fn studio_id(&self) -> Option<&str> {
        match self {
            Self::Studio { studio_id, .. } => Some(studio_id),
            _ => None,
        }
    }

    pub fn profile_id(&self) -> Option<&str> {
        match self {
            Self::Talent { profile_id, .. } => Some(profile_id),
            _ => None,
        }
    }
}

/// Identity plus its tenant, both read from the store for the current request
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub identity: Identity,
    pub tenant: TenantResolution,
}

/// Lazy provisioning result. `created` is false when the row already existed.
#[derive(Debug, Clone, PartialEq)]
pub struct Provisioned<T> {
    pub value: T,
    pub created: bool,
}

pub type ProvisionedProfile = Provisioned<profile::Model>;
pub type ProvisionedStudio = Provisioned<studio::Model>;
