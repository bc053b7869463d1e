use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::errors::{AccessError, InternalError};
use crate::providers::access_policy;
use crate::providers::TenantProvider;
use crate::stores::{CastingStore, TenantStore};
use crate::types::db::{application, casting_call, external_actor, profile, project};
use crate::types::internal::access::{AccessMode, Denial, DependencyReport};
use crate::types::internal::context::RequestContext;
use crate::types::internal::identity::{ADMIN_ROLES, SUPER_ADMIN_ROLES};
use crate::types::internal::tenant::Actor;

/// Authorization predicates for every protected resource
///
/// Each predicate resolves the actor fresh from the store, loads the resource and
/// returns it only when access is allowed. Denials are logged and audited.
pub struct AuthorizationProvider {
    tenant_provider: Arc<TenantProvider>,
    casting_store: Arc<CastingStore>,
    tenant_store: Arc<TenantStore>,
    audit_logger: Arc<AuditLogger>,
}

impl AuthorizationProvider {
    pub fn new(
        tenant_provider: Arc<TenantProvider>,
        casting_store: Arc<CastingStore>,
        tenant_store: Arc<TenantStore>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            tenant_provider,
            casting_store,
            tenant_store,
            audit_logger,
        }
    }

    /// Identity and tenant behind the request, re-read from the store
    pub async fn require_authenticated(&self, ctx: &RequestContext) -> Result<Actor, AccessError> {
        let Some(claims) = ctx.claims.as_ref() else {
            return Err(AccessError::unauthenticated());
        };

        let identity = self
            .tenant_provider
            .resolve_identity(ctx, claims)
            .await?
            .ok_or_else(AccessError::unauthenticated)?;

        let tenant = self.tenant_provider.resolve_tenant(&identity).await?;

        Ok(Actor { identity, tenant })
    }

    pub async fn require_admin(&self, ctx: &RequestContext) -> Result<Actor, AccessError> {
        let actor = self.require_authenticated(ctx).await?;
        if !actor.identity.role.is_in(ADMIN_ROLES) {
            return Err(self.deny(ctx, &actor, "require_admin", "-", AccessMode::Mutate, Denial::Forbidden).await);
        }
        Ok(actor)
    }

    pub async fn require_super_admin(&self, ctx: &RequestContext) -> Result<Actor, AccessError> {
        let actor = self.require_authenticated(ctx).await?;
        if !actor.identity.role.is_in(SUPER_ADMIN_ROLES) {
            return Err(
                self.deny(ctx, &actor, "require_super_admin", "-", AccessMode::Mutate, Denial::Forbidden)
                    .await,
            );
        }
        Ok(actor)
    }

    async fn deny(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        predicate: &str,
        resource_id: &str,
        mode: AccessMode,
        denial: Denial,
    ) -> AccessError {
        tracing::info!(
            "Access denied: identity={} resource={} predicate={} mode={} denial={}",
            actor.identity.id,
            resource_id,
            predicate,
            mode,
            denial.as_str()
        );

        if let Err(audit_err) = self
            .audit_logger
            .log_access_denied(ctx, predicate, resource_id, mode, &denial)
            .await
        {
            tracing::error!("Failed to log access denial: {:?}", audit_err);
        }

        AccessError::from_denial(denial)
    }

    async fn decide<T>(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        predicate: &str,
        resource_id: &str,
        mode: AccessMode,
        verdict: Result<(), Denial>,
        resource: T,
    ) -> Result<T, AccessError> {
        match verdict {
            Ok(()) => Ok(resource),
            Err(denial) => Err(self.deny(ctx, actor, predicate, resource_id, mode, denial).await),
        }
    }

    fn found<T>(resource: Option<T>, predicate: &str, id: &str) -> Result<T, AccessError> {
        resource.ok_or_else(|| {
            tracing::debug!("{}: resource {} does not exist", predicate, id);
            AccessError::not_found()
        })
    }

    pub async fn can_access_project(
        &self,
        ctx: &RequestContext,
        id: &str,
        mode: AccessMode,
    ) -> Result<project::Model, AccessError> {
        const PREDICATE: &str = "can_access_project";
        let actor = self.require_authenticated(ctx).await?;
        let row = Self::found(self.casting_store.find_project(id).await?, PREDICATE, id)?;

        let verdict = access_policy::project(&actor.tenant, &row, mode);
        self.decide(ctx, &actor, PREDICATE, id, mode, verdict, row).await
    }

    pub async fn can_access_casting_call(
        &self,
        ctx: &RequestContext,
        id: &str,
        mode: AccessMode,
    ) -> Result<casting_call::Model, AccessError> {
        const PREDICATE: &str = "can_access_casting_call";
        let actor = self.require_authenticated(ctx).await?;
        let row = Self::found(self.casting_store.find_casting_call(id).await?, PREDICATE, id)?;

        let verdict = access_policy::casting_call(&actor.tenant, &row, mode);
        self.decide(ctx, &actor, PREDICATE, id, mode, verdict, row).await
    }

    pub async fn can_access_application(
        &self,
        ctx: &RequestContext,
        id: &str,
        mode: AccessMode,
    ) -> Result<application::Model, AccessError> {
        const PREDICATE: &str = "can_access_application";
        let actor = self.require_authenticated(ctx).await?;
        let row = Self::found(self.casting_store.find_application(id).await?, PREDICATE, id)?;

        // The cascade keeps this present while the application exists
        let call = self
            .casting_store
            .find_casting_call(&row.casting_call_id)
            .await?
            .ok_or_else(|| InternalError::parse("application", format!("casting call {} missing", row.casting_call_id)))?;

        let verdict = access_policy::application(&actor.tenant, &row, &call.studio_id, mode);
        self.decide(ctx, &actor, PREDICATE, id, mode, verdict, row).await
    }

    pub async fn can_access_external_actor(
        &self,
        ctx: &RequestContext,
        id: &str,
        mode: AccessMode,
    ) -> Result<external_actor::Model, AccessError> {
        const PREDICATE: &str = "can_access_external_actor";
        let actor = self.require_authenticated(ctx).await?;
        let row = Self::found(self.casting_store.find_external_actor(id).await?, PREDICATE, id)?;

        let verdict = access_policy::external_actor(&actor.tenant, &row, mode);
        self.decide(ctx, &actor, PREDICATE, id, mode, verdict, row).await
    }

    pub async fn can_access_profile(
        &self,
        ctx: &RequestContext,
        id: &str,
        mode: AccessMode,
    ) -> Result<profile::Model, AccessError> {
        const PREDICATE: &str = "can_access_profile";
        let actor = self.require_authenticated(ctx).await?;
        let row = Self::found(self.tenant_store.find_profile(id).await?, PREDICATE, id)?;

        let applied = match (mode, actor.tenant.studio_id()) {
            (AccessMode::Read, Some(studio_id)) => {
                self.casting_store.has_applied_to_studio(&row.id, studio_id).await?
            }
            _ => false,
        };

        let verdict = access_policy::profile(&actor.tenant, &row, mode, applied);
        self.decide(ctx, &actor, PREDICATE, id, mode, verdict, row).await
    }

    /// Refuse a delete while anything still references the entity
    ///
    /// # Errors
    /// `AccessError::DependencyConflict` carrying the itemized counts
    pub async fn ensure_no_dependents(
        &self,
        ctx: &RequestContext,
        report: DependencyReport,
    ) -> Result<(), AccessError> {
        if report.is_clear() {
            return Ok(());
        }

        tracing::info!(
            "Delete of {} {} blocked by {} dependent record(s)",
            report.entity,
            report.id,
            report.total()
        );
        if let Err(audit_err) = self.audit_logger.log_deletion_blocked(ctx, &report).await {
            tracing::error!("Failed to log blocked deletion: {:?}", audit_err);
        }

        Err(AccessError::dependency_conflict(report))
    }
}
