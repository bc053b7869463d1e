use std::sync::Arc;

use serde_json::json;

use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::internal::access::{AccessMode, Denial, DependencyReport};
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;
use crate::types::internal::identity::Role;

/// Audit logging provider that handles all audit event creation and logging
///
/// The actor is always taken from the request context; the subject of the
/// action goes into the event data. Callers log write failures and carry on.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    fn event(ctx: &RequestContext, event_type: EventType) -> AuditEvent {
        let mut event = AuditEvent::new(event_type);
        event.user_id = Some(ctx.actor_id.clone());
        event.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        event.jwt_id = ctx.jwt_id();
        event.request_id = Some(ctx.request_id.to_string());
        event.data.insert("source".to_string(), json!(ctx.source.to_string()));
        event
    }

    /// Log CLI session start
    ///
    /// # Arguments
    /// * `ctx` - Request context containing CLI source and actor information
    /// * `command_name` - Name of the CLI command being executed
    /// * `args` - Command arguments (sanitized, no sensitive data)
    pub async fn log_cli_session_start(
        &self,
        ctx: &RequestContext,
        command_name: &str,
        args: Vec<String>,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::CliSessionStart);
        event.data.insert("command_name".to_string(), json!(command_name));
        event.data.insert("args".to_string(), json!(args));

        self.audit_store.write_event(event).await
    }

    /// Log CLI session end
    pub async fn log_cli_session_end(
        &self,
        ctx: &RequestContext,
        command_name: &str,
        success: bool,
        error_message: Option<String>,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::CliSessionEnd);
        event.data.insert("command_name".to_string(), json!(command_name));
        event.data.insert("success".to_string(), json!(success));

        if let Some(error) = error_message {
            event.data.insert("error_message".to_string(), json!(error));
        }

        self.audit_store.write_event(event).await
    }

    pub async fn log_sign_in_success(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        jwt_id: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::SignInSuccess);
        event.user_id = Some(user_id.to_string());
        event.jwt_id = Some(jwt_id.to_string());

        self.audit_store.write_event(event).await
    }

    /// Log a failed sign-in
    ///
    /// # Arguments
    /// * `email` - Email as submitted (may not belong to any identity)
    /// * `reason` - `no_match` or `malformed_email`
    pub async fn log_sign_in_failure(
        &self,
        ctx: &RequestContext,
        email: &str,
        reason: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::SignInFailure);
        event.data.insert("email".to_string(), json!(email));
        event.data.insert("reason".to_string(), json!(reason));

        self.audit_store.write_event(event).await
    }

    pub async fn log_sign_out(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let event = Self::event(ctx, EventType::SignOut);
        self.audit_store.write_event(event).await
    }

    pub async fn log_identity_created(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        email: &str,
        role: Role,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::IdentityCreated);
        event.data.insert("target_user_id".to_string(), json!(user_id));
        event.data.insert("email".to_string(), json!(email));
        event.data.insert("role".to_string(), json!(role.as_str()));

        self.audit_store.write_event(event).await
    }

    /// Log a session whose subject no longer exists but whose email matched another identity
    pub async fn log_identity_mismatch(
        &self,
        ctx: &RequestContext,
        claimed_user_id: &str,
        resolved_user_id: &str,
        email: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::IdentityMismatch);
        event.data.insert("claimed_user_id".to_string(), json!(claimed_user_id));
        event.data.insert("resolved_user_id".to_string(), json!(resolved_user_id));
        event.data.insert("email".to_string(), json!(email));

        self.audit_store.write_event(event).await
    }

    pub async fn log_access_denied(
        &self,
        ctx: &RequestContext,
        predicate: &str,
        resource_id: &str,
        mode: AccessMode,
        denial: &Denial,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::AccessDenied);
        event.data.insert("predicate".to_string(), json!(predicate));
        event.data.insert("resource_id".to_string(), json!(resource_id));
        event.data.insert("mode".to_string(), json!(mode.to_string()));
        event.data.insert("denial".to_string(), json!(denial.as_str()));

        self.audit_store.write_event(event).await
    }

    /// Log a request forwarded without identity under the fail-open override
    pub async fn log_guard_fail_open(
        &self,
        ctx: &RequestContext,
        path: &str,
        budget_ms: u64,
        override_until: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::GuardFailOpen);
        event.data.insert("path".to_string(), json!(path));
        event.data.insert("budget_ms".to_string(), json!(budget_ms));
        event.data.insert("override_until".to_string(), json!(override_until));

        self.audit_store.write_event(event).await
    }

    /// Log lazy creation of a tenant-scoped entity
    ///
    /// # Arguments
    /// * `resource` - `profile` or `studio`
    pub async fn log_provisioned(
        &self,
        ctx: &RequestContext,
        resource: &str,
        resource_id: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::TenantProvisioned);
        event.data.insert("resource".to_string(), json!(resource));
        event.data.insert("resource_id".to_string(), json!(resource_id));

        self.audit_store.write_event(event).await
    }

    pub async fn log_deletion_blocked(
        &self,
        ctx: &RequestContext,
        report: &DependencyReport,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::DeletionBlocked);
        event.data.insert("entity".to_string(), json!(report.entity));
        event.data.insert("entity_id".to_string(), json!(report.id));
        event.data.insert("dependents".to_string(), json!(report.dependents));

        self.audit_store.write_event(event).await
    }

    pub async fn log_region_deleted(
        &self,
        ctx: &RequestContext,
        region_id: &str,
        name: &str,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::RegionDeleted);
        event.data.insert("region_id".to_string(), json!(region_id));
        event.data.insert("name".to_string(), json!(name));

        self.audit_store.write_event(event).await
    }

    pub async fn log_role_changed(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
        old_role: Role,
        new_role: Role,
    ) -> Result<(), InternalError> {
        let mut event = Self::event(ctx, EventType::RoleChanged);
        event.data.insert("target_user_id".to_string(), json!(target_user_id));
        event.data.insert("old_role".to_string(), json!(old_role.as_str()));
        event.data.insert("new_role".to_string(), json!(new_role.as_str()));

        self.audit_store.write_event(event).await
    }
}
