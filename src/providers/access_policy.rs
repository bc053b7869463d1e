//! Ownership rules for studio-scoped resources
//!
//! Pure functions over an already-resolved tenant. Role is not an input to any
//! of them, so administrators get no ownership bypass.

use crate::types::db::{application, casting_call, external_actor, profile, project};
use crate::types::internal::access::{AccessMode, Denial};
use crate::types::internal::tenant::TenantResolution;

fn owns_studio(actor: &TenantResolution, studio_id: &str) -> bool {
    actor.studio_id() == Some(studio_id)
}

fn is_profile(actor: &TenantResolution, profile_id: &str) -> bool {
    actor.profile_id() == Some(profile_id)
}

pub fn project(actor: &TenantResolution, project: &project::Model, _mode: AccessMode) -> Result<(), Denial> {
    if owns_studio(actor, &project.studio_id) {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Casting calls are a public listing for any signed-in identity
pub fn casting_call(actor: &TenantResolution, call: &casting_call::Model, mode: AccessMode) -> Result<(), Denial> {
    match mode {
        AccessMode::Read => Ok(()),
        AccessMode::Mutate | AccessMode::Delete if owns_studio(actor, &call.studio_id) => Ok(()),
        AccessMode::Mutate | AccessMode::Delete => Err(Denial::Forbidden),
    }
}

/// `call_studio_id` is the studio owning the application's casting call
pub fn application(
    actor: &TenantResolution,
    application: &application::Model,
    call_studio_id: &str,
    mode: AccessMode,
) -> Result<(), Denial> {
    if is_profile(actor, &application.profile_id) {
        return Ok(());
    }
    match mode {
        AccessMode::Read | AccessMode::Mutate if owns_studio(actor, call_studio_id) => Ok(()),
        _ => Err(Denial::NotFound),
    }
}

pub fn external_actor(
    actor: &TenantResolution,
    external_actor: &external_actor::Model,
    _mode: AccessMode,
) -> Result<(), Denial> {
    if owns_studio(actor, &external_actor.studio_id) {
        Ok(())
    } else {
        Err(Denial::NotFound)
    }
}

/// `applied_to_actor_studio` is whether the profile applied to one of the actor's casting calls
pub fn profile(
    actor: &TenantResolution,
    profile: &profile::Model,
    mode: AccessMode,
    applied_to_actor_studio: bool,
) -> Result<(), Denial> {
    if is_profile(actor, &profile.id) {
        return Ok(());
    }
    if mode == AccessMode::Read && actor.studio_id().is_some() && applied_to_actor_studio {
        return Ok(());
    }
    Err(Denial::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn studio(id: &str) -> TenantResolution {
        TenantResolution::Studio {
            tenant_id: format!("tenant-{}", id),
            studio_id: id.to_string(),
        }
    }

    fn talent(profile_id: &str) -> TenantResolution {
        TenantResolution::Talent {
            tenant_id: Some("tenant-talent".to_string()),
            profile_id: profile_id.to_string(),
        }
    }

    const MODES: [AccessMode; 3] = [AccessMode::Read, AccessMode::Mutate, AccessMode::Delete];

    fn project_row(studio_id: &str) -> project::Model {
        project::Model {
            id: "p-1".to_string(),
            studio_id: studio_id.to_string(),
            name: "Pilot".to_string(),
            created_at: 0,
        }
    }

    fn application_row() -> application::Model {
        application::Model {
            id: "a-1".to_string(),
            casting_call_id: "c-1".to_string(),
            profile_id: "prof-1".to_string(),
            status: "SUBMITTED".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_project_only_owning_studio() {
        for mode in MODES {
            assert_eq!(project(&studio("s-1"), &project_row("s-1"), mode), Ok(()));
            assert_eq!(project(&studio("s-2"), &project_row("s-1"), mode), Err(Denial::Forbidden));
            assert_eq!(project(&talent("prof-1"), &project_row("s-1"), mode), Err(Denial::Forbidden));
            assert_eq!(
                project(&TenantResolution::Uninitialized { kind: None }, &project_row("s-1"), mode),
                Err(Denial::Forbidden)
            );
        }
    }

    #[test]
    fn test_casting_call_read_is_public_but_writes_are_owned() {
        let call = casting_call::Model {
            id: "c-1".to_string(),
            studio_id: "s-1".to_string(),
            project_id: None,
            region_id: None,
            title: "Lead".to_string(),
            status: "OPEN".to_string(),
            created_at: 0,
        };

        assert_eq!(casting_call(&talent("prof-1"), &call, AccessMode::Read), Ok(()));
        assert_eq!(casting_call(&studio("s-2"), &call, AccessMode::Read), Ok(()));
        assert_eq!(casting_call(&studio("s-2"), &call, AccessMode::Delete), Err(Denial::Forbidden));
        assert_eq!(casting_call(&talent("prof-1"), &call, AccessMode::Mutate), Err(Denial::Forbidden));
        assert_eq!(casting_call(&studio("s-1"), &call, AccessMode::Delete), Ok(()));
    }

    #[test]
    fn test_application_cross_studio_is_not_found() {
        let app = application_row();

        for mode in MODES {
            assert_eq!(application(&studio("s-2"), &app, "s-1", mode), Err(Denial::NotFound));
            assert_eq!(application(&talent("prof-2"), &app, "s-1", mode), Err(Denial::NotFound));
            assert_eq!(application(&talent("prof-1"), &app, "s-1", mode), Ok(()));
        }
    }

    #[test]
    fn test_application_withdraw_is_applicant_only() {
        let app = application_row();

        assert_eq!(application(&studio("s-1"), &app, "s-1", AccessMode::Read), Ok(()));
        assert_eq!(application(&studio("s-1"), &app, "s-1", AccessMode::Mutate), Ok(()));
        assert_eq!(application(&studio("s-1"), &app, "s-1", AccessMode::Delete), Err(Denial::NotFound));
    }

    #[test]
    fn test_external_actor_owning_studio_only() {
        let row = external_actor::Model {
            id: "e-1".to_string(),
            studio_id: "s-1".to_string(),
            name: "Guest".to_string(),
            email: None,
            created_at: 0,
        };

        assert_eq!(external_actor(&studio("s-1"), &row, AccessMode::Read), Ok(()));
        assert_eq!(external_actor(&studio("s-2"), &row, AccessMode::Read), Err(Denial::NotFound));
        assert_eq!(external_actor(&talent("prof-1"), &row, AccessMode::Read), Err(Denial::NotFound));
    }

    #[test]
    fn test_profile_visible_to_owner_and_studios_it_applied_to() {
        let row = profile::Model {
            id: "prof-1".to_string(),
            user_id: "u-1".to_string(),
            display_name: None,
            bio: None,
            availability: true,
            region_id: None,
            created_at: 0,
            updated_at: 0,
        };

        assert_eq!(profile(&talent("prof-1"), &row, AccessMode::Mutate, false), Ok(()));
        assert_eq!(profile(&studio("s-1"), &row, AccessMode::Read, true), Ok(()));
        assert_eq!(profile(&studio("s-1"), &row, AccessMode::Read, false), Err(Denial::NotFound));
        assert_eq!(profile(&studio("s-1"), &row, AccessMode::Mutate, true), Err(Denial::NotFound));
        assert_eq!(profile(&talent("prof-2"), &row, AccessMode::Read, true), Err(Denial::NotFound));
    }
}
