mod common;

use castgate_backend::types::internal::Role;
use castgate_backend::types::internal::audit::EventType;
use common::*;
use poem::http::StatusCode;

#[tokio::test]
async fn test_cross_studio_application_is_hidden() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_a, _) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, _, token_b) = studio_owner(&app_data, "b@studio.test", "Studio B").await;
    let (_, profile_id, _) = talent(&app_data, "talent@example.com").await;

    let call = app_data
        .casting_store
        .create_casting_call(&studio_a, None, None, "Lead")
        .await
        .unwrap();
    let application = app_data
        .casting_store
        .create_application(&call.id, &profile_id)
        .await
        .unwrap();

    let resp = cli
        .get(format!("/api/applications/{}", application.id))
        .header("Authorization", bearer(&token_b))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let body = resp.0.into_body().into_string().await.unwrap();
    assert!(!body.contains(&application.id));
    assert!(!body.contains(&profile_id));

    let denials = app_data
        .audit_store
        .events_of_type(EventType::AccessDenied)
        .await
        .unwrap();
    assert_eq!(denials.len(), 1);
    assert!(denials[0].data.contains("can_access_application"));
}

#[tokio::test]
async fn test_owning_studio_and_applicant_can_read_application() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_id, studio_token) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, profile_id, talent_token) = talent(&app_data, "talent@example.com").await;

    let call = app_data
        .casting_store
        .create_casting_call(&studio_id, None, None, "Lead")
        .await
        .unwrap();
    let application = app_data
        .casting_store
        .create_application(&call.id, &profile_id)
        .await
        .unwrap();

    for token in [&studio_token, &talent_token] {
        let resp = cli
            .get(format!("/api/applications/{}", application.id))
            .header("Authorization", bearer(token))
            .send()
            .await;
        resp.assert_status_is_ok();
        resp.json().await.value().object().get("id").assert_string(&application.id);
    }
}

#[tokio::test]
async fn test_only_the_applicant_can_withdraw() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_id, studio_token) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, profile_id, talent_token) = talent(&app_data, "talent@example.com").await;
    let (_, _, other_token) = talent(&app_data, "other@example.com").await;

    let call = app_data
        .casting_store
        .create_casting_call(&studio_id, None, None, "Lead")
        .await
        .unwrap();
    let application = app_data
        .casting_store
        .create_application(&call.id, &profile_id)
        .await
        .unwrap();
    let path = format!("/api/applications/{}", application.id);

    // The owning studio may read but not delete
    let resp = cli.delete(&path).header("Authorization", bearer(&studio_token)).send().await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let resp = cli.delete(&path).header("Authorization", bearer(&other_token)).send().await;
    resp.assert_status(StatusCode::NOT_FOUND);

    let resp = cli.delete(&path).header("Authorization", bearer(&talent_token)).send().await;
    resp.assert_status_is_ok();

    assert!(app_data.casting_store.find_application(&application.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_foreign_project_is_forbidden() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_a, token_a) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, _, token_b) = studio_owner(&app_data, "b@studio.test", "Studio B").await;

    let project = app_data.casting_store.create_project(&studio_a, "Pilot").await.unwrap();
    let path = format!("/api/projects/{}", project.id);

    let resp = cli.get(&path).header("Authorization", bearer(&token_b)).send().await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = cli.get(&path).header("Authorization", bearer(&token_a)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("name").assert_string("Pilot");

    let resp = cli
        .get("/api/projects/does-not-exist")
        .header("Authorization", bearer(&token_a))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_delete_is_blocked_by_casting_calls() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_id, token) = studio_owner(&app_data, "a@studio.test", "Studio A").await;

    let project = app_data.casting_store.create_project(&studio_id, "Pilot").await.unwrap();
    let call = app_data
        .casting_store
        .create_casting_call(&studio_id, Some(&project.id), None, "Lead")
        .await
        .unwrap();
    let path = format!("/api/projects/{}", project.id);

    let resp = cli.delete(&path).header("Authorization", bearer(&token)).send().await;
    resp.assert_status(StatusCode::CONFLICT);
    let json = resp.json().await;
    let body = json.value().object();
    body.get("error").assert_string("has_dependents");
    let dependents = body.get("dependents").array();
    dependents.assert_len(1);
    dependents.get(0).object().get("kind").assert_string("casting_calls");
    dependents.get(0).object().get("count").assert_i64(1);

    let resp = cli
        .delete(format!("/api/casting-calls/{}", call.id))
        .header("Authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli.delete(&path).header("Authorization", bearer(&token)).send().await;
    resp.assert_status_is_ok();
    assert!(app_data.casting_store.find_project(&project.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_external_actors_are_private_to_their_studio() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_a, token_a) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, _, token_b) = studio_owner(&app_data, "b@studio.test", "Studio B").await;

    let actor = app_data
        .casting_store
        .create_external_actor(&studio_a, "Guest Star", Some("guest@agency.test"))
        .await
        .unwrap();
    let path = format!("/api/external-actors/{}", actor.id);

    cli.get(&path)
        .header("Authorization", bearer(&token_b))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    cli.get(&path)
        .header("Authorization", bearer(&token_a))
        .send()
        .await
        .assert_status_is_ok();
}

#[tokio::test]
async fn test_studio_sees_profile_only_after_an_application() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_id, studio_token) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, profile_id, _) = talent(&app_data, "talent@example.com").await;
    let path = format!("/api/profiles/{}", profile_id);

    cli.get(&path)
        .header("Authorization", bearer(&studio_token))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let call = app_data
        .casting_store
        .create_casting_call(&studio_id, None, None, "Lead")
        .await
        .unwrap();
    app_data.casting_store.create_application(&call.id, &profile_id).await.unwrap();

    let resp = cli.get(&path).header("Authorization", bearer(&studio_token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("id").assert_string(&profile_id);
}

#[tokio::test]
async fn test_administrators_get_no_ownership_bypass() {
    let (app_data, cli) = setup_client().await;
    let (_, studio_a, _) = studio_owner(&app_data, "a@studio.test", "Studio A").await;
    let (_, applicant_profile, _) = talent(&app_data, "applicant@example.com").await;

    let project = app_data.casting_store.create_project(&studio_a, "Pilot").await.unwrap();
    let call = app_data
        .casting_store
        .create_casting_call(&studio_a, Some(&project.id), None, "Lead")
        .await
        .unwrap();
    let application = app_data
        .casting_store
        .create_application(&call.id, &applicant_profile)
        .await
        .unwrap();
    let actor = app_data
        .casting_store
        .create_external_actor(&studio_a, "Guest Star", None)
        .await
        .unwrap();

    let (admin_id, _, _) = studio_owner(&app_data, "admin@studio.test", "Studio B").await;
    let admin_token = promote(&app_data, &admin_id, Role::Admin).await;
    let (super_id, _, _) = talent(&app_data, "root@example.com").await;
    let super_token = promote(&app_data, &super_id, Role::SuperAdmin).await;

    let project_path = format!("/api/projects/{}", project.id);
    let application_path = format!("/api/applications/{}", application.id);
    let actor_path = format!("/api/external-actors/{}", actor.id);
    let profile_path = format!("/api/profiles/{}", applicant_profile);
    let call_path = format!("/api/casting-calls/{}", call.id);

    for token in [&admin_token, &super_token] {
        let auth = bearer(token);

        cli.get(&project_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::FORBIDDEN);
        cli.delete(&project_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::FORBIDDEN);
        cli.delete(&call_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::FORBIDDEN);
        cli.get(&application_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        cli.delete(&application_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        cli.get(&actor_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
        cli.get(&profile_path)
            .header("Authorization", &auth)
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // Nothing was removed along the way
    assert!(app_data.casting_store.find_project(&project.id).await.unwrap().is_some());
    assert!(app_data.casting_store.find_casting_call(&call.id).await.unwrap().is_some());
    assert!(app_data.casting_store.find_application(&application.id).await.unwrap().is_some());
}
