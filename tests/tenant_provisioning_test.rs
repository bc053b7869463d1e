mod common;

use castgate_backend::types::db::profile;
use castgate_backend::types::internal::identity::Role;
use common::*;
use poem::http::StatusCode;
use serde_json::json;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_profile_initialization_is_idempotent() {
    let (app_data, cli) = setup_client().await;
    let user = create_user(&app_data, "new@example.com", Role::User).await;
    let token = token_for(&app_data, &user.id).await;

    let first = cli
        .post("/api/tenant/profile")
        .header("Authorization", bearer(&token))
        .send()
        .await;
    first.assert_status(StatusCode::CREATED);
    let first_json = first.json().await;
    let created = first_json.value().object();
    created.get("availability").assert_bool(true);
    created.get("skills").array().assert_len(0);
    created.get("location_ids").array().assert_len(0);
    let profile_id = created.get("id").string().to_string();

    let second = cli
        .post("/api/tenant/profile")
        .header("Authorization", bearer(&token))
        .send()
        .await;
    second.assert_status_is_ok();
    second.json().await.value().object().get("id").assert_string(&profile_id);

    let rows = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user.id.as_str()))
        .count(&app_data.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_concurrent_profile_initialization_yields_one_profile() {
    let (app_data, cli) = setup_client().await;
    let user = create_user(&app_data, "racer@example.com", Role::User).await;
    let token = token_for(&app_data, &user.id).await;

    let (a, b) = tokio::join!(
        cli.post("/api/tenant/profile").header("Authorization", bearer(&token)).send(),
        cli.post("/api/tenant/profile").header("Authorization", bearer(&token)).send(),
    );

    let statuses = [a.0.status(), b.0.status()];
    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.iter().all(|s| *s == StatusCode::CREATED || *s == StatusCode::OK));

    let rows = profile::Entity::find()
        .filter(profile::Column::UserId.eq(user.id.as_str()))
        .count(&app_data.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_studio_tenant_cannot_initialize_profile() {
    let (app_data, cli) = setup_client().await;
    let (_, _, token) = studio_owner(&app_data, "owner@studio.test", "Northlight").await;

    cli.post("/api/tenant/profile")
        .header("Authorization", bearer(&token))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_studio_initialization() {
    let (app_data, cli) = setup_client().await;
    let user = create_user(&app_data, "founder@studio.test", Role::User).await;
    let token = token_for(&app_data, &user.id).await;

    let resp = cli
        .post("/api/tenant/studio")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "  " }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .post("/api/tenant/studio")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "Northlight", "region_id": "nowhere" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .post("/api/tenant/studio")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "Northlight" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let studio_id = resp.json().await.value().object().get("id").string().to_string();

    // Name is ignored once the studio exists
    let resp = cli
        .post("/api/tenant/studio")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "Renamed" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("id").assert_string(&studio_id);
    body.get("name").assert_string("Northlight");
}

#[tokio::test]
async fn test_session_reflects_tenant_after_initialization() {
    let (app_data, cli) = setup_client().await;
    let user = create_user(&app_data, "new@example.com", Role::User).await;
    let token = token_for(&app_data, &user.id).await;

    let resp = cli.get("/api/auth/session").header("Authorization", bearer(&token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("tenant_kind").assert_null();

    cli.post("/api/tenant/profile")
        .header("Authorization", bearer(&token))
        .send()
        .await
        .assert_status(StatusCode::CREATED);

    // Same token, fresh view
    let resp = cli.get("/api/auth/session").header("Authorization", bearer(&token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("tenant_kind").assert_string("TALENT");
}
