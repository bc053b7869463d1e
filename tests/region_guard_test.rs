mod common;

use castgate_backend::types::internal::audit::EventType;
use castgate_backend::types::internal::identity::{Identity, Role};
use common::*;
use poem::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_region_delete_reports_exact_counts() {
    let (app_data, cli) = setup_client().await;
    let admin = create_user(&app_data, "admin@castgate.test", Role::Admin).await;
    let token = token_for(&app_data, &admin.id).await;

    let region = app_data.region_store.create_region("Pacific Northwest").await.unwrap();
    app_data.region_store.create_location(&region.id, "Seattle").await.unwrap();
    app_data.region_store.create_location(&region.id, "Portland").await.unwrap();

    let founder = create_user(&app_data, "founder@studio.test", Role::User).await;
    let studio = app_data
        .tenant_store
        .provision_studio(
            &Identity::from_model(&founder, false).unwrap(),
            "Northlight",
            Some(region.id.clone()),
        )
        .await
        .unwrap()
        .value;
    app_data
        .casting_store
        .create_casting_call(&studio.id, None, Some(&region.id), "Lead")
        .await
        .unwrap();

    let path = format!("/api/admin/regions/{}", region.id);
    let resp = cli.delete(&path).header("Authorization", bearer(&token)).send().await;
    resp.assert_status(StatusCode::CONFLICT);

    let json = resp.json().await;
    let body = json.value().object();
    body.get("entity").assert_string("region");
    body.get("id").assert_string(&region.id);
    let dependents = body.get("dependents").array();
    dependents.assert_len(4);
    let expected = [("locations", 2), ("casting_calls", 1), ("profiles", 0), ("studios", 1)];
    for (i, (kind, count)) in expected.iter().enumerate() {
        let entry = dependents.get(i).object();
        entry.get("kind").assert_string(kind);
        entry.get("count").assert_i64(*count);
    }

    assert!(app_data.region_store.find_region(&region.id).await.unwrap().is_some());

    let blocked = app_data
        .audit_store
        .events_of_type(EventType::DeletionBlocked)
        .await
        .unwrap();
    assert_eq!(blocked.len(), 1);
}

#[tokio::test]
async fn test_unreferenced_region_is_deleted() {
    let (app_data, cli) = setup_client().await;
    let admin = create_user(&app_data, "admin@castgate.test", Role::Admin).await;
    let token = token_for(&app_data, &admin.id).await;

    let region = app_data.region_store.create_region("Gulf Coast").await.unwrap();
    let path = format!("/api/admin/regions/{}", region.id);

    let resp = cli.delete(&path).header("Authorization", bearer(&token)).send().await;
    resp.assert_status_is_ok();
    assert!(app_data.region_store.find_region(&region.id).await.unwrap().is_none());

    // Gone now
    cli.delete(&path)
        .header("Authorization", bearer(&token))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_region_management_requires_admin() {
    let (app_data, cli) = setup_client().await;
    let user = create_user(&app_data, "user@example.com", Role::User).await;
    let token = token_for(&app_data, &user.id).await;
    let region = app_data.region_store.create_region("Gulf Coast").await.unwrap();

    cli.get("/api/admin/regions")
        .header("Authorization", bearer(&token))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    cli.delete(format!("/api/admin/regions/{}", region.id))
        .header("Authorization", bearer(&token))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert!(app_data.region_store.find_region(&region.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_creates_and_lists_regions() {
    let (app_data, cli) = setup_client().await;
    let admin = create_user(&app_data, "admin@castgate.test", Role::SuperAdmin).await;
    let token = token_for(&app_data, &admin.id).await;

    for name in ["Midwest", "Gulf Coast"] {
        cli.post("/api/admin/regions")
            .header("Authorization", bearer(&token))
            .body_json(&json!({ "name": name }))
            .send()
            .await
            .assert_status_is_ok();
    }

    cli.post("/api/admin/regions")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "name": "Midwest" }))
        .send()
        .await
        .assert_status(StatusCode::CONFLICT);

    let resp = cli.get("/api/admin/regions").header("Authorization", bearer(&token)).send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let regions = json.value().array();
    regions.assert_len(2);
    regions.get(0).object().get("name").assert_string("Gulf Coast");
    regions.get(1).object().get("name").assert_string("Midwest");
}
