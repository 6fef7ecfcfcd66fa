//! Integration tests for device endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_device_derives_stable_uid() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let group = create_test_group(&app, &auth, "home").await;

    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/members/{}/groups/{}/devices", auth.username, group),
        serde_json::json!({ "name": "Thermostat" }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "thermostat");
    assert_eq!(body["is_active"], true);

    let expected = domain::uid::generate_device_uid(&auth.username, "home", "thermostat");
    assert_eq!(body["uid"].as_str().unwrap(), expected.to_string());
}

#[tokio::test]
async fn test_device_name_unique_across_owner_groups() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let first = create_test_group(&app, &auth, "upstairs").await;
    let second = create_test_group(&app, &auth, "downstairs").await;
    register_test_device(&app, &auth, &first, "camera").await;

    // Same name in a different group of the same owner collides
    let request = json_request_with_auth(
        Method::POST,
        &format!(
            "/api/v1/members/{}/groups/{}/devices",
            auth.username, second
        ),
        serde_json::json!({ "name": "Camera" }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    let (field, code) = first_detail(&body);
    assert_eq!(field, "name");
    assert_eq!(code, "unique_name");
    assert_eq!(
        body["message"].as_str().unwrap(),
        "A device with this name already exists."
    );
}

#[tokio::test]
async fn test_device_name_free_across_owners() {
    let (app, _pool) = create_test_app().await;
    let first = signup_and_login(&app, &TestMember::new()).await;
    let second = signup_and_login(&app, &TestMember::new()).await;
    let group_a = create_test_group(&app, &first, "home").await;
    let group_b = create_test_group(&app, &second, "home").await;

    let uid_a = register_test_device(&app, &first, &group_a, "sensor").await;
    let uid_b = register_test_device(&app, &second, &group_b, "sensor").await;

    // Same name and group name, different owner: different UID
    assert_ne!(uid_a, uid_b);
}

#[tokio::test]
async fn test_rename_keeps_uid() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let group = create_test_group(&app, &auth, "lab").await;
    let uid = register_test_device(&app, &auth, &group, "probe-1").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, group, uid
        ),
        serde_json::json!({ "name": "probe-renamed" }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "probe-renamed");
    assert_eq!(body["uid"].as_str().unwrap(), uid);

    // The renamed device still resolves under the original UID
    let request = get_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, group, uid
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_move_between_groups_keeps_uid() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let origin = create_test_group(&app, &auth, "origin").await;
    let target = create_test_group(&app, &auth, "target").await;
    let uid = register_test_device(&app, &auth, &origin, "mover").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, origin, uid
        ),
        serde_json::json!({ "name": "mover", "group": "target" }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["uid"].as_str().unwrap(), uid);
    assert!(body["group"].as_str().unwrap().ends_with("/groups/target"));

    // Gone from the origin group, present in the target group
    let request = get_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, origin, uid
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = get_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, target, uid
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_move_to_unknown_group_is_404() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let group = create_test_group(&app, &auth, "only").await;
    let uid = register_test_device(&app, &auth, &group, "stuck").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, group, uid
        ),
        serde_json::json!({ "name": "stuck", "group": "nonexistent" }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivate_device_flag() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let group = create_test_group(&app, &auth, "fleet").await;
    let uid = register_test_device(&app, &auth, &group, "drone").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, group, uid
        ),
        serde_json::json!({ "name": "drone", "is_active": false }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn test_unknown_or_malformed_uid_is_404() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let group = create_test_group(&app, &auth, "empty").await;

    let request = get_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username,
            group,
            uuid::Uuid::new_v4()
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = get_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/not-a-uuid",
            auth.username, group
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_device() {
    let (app, _pool) = create_test_app().await;
    let auth = signup_and_login(&app, &TestMember::new()).await;
    let group = create_test_group(&app, &auth, "cleanup").await;
    let uid = register_test_device(&app, &auth, &group, "temporary").await;

    let request = delete_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, group, uid
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = get_request_with_auth(
        &format!(
            "/api/v1/members/{}/groups/{}/devices/{}",
            auth.username, group, uid
        ),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
