//! HTTP-level tests for the owner's project, step, and note endpoints.

mod common;

use axum::http::StatusCode;
use backlog_db::memory::DependentRows;
use common::{
    body_json, build_test_app, create_project, delete_auth, get, get_auth, patch_json_auth,
    post_json_auth, put_json_auth,
};
use serde_json::json;

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let test = build_test_app();
    let response = get(test.app(), "/api/v1/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let test = build_test_app();
    let response = get_auth(test.app(), "/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_returns_detail_with_template_steps() {
    let test = build_test_app();
    let token = test.user_token(1);

    let response = post_json_auth(
        test.app(),
        "/api/v1/projects",
        &token,
        json!({ "title": "Castellan", "description": "knight kit" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Castellan");
    assert_eq!(json["owner_id"], 1);
    assert_eq!(json["percent_complete"], 0);
    assert_eq!(json["current_step"], "not started");
    assert_eq!(json["steps"].as_array().unwrap().len(), 5);
    assert_eq!(json["steps"][0]["name"], "Unboxing");
    assert_eq!(json["steps"][0]["status"], "todo");
}

#[tokio::test]
async fn over_long_title_is_invalid_input() {
    let test = build_test_app();
    let token = test.user_token(1);

    let response = post_json_auth(
        test.app(),
        "/api/v1/projects",
        &token,
        json!({ "title": "x".repeat(201) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn list_shows_only_my_projects() {
    let test = build_test_app();
    let mine = test.user_token(1);
    let theirs = test.user_token(2);
    create_project(&test, &mine, "Mine").await;
    create_project(&test, &theirs, "Theirs").await;

    let response = get_auth(test.app(), "/api/v1/projects", &mine).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Mine"]);
}

#[tokio::test]
async fn other_users_get_403_on_private_project() {
    let test = build_test_app();
    let owner = test.user_token(1);
    let intruder = test.user_token(2);
    let id = create_project(&test, &owner, "Warden").await;
    let uri = format!("/api/v1/projects/{id}");

    let response = get_auth(test.app(), &uri, &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "ACCESS_DENIED");

    let response = patch_json_auth(test.app(), &uri, &intruder, json!({ "title": "Mine now" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(test.app(), &uri, &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let test = build_test_app();
    let token = test.user_token(1);
    let id = create_project(&test, &token, "Paladin").await;

    let response = patch_json_auth(
        test.app(),
        &format!("/api/v1/projects/{id}"),
        &token,
        json!({ "is_public": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Paladin");
    assert_eq!(json["is_public"], true);
}

#[tokio::test]
async fn current_step_transition_is_idempotent() {
    let test = build_test_app();
    let token = test.user_token(1);
    let id = create_project(&test, &token, "Errant").await;
    let uri = format!("/api/v1/projects/{id}/current-step");

    let first = body_json(
        put_json_auth(test.app(), &uri, &token, json!({ "current_step": "Priming" })).await,
    )
    .await;
    let second = body_json(
        put_json_auth(test.app(), &uri, &token, json!({ "current_step": "Priming" })).await,
    )
    .await;

    assert_eq!(first["percent_complete"], 60);
    assert_eq!(first["current_step"], "Priming");
    assert_eq!(first["steps"], second["steps"]);
}

#[tokio::test]
async fn unknown_current_step_is_invalid_input() {
    let test = build_test_app();
    let token = test.user_token(1);
    let id = create_project(&test, &token, "Errant").await;

    let response = put_json_auth(
        test.app(),
        &format!("/api/v1/projects/{id}/current-step"),
        &token,
        json!({ "current_step": "Varnish" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn single_step_update_returns_project_percent() {
    let test = build_test_app();
    let token = test.user_token(1);
    let id = create_project(&test, &token, "Preceptor").await;
    let detail = body_json(get_auth(test.app(), &format!("/api/v1/projects/{id}"), &token).await).await;
    let step_id = detail["steps"][0]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        test.app(),
        &format!("/api/v1/steps/{step_id}"),
        &token,
        json!({ "status": "done" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["step"]["status"], "done");
    assert_eq!(json["project_id"], id);
    assert_eq!(json["percent_complete"], 20);
}

#[tokio::test]
async fn notes_are_created_listed_and_updated() {
    let test = build_test_app();
    let token = test.user_token(1);
    let id = create_project(&test, &token, "Gallant").await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/notes",
        &token,
        json!({ "project_id": id, "content": "primed black" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let note = body_json(response).await;
    assert_eq!(note["project_title"], "Gallant");
    assert_eq!(note["is_public"], false);
    let note_id = note["id"].as_i64().unwrap();

    let response = patch_json_auth(
        test.app(),
        &format!("/api/v1/notes/{note_id}"),
        &token,
        json!({ "content": "primed black, zenithal white" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_json(
        get_auth(test.app(), &format!("/api/v1/projects/{id}/notes?size=5"), &token).await,
    )
    .await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["size"], 5);
    assert_eq!(page["items"][0]["content"], "primed black, zenithal white");
}

#[tokio::test]
async fn delete_cascades_and_second_delete_is_404() {
    let test = build_test_app();
    let token = test.user_token(1);
    let id = create_project(&test, &token, "Armiger").await;
    post_json_auth(
        test.app(),
        "/api/v1/notes",
        &token,
        json!({ "project_id": id, "content": "done" }),
    )
    .await;
    let uri = format!("/api/v1/projects/{id}");

    let response = delete_auth(test.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["project_id"], id);
    assert_eq!(test.store.dependent_rows(id), DependentRows::default());

    let response = delete_auth(test.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
