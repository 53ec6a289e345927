//! List endpoints: identity, ownership, and share tokens.

use std::collections::HashSet;

use axum::http::StatusCode;
use gift0_integration_tests::{BASE_URL, TestApp, str_field};
use serde_json::json;

const OWNER: &str = "fp-owner-1";
const STRANGER: &str = "fp-stranger-1";

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_first_visit_reports_new_user_once() {
    let app = TestApp::new();

    let first = app.get("/api/lists", Some(OWNER)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["isNewUser"], true);
    assert_eq!(first.body["lists"], json!([]));

    let second = app.get("/api/lists", Some(OWNER)).await;
    assert_eq!(second.body["isNewUser"], false);
    assert_eq!(app.store.user_count().await, 1);
}

#[tokio::test]
async fn test_missing_fingerprint_is_rejected() {
    let app = TestApp::new();

    let response = app.get("/api/lists", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Fingerprint ID is required");
    assert_eq!(app.store.user_count().await, 0);
}

// =============================================================================
// Create / read
// =============================================================================

#[tokio::test]
async fn test_created_lists_get_distinct_share_tokens() {
    let app = TestApp::new();

    let mut tokens = HashSet::new();
    for i in 0..10 {
        let list = app.create_list(OWNER, &format!("List {i}")).await;
        let token = str_field(&list, "shareToken").to_owned();
        assert_eq!(
            str_field(&list, "shareUrl"),
            format!("{BASE_URL}/l/{token}")
        );
        tokens.insert(token);
    }
    assert_eq!(tokens.len(), 10);

    let response = app.get("/api/lists", Some(OWNER)).await;
    let lists = response.body["lists"].as_array().unwrap();
    assert_eq!(lists.len(), 10);
    assert_eq!(str_field(&lists[0], "name"), "List 9");
    assert_eq!(str_field(&lists[9], "name"), "List 0");
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = TestApp::new();

    let response = app
        .post("/api/lists", Some(OWNER), json!({ "name": "   " }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.list_count().await, 0);
}

#[tokio::test]
async fn test_malformed_body_uses_error_format() {
    let app = TestApp::new();

    let response = app
        .post("/api/lists", Some(OWNER), json!({ "title": "Birthday" }))
        .await;
    assert!(response.status.is_client_error());
    assert!(!response.error().is_empty());
}

#[tokio::test]
async fn test_can_edit_depends_on_viewer() {
    let app = TestApp::new();
    let list = app.create_list(OWNER, "Birthday").await;
    let uri = format!("/api/lists/{}", str_field(&list, "id"));

    let owner_view = app.get(&uri, Some(OWNER)).await;
    assert_eq!(owner_view.status, StatusCode::OK);
    assert_eq!(owner_view.body["canEdit"], true);

    let stranger_view = app.get(&uri, Some(STRANGER)).await;
    assert_eq!(stranger_view.body["canEdit"], false);

    let anonymous_view = app.get(&uri, None).await;
    assert_eq!(anonymous_view.body["canEdit"], false);

    // Reading does not register the stranger
    assert_eq!(app.store.user_count().await, 1);
}

#[tokio::test]
async fn test_unknown_list_is_not_found() {
    let app = TestApp::new();

    let response = app
        .get("/api/lists/00000000-0000-4000-8000-000000000000", Some(OWNER))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "List not found");

    let response = app.get("/api/lists/not-a-uuid", Some(OWNER)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn test_rename_requires_owner() {
    let app = TestApp::new();
    let list = app.create_list(OWNER, "Birthday").await;
    let uri = format!("/api/lists/{}", str_field(&list, "id"));

    let denied = app
        .patch(&uri, Some(STRANGER), json!({ "name": "Mine now" }))
        .await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.error(), "Unauthorized");

    let renamed = app
        .patch(&uri, Some(OWNER), json!({ "name": "Birthday 2025" }))
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(str_field(&renamed.body, "name"), "Birthday 2025");
    assert_eq!(
        str_field(&renamed.body, "shareToken"),
        str_field(&list, "shareToken")
    );
}

#[tokio::test]
async fn test_delete_requires_owner_and_cascades() {
    let app = TestApp::new();
    let list = app.create_list(OWNER, "Birthday").await;
    let list_id = str_field(&list, "id");
    app.add_gift(OWNER, list_id, "Socks").await;
    let uri = format!("/api/lists/{list_id}");

    let denied = app.delete(&uri, Some(STRANGER)).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.list_count().await, 1);

    let deleted = app.delete(&uri, Some(OWNER)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.list_count().await, 0);
    assert_eq!(app.store.gift_count().await, 0);
}
