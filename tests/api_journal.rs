mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{send, signup, test_app};

#[tokio::test]
async fn requires_credentials() {
    let app = test_app();

    // Missing token
    let (status, body) = send(&app, "GET", "/api/journal", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Authentication required"));

    // Present but unverifiable token
    let (status, body) = send(&app, "GET", "/api/journal", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("Invalid or expired token"));
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let app = test_app();
    let (token, _) = signup(&app, "alice", "a@x.com", "secret1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/journal",
        Some(&token),
        Some(json!({ "title": "  My day  ", "content": "  it was calm  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/api/journal", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"].as_i64().unwrap(), id);
    assert_eq!(data[0]["title"], json!("My day"));
    assert_eq!(data[0]["content"], json!("it was calm"));
}

#[tokio::test]
async fn blank_title_defaults_to_untitled() {
    let app = test_app();
    let (token, _) = signup(&app, "alice", "a@x.com", "secret1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/journal",
        Some(&token),
        Some(json!({ "content": "no title today" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/journal", Some(&token), None).await;
    assert_eq!(body["data"][0]["title"], json!("Untitled"));
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let app = test_app();
    let (token, _) = signup(&app, "alice", "a@x.com", "secret1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/journal",
        Some(&token),
        Some(json!({ "title": "empty", "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Journal content is required"));
}

#[tokio::test]
async fn entries_are_scoped_to_their_owner() {
    let app = test_app();
    let (alice, _) = signup(&app, "alice", "a@x.com", "secret1").await;
    let (bob, _) = signup(&app, "bob", "b@x.com", "secret2").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/journal",
        Some(&alice),
        Some(json!({ "content": "alice's private entry" })),
    )
    .await;
    let alice_entry = body["id"].as_i64().unwrap();

    // Bob never sees it
    let (_, body) = send(&app, "GET", "/api/journal", Some(&bob), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Bob's delete of Alice's id reads as "not found", never "forbidden"
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/journal/{alice_entry}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Journal entry not found"));

    // And the entry is still there for Alice
    let (_, body) = send(&app, "GET", "/api/journal", Some(&alice), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // The owner can delete it
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/journal/{alice_entry}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/journal", Some(&alice), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn a_malformed_id_is_a_bad_request() {
    let app = test_app();
    let (token, _) = signup(&app, "alice", "a@x.com", "secret1").await;

    let (status, body) = send(&app, "DELETE", "/api/journal/xyz", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Valid journal entry ID is required"));
}
