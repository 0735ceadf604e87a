//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, AUTH_JWT_SECRET, API_PORT
//! - REDIS_URL for the Redis viewer store tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_redis_env, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_provision_is_idempotent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let subject = unique_subject("ada");
    let token = server.token_for(&subject, Some("Ada"), None).unwrap();

    let first: ProvisionResponse = assert_json(
        server.post_auth("/api/v1/users/@me", Some(&token)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let second: ProvisionResponse = assert_json(
        server.post_auth("/api/v1/users/@me", Some(&token)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(first.user_id, second.user_id);

    let me: Option<CurrentUserResponse> = assert_json(
        server.get_auth("/api/v1/users/@me", Some(&token)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let me = me.expect("provisioned user should be returned");
    assert_eq!(me.id, first.user_id);
    assert_eq!(me.name.as_deref(), Some("Ada"));
    assert!(me.member_number.is_some_and(|n| n.starts_with("M-")));
    assert!(!me.profile_completed);
}

#[tokio::test]
async fn test_current_user_before_provisioning_is_null() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let token = server
        .token_for(&unique_subject("new"), None, None)
        .unwrap();

    let me: Option<CurrentUserResponse> = assert_json(
        server.get_auth("/api/v1/users/@me", Some(&token)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(me.is_none());
}

#[tokio::test]
async fn test_invalid_token_is_unauthenticated() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post_auth("/api/v1/users/@me", Some("not-a-jwt"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "UNAUTHENTICATED");
    assert_eq!(body.error.message, "User not logged in");
}

#[tokio::test]
async fn test_backfill_requires_owner() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (token, _) = server.sign_up("Member").await.unwrap();

    let response = server
        .post_auth("/api/v1/admin/member-numbers", Some(&token))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "FORBIDDEN");
}

// ============================================================================
// Viewer Tests
// ============================================================================

#[tokio::test]
async fn test_viewer_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    viewer_lifecycle(&server).await;
}

#[tokio::test]
async fn test_viewer_lifecycle_on_redis() {
    if !check_redis_env().await {
        return;
    }

    let server = TestServer::start_with_redis()
        .await
        .expect("Failed to start server");
    viewer_lifecycle(&server).await;
}

async fn viewer_lifecycle(server: &TestServer) {
    let (alice, alice_id) = server.sign_up("Alice").await.unwrap();
    let (bob, _) = server.sign_up("Bob").await.unwrap();
    let path = unique_entity_path();

    // Alice opens the entity twice; Bob opens it once
    for _ in 0..2 {
        let response = server.post_auth(&path, Some(&alice)).await.unwrap();
        assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    }
    let response = server.post_auth(&path, Some(&bob)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Bob sees exactly Alice
    let viewers: Vec<ActiveViewer> =
        assert_json(server.get_auth(&path, Some(&bob)).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(viewers.len(), 1);
    assert_eq!(viewers[0].user_id, alice_id);
    assert_eq!(viewers[0].user_name, "Alice");
    assert!(viewers[0].user_avatar.is_none());
    assert!(viewers[0].last_active_at > 0);

    // Alice leaves
    let response = server.delete_auth(&path, Some(&alice)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let viewers: Vec<ActiveViewer> =
        assert_json(server.get_auth(&path, Some(&bob)).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(viewers.is_empty());

    // Releasing again is still a no-op success
    let response = server.delete_auth(&path, Some(&alice)).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_heartbeat_errors() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let path = unique_entity_path();

    let response = server.post_auth(&path, None).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let stranger = server
        .token_for(&unique_subject("stranger"), None, None)
        .unwrap();
    let response = server.post_auth(&path, Some(&stranger)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let (token, _) = server.sign_up("Alice").await.unwrap();
    let overlong = format!("/api/v1/viewers/doc/{}", "a".repeat(129));
    let response = server.post_auth(&overlong, Some(&token)).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_ENTITY_KEY");
}

#[tokio::test]
async fn test_release_and_snapshot_never_fail() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let path = unique_entity_path();

    let response = server.delete_auth(&path, None).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let viewers: Vec<ActiveViewer> =
        assert_json(server.get_auth(&path, Some("garbage")).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(viewers.is_empty());
}
