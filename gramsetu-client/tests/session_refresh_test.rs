/// Integration tests for the session refresh protocol
///
/// These exercise the full client against a scripted transport:
/// - Concurrent expiry storms collapse into a single refresh exchange
/// - Retried requests never trigger a second refresh
/// - Refresh failure fans the same error out to every parked request
/// - Role-scoped refresh endpoint selection
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{expired_body, jwt_with_role, refresh_ok, TestContext};
use gramsetu_client::token::TokenStore;
use gramsetu_client::transport::{ApiRequest, ApiResponse, Method, TransportError};
use gramsetu_client::ClientError;

/// Scripts `/issues` to reject every bearer except `good_token` as expired
fn script_guarded_issues(ctx: &TestContext, good_token: &str) {
    let good = good_token.to_string();
    ctx.mock.respond_with_fn(Method::Get, "/issues", move |req| {
        if req.bearer.as_deref() == Some(good.as_str()) {
            ApiResponse::json_value(200, &serde_json::json!([]))
        } else {
            ApiResponse::json_value(401, &expired_body())
        }
    });
}

#[tokio::test]
async fn test_concurrent_expiry_causes_single_refresh() {
    let ctx = TestContext::signed_in("access-1", "refresh-1");
    script_guarded_issues(&ctx, "access-2");

    // Hold the refresh in flight long enough for every request to pile up
    ctx.mock.respond_with_delay(
        Method::Post,
        "/auth/refresh-token",
        ApiResponse::json_value(200, &refresh_ok("access-2", "refresh-2")),
        Duration::from_millis(50),
    );

    let session = ctx.client.session();
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.execute(ApiRequest::get("/issues")).await })
        })
        .collect();

    for task in tasks {
        let result = task.await.unwrap();
        assert!(result.is_ok(), "parked request failed: {:?}", result.err());
    }

    assert_eq!(ctx.mock.calls_to(Method::Post, "/auth/refresh-token"), 1);
    assert_eq!(ctx.tokens.access_token().as_deref(), Some("access-2"));
    assert_eq!(ctx.tokens.refresh_token().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_retried_request_never_refreshes_twice() {
    let ctx = TestContext::signed_in("access-1", "refresh-1");

    // Even the fresh token is rejected as expired
    ctx.mock.respond_with(
        Method::Get,
        "/issues",
        ApiResponse::json_value(401, &expired_body()),
    );
    ctx.mock.respond_with(
        Method::Post,
        "/auth/refresh-token",
        ApiResponse::json_value(200, &refresh_ok("access-2", "refresh-2")),
    );

    let session = ctx.client.session();
    let err = session
        .execute(ApiRequest::get("/issues"))
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(ctx.mock.calls_to(Method::Post, "/auth/refresh-token"), 1);
    // Two attempts on the resource: original plus exactly one retry
    assert_eq!(ctx.mock.calls_to(Method::Get, "/issues"), 2);
    assert!(!ctx.tokens.has_tokens());
}

#[tokio::test]
async fn test_missing_refresh_token_skips_network() {
    let ctx = TestContext::new();
    ctx.tokens.set_access_token("access-1");
    ctx.mock.respond_with(
        Method::Get,
        "/issues",
        ApiResponse::json_value(401, &expired_body()),
    );

    let session = ctx.client.session();
    let err = session
        .execute(ApiRequest::get("/issues"))
        .await
        .unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(ctx.mock.calls_to(Method::Post, "/auth/refresh-token"), 0);
}

#[tokio::test]
async fn test_refresh_failure_rejects_all_parked_requests() {
    let ctx = TestContext::signed_in("access-1", "refresh-1");
    script_guarded_issues(&ctx, "never-issued");

    ctx.mock.respond_with_delay(
        Method::Post,
        "/auth/refresh-token",
        ApiResponse::json_value(403, &serde_json::json!({ "message": "Invalid refresh token" })),
        Duration::from_millis(50),
    );

    let session = ctx.client.session();
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.execute(ApiRequest::get("/issues")).await })
        })
        .collect();

    for task in tasks {
        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_auth_expired());
    }

    assert_eq!(ctx.mock.calls_to(Method::Post, "/auth/refresh-token"), 1);
    assert!(!ctx.tokens.has_tokens());
}

#[tokio::test]
async fn test_refresh_network_failure_preserves_session() {
    let ctx = TestContext::signed_in("access-1", "refresh-1");
    ctx.mock.respond_with(
        Method::Get,
        "/issues",
        ApiResponse::json_value(401, &expired_body()),
    );
    ctx.mock
        .fail_with(Method::Post, "/auth/refresh-token", TransportError::Timeout);

    let session = ctx.client.session();
    let err = session
        .execute(ApiRequest::get("/issues"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    // Connectivity problems are not an auth verdict
    assert!(ctx.tokens.has_tokens());
}

#[tokio::test]
async fn test_refresh_routes_by_token_role() {
    let official = jwt_with_role("OFFICIAL");
    let ctx = TestContext::signed_in(&official, "refresh-1");
    script_guarded_issues(&ctx, "access-2");

    ctx.mock.respond_with(
        Method::Post,
        "/auth/official/refresh-token",
        ApiResponse::json_value(200, &refresh_ok("access-2", "refresh-2")),
    );

    let session = ctx.client.session();
    session.execute(ApiRequest::get("/issues")).await.unwrap();

    assert_eq!(
        ctx.mock.calls_to(Method::Post, "/auth/official/refresh-token"),
        1
    );
    assert_eq!(ctx.mock.calls_to(Method::Post, "/auth/refresh-token"), 0);
}

#[tokio::test]
async fn test_sequential_expiries_refresh_independently() {
    let ctx = TestContext::signed_in("access-1", "refresh-1");

    // Tokens expire twice over the test; each storm gets its own refresh
    let counter = Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter_clone = counter.clone();
    ctx.mock
        .respond_with_fn(Method::Post, "/auth/refresh-token", move |_| {
            let n = counter_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            ApiResponse::json_value(
                200,
                &refresh_ok(&format!("access-{}", n + 1), "refresh-1"),
            )
        });

    ctx.mock.respond_with_fn(Method::Get, "/issues", |req| {
        match req.bearer.as_deref() {
            Some("access-2") | Some("access-3") => {
                ApiResponse::json_value(200, &serde_json::json!([]))
            }
            _ => ApiResponse::json_value(401, &expired_body()),
        }
    });

    let session = ctx.client.session();
    session.execute(ApiRequest::get("/issues")).await.unwrap();
    assert_eq!(ctx.tokens.access_token().as_deref(), Some("access-2"));

    // Simulate the server invalidating access-2
    ctx.tokens.set_access_token("access-1");
    session.execute(ApiRequest::get("/issues")).await.unwrap();

    assert_eq!(ctx.mock.calls_to(Method::Post, "/auth/refresh-token"), 2);
}
