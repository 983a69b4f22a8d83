/// Common test utilities for integration tests
///
/// Provides a scripted-client context so tests exercise the real session
/// and API layers against a deterministic mock transport:
/// - A shared `MockTransport` for scripting routes and counting calls
/// - An in-memory token store pre-loadable with a token pair
/// - Builders for the JSON bodies the live API produces
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::sync::Arc;

use gramsetu_client::token::{MemoryTokenStore, TokenStore};
use gramsetu_client::transport::MockTransport;
use gramsetu_client::Client;

/// Test context wiring a client to a scripted transport
pub struct TestContext {
    pub mock: Arc<MockTransport>,
    pub tokens: Arc<MemoryTokenStore>,
    pub client: Client,
}

impl TestContext {
    /// Creates a context with no stored tokens
    pub fn new() -> Self {
        let mock = Arc::new(MockTransport::new());
        let tokens = Arc::new(MemoryTokenStore::new());
        let client = Client::with_parts(mock.clone(), tokens.clone());
        TestContext {
            mock,
            tokens,
            client,
        }
    }

    /// Creates a context with a token pair already stored
    pub fn signed_in(access: &str, refresh: &str) -> Self {
        let ctx = TestContext::new();
        ctx.tokens.set_tokens(access, refresh);
        ctx
    }
}

/// Builds an unsigned JWT whose payload carries the given role claim
pub fn jwt_with_role(role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "id": "u-1", "userType": role, "exp": 4_102_444_800i64 })
            .to_string()
            .as_bytes(),
    );
    format!("{}.{}.sig", header, payload)
}

/// 401 body marking the access token as expired
pub fn expired_body() -> serde_json::Value {
    serde_json::json!({ "expired": true, "message": "jwt expired" })
}

/// Successful refresh envelope issuing the given access token
pub fn refresh_ok(token: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": { "token": token, "refreshToken": refresh }
    })
}

/// Successful login envelope for the given user ID
pub fn login_ok(user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "token": "access-1",
            "refreshToken": "refresh-1",
            "user": { "_id": user_id, "name": "Asha", "panchayatId": "p-1" }
        }
    })
}
