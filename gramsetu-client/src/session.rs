/// Authenticated session with transparent token refresh
///
/// Every API call goes through [`Session::execute`], which attaches the
/// stored access token and handles expiry transparently:
///
/// 1. The request is sent with the current access token.
/// 2. A 401 marked as expiry triggers a token refresh. Concurrent requests
///    that hit expiry while a refresh is in flight wait on the same refresh
///    instead of starting their own.
/// 3. The original request is retried exactly once with the fresh token.
/// 4. If the refresh fails, or the retry is rejected again, stored tokens
///    are cleared and [`ClientError::AuthExpired`] tells the caller which
///    login portal to send the user to.
///
/// Auth endpoints (login, refresh, password reset) are exempt from the
/// protocol so a failed login is reported as-is instead of triggering a
/// pointless refresh.
///
/// A network failure during refresh is reported as [`ClientError::Network`]
/// and leaves the stored tokens untouched; the session may still be viable
/// once connectivity returns.
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::Deserialize;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{ClientError, ClientResult};
use crate::models::UserType;
use crate::token::{claims, TokenStore};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Login entry point to direct the user to after session teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPortal {
    /// Shared portal for admins and officials
    Admin,

    /// Citizen-facing portal
    Citizen,
}

impl LoginPortal {
    /// Portal for a (possibly unknown) user role
    ///
    /// Unknown roles fall back to the citizen portal.
    pub fn for_user_type(user_type: Option<UserType>) -> Self {
        match user_type {
            Some(UserType::Admin) | Some(UserType::Official) => LoginPortal::Admin,
            _ => LoginPortal::Citizen,
        }
    }

    /// Portal name as used in routes
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginPortal::Admin => "admin",
            LoginPortal::Citizen => "citizen",
        }
    }
}

impl fmt::Display for LoginPortal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a 401 body that signals token expiry
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    expired: bool,

    #[serde(default)]
    message: Option<String>,
}

type RefreshFuture = Shared<BoxFuture<'static, Result<String, ClientError>>>;

/// Authenticated request executor
///
/// Cheap to share behind an `Arc`; all state is interior.
pub struct Session {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,

    // At most one refresh in flight; parked requests await a clone of it
    refresh_slot: Mutex<Option<RefreshFuture>>,
}

impl Session {
    /// Creates a session over the given transport and token store
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Session {
            transport,
            tokens,
            refresh_slot: Mutex::new(None),
        }
    }

    /// The token store backing this session
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }

    /// Whether a path belongs to the auth surface and skips the refresh
    /// protocol
    pub fn is_exempt(path: &str) -> bool {
        path.contains("/refresh-token")
            || path.contains("/login")
            || path.contains("/face-login")
            || path.contains("/forgot-password")
            || path.contains("/reset-password")
    }

    fn is_expiry_401(response: &ApiResponse) -> bool {
        if response.status != 401 {
            return false;
        }
        match response.json::<AuthErrorBody>() {
            Ok(body) => {
                body.expired
                    || body
                        .message
                        .map(|m| m.to_lowercase().contains("expired"))
                        .unwrap_or(false)
            }
            Err(_) => false,
        }
    }

    fn is_invalid_token_401(response: &ApiResponse) -> bool {
        response.status == 401
            && response
                .message()
                .map(|m| m.to_lowercase().contains("invalid token"))
                .unwrap_or(false)
    }

    /// Portal for the currently stored access token's role
    fn portal(&self) -> LoginPortal {
        let role = self
            .tokens
            .access_token()
            .and_then(|t| claims::decode_unverified(&t))
            .and_then(|c| c.role());
        LoginPortal::for_user_type(role)
    }

    fn classify(response: ApiResponse) -> ClientResult<ApiResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            let message = response.message();
            Err(ClientError::http(response.status, message))
        }
    }

    /// Clears stored tokens and reports session expiry
    fn teardown(&self) -> ClientError {
        let portal = self.portal();
        self.tokens.clear();
        tracing::warn!(portal = %portal, "Session expired, tokens cleared");
        ClientError::AuthExpired { portal }
    }

    /// Executes a request under the session's refresh protocol
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] for non-success responses,
    /// [`ClientError::Network`] for transport failures, and
    /// [`ClientError::AuthExpired`] when the session cannot be kept alive.
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        if Self::is_exempt(&request.path) {
            // Auth paths still carry the token when one is stored, except the
            // refresh exchange itself
            let request = if request.path.contains("/refresh-token") {
                request
            } else {
                let token = self.tokens.access_token();
                request.bearer(token)
            };
            let response = self.transport.send(request).await?;
            return Self::classify(response);
        }

        let token = self.tokens.access_token();
        let first = self
            .transport
            .send(request.clone().bearer(token.clone()))
            .await?;

        if Self::is_expiry_401(&first) {
            tracing::info!(path = %request.path, "Access token expired, refreshing");
            let fresh = self.refreshed_token(token.as_deref()).await?;

            let retried = self.transport.send(request.bearer(Some(fresh))).await?;
            if retried.status == 401 {
                // The fresh token was rejected too; do not refresh again
                return Err(self.teardown());
            }
            return Self::classify(retried);
        }

        if Self::is_invalid_token_401(&first) {
            return Err(self.teardown());
        }

        Self::classify(first)
    }

    /// Returns a valid access token, refreshing at most once
    ///
    /// `stale` is the token the caller just saw rejected. If the stored
    /// token already differs, another request completed a refresh in the
    /// meantime and the stored token is returned without a network call.
    async fn refreshed_token(&self, stale: Option<&str>) -> ClientResult<String> {
        if let Some(current) = self.tokens.access_token() {
            if stale != Some(current.as_str()) {
                return Ok(current);
            }
        }

        let future = {
            let mut slot = self
                .refresh_slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match &*slot {
                Some(in_flight) => in_flight.clone(),
                None => {
                    let fut = Self::run_refresh(
                        Arc::clone(&self.transport),
                        Arc::clone(&self.tokens),
                        self.portal(),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        let result = future.clone().await;

        // Whoever finishes last clears the slot so the next expiry starts a
        // fresh attempt
        let mut slot = self
            .refresh_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().map(|f| f.ptr_eq(&future)).unwrap_or(false) {
            *slot = None;
        }

        result
    }

    /// Performs the actual refresh exchange
    ///
    /// Owns `Arc` clones so the future can be shared across callers without
    /// borrowing the session.
    async fn run_refresh(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenStore>,
        portal: LoginPortal,
    ) -> Result<String, ClientError> {
        let refresh_token = match tokens.refresh_token() {
            Some(t) => t,
            None => {
                tokens.clear();
                tracing::warn!("No refresh token available, session over");
                return Err(ClientError::AuthExpired { portal });
            }
        };

        // Role-scoped endpoint when the role is known, legacy endpoint
        // otherwise
        let role = tokens
            .access_token()
            .and_then(|t| claims::decode_unverified(&t))
            .and_then(|c| c.role());
        let path = match role {
            Some(role) => format!("/auth/{}/refresh-token", role.route_segment()),
            None => "/auth/refresh-token".to_string(),
        };

        let request =
            ApiRequest::post(path, serde_json::json!({ "refreshToken": &refresh_token }));

        // Transport failure is not an auth verdict: keep the tokens
        let response = transport.send(request).await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Token refresh rejected");
            tokens.clear();
            return Err(ClientError::AuthExpired { portal });
        }

        // A 2xx refresh whose body is not a usable envelope is still a
        // refresh failure: the session cannot be kept alive on it
        let data = response
            .json::<crate::models::ApiEnvelope<crate::models::AuthData>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
            .and_then(|envelope| envelope.into_data());
        let data = match data {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh response is unusable");
                tokens.clear();
                return Err(ClientError::AuthExpired { portal });
            }
        };

        let access = match data.token {
            Some(t) => t,
            None => {
                tokens.clear();
                return Err(ClientError::AuthExpired { portal });
            }
        };

        let rotated = data.refresh_token.unwrap_or(refresh_token);
        tokens.set_tokens(&access, &rotated);
        tracing::info!("Access token refreshed");

        Ok(access)
    }
}
