/// Authentication API
///
/// Credential login for admins and officials, the two-step face login for
/// citizens, token refresh, and password reset. Login and refresh responses
/// share the `{ success, data: { token, refreshToken, user } }` envelope;
/// this module enforces that the tokens are actually present before
/// persisting them, and stamps the role on the returned user because the
/// server omits it.
///
/// All paths here are exempt from the session refresh protocol: a failed
/// login is reported as-is instead of triggering a refresh.
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::models::{ApiEnvelope, AuthData, TokenPair, User, UserType};
use crate::session::{LoginPortal, Session};
use crate::transport::ApiRequest;

/// Username/password credentials for admin and official login
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginCredentials {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl LoginCredentials {
    /// Convenience constructor
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        LoginCredentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Input for the citizen face-login flow
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CitizenLoginRequest {
    /// Last four digits of the voter ID
    #[validate(length(equal = 4, message = "voter id suffix must be exactly 4 characters"))]
    pub voter_id_last_four: String,

    /// Panchayat the citizen is registered in
    #[validate(length(min = 1, message = "panchayat id must not be empty"))]
    pub panchayat_id: String,

    /// Face embedding captured on the client
    pub face_descriptor: Vec<f64>,
}

/// Result of a completed login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Issued token pair, already persisted to the store
    pub tokens: TokenPair,

    /// Signed-in user with the role stamped
    pub user: User,
}

/// Candidate-matching outcome of the face-login init step
///
/// The server answers with a single candidate or, when the voter ID suffix
/// is ambiguous within the panchayat, several. Both shapes feed into the
/// verify step.
#[derive(Debug, Clone)]
pub enum FaceLoginOutcome {
    /// Exactly one candidate matched the init request
    Single {
        user_id: String,
        security_token: String,
    },

    /// Several candidates matched; verification disambiguates by face
    Multiple {
        user_ids: Vec<String>,
        security_tokens: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaceLoginInitData {
    #[serde(default)]
    user_id: Option<String>,

    #[serde(default)]
    security_token: Option<String>,

    #[serde(default)]
    potential_user_ids: Option<Vec<String>>,

    #[serde(default)]
    user_security_tokens: Option<Vec<String>>,
}

/// Authentication endpoints
pub struct AuthApi {
    session: Arc<Session>,
}

impl AuthApi {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        AuthApi { session }
    }

    /// Parses a login/refresh envelope and requires the full token+user set
    fn require_login_data(data: AuthData) -> ClientResult<(TokenPair, User)> {
        match (data.token, data.refresh_token, data.user) {
            (Some(token), Some(refresh_token), Some(user)) => Ok((
                TokenPair {
                    token,
                    refresh_token,
                },
                user,
            )),
            _ => Err(ClientError::MalformedResponse(
                "login response is missing tokens or user data".to_string(),
            )),
        }
    }

    async fn credential_login(
        &self,
        role: UserType,
        credentials: &LoginCredentials,
    ) -> ClientResult<LoginOutcome> {
        credentials.validate()?;

        let path = format!("/auth/{}/login", role.route_segment());
        let body = serde_json::json!({
            "username": credentials.username,
            "password": credentials.password,
        });

        let response = self.session.execute(ApiRequest::post(path, body)).await?;
        let data = response
            .json::<ApiEnvelope<AuthData>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?
            .into_data()?;

        let (tokens, mut user) = Self::require_login_data(data)?;
        user.user_type = Some(role);

        self.session
            .token_store()
            .set_tokens(&tokens.token, &tokens.refresh_token);
        tracing::info!(role = %role, user_id = %user.id, "Login succeeded");

        Ok(LoginOutcome { tokens, user })
    }

    /// Signs in a platform administrator
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for empty credentials,
    /// [`ClientError::Http`] for rejected logins, and
    /// [`ClientError::MalformedResponse`] when the response is missing its
    /// tokens or user.
    pub async fn admin_login(&self, credentials: &LoginCredentials) -> ClientResult<LoginOutcome> {
        self.credential_login(UserType::Admin, credentials).await
    }

    /// Signs in a panchayat official
    pub async fn official_login(
        &self,
        credentials: &LoginCredentials,
    ) -> ClientResult<LoginOutcome> {
        self.credential_login(UserType::Official, credentials).await
    }

    /// Signs in with username/password without knowing the role
    ///
    /// Tries the admin endpoint first and falls back to the official
    /// endpoint when the server rejects the credentials. Kept for backward
    /// compatibility with callers that predate the split login portals.
    ///
    /// Network and validation failures are reported immediately; only a
    /// server-side rejection triggers the fallback.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<LoginOutcome> {
        match self.admin_login(credentials).await {
            Ok(outcome) => Ok(outcome),
            Err(ClientError::Network(e)) => Err(ClientError::Network(e)),
            Err(ClientError::Validation(e)) => Err(ClientError::Validation(e)),
            Err(_) => self.official_login(credentials).await,
        }
    }

    /// Signs in a citizen via the two-step face-login flow
    ///
    /// Step one submits the voter ID suffix and panchayat and receives one
    /// or more candidate users with per-candidate security tokens. Step two
    /// submits the face descriptor against the candidates; the server picks
    /// the matching user and issues tokens.
    pub async fn citizen_login(&self, request: &CitizenLoginRequest) -> ClientResult<LoginOutcome> {
        request.validate()?;

        let init_body = serde_json::json!({
            "voterIdLastFour": request.voter_id_last_four,
            "panchayatId": request.panchayat_id,
        });
        let init_response = self
            .session
            .execute(ApiRequest::post("/auth/citizen/face-login/init", init_body))
            .await?;

        let init = init_response
            .json::<ApiEnvelope<FaceLoginInitData>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?
            .into_data()?;

        let candidates = match init {
            FaceLoginInitData {
                user_id: Some(user_id),
                security_token: Some(security_token),
                ..
            } => FaceLoginOutcome::Single {
                user_id,
                security_token,
            },
            FaceLoginInitData {
                potential_user_ids: Some(user_ids),
                user_security_tokens: Some(security_tokens),
                ..
            } => FaceLoginOutcome::Multiple {
                user_ids,
                security_tokens,
            },
            _ => {
                return Err(ClientError::MalformedResponse(
                    "face-login init response has no candidates".to_string(),
                ))
            }
        };

        let verify_body = match &candidates {
            FaceLoginOutcome::Single {
                user_id,
                security_token,
            } => serde_json::json!({
                "userId": user_id,
                "securityToken": security_token,
                "faceDescriptor": request.face_descriptor,
            }),
            FaceLoginOutcome::Multiple {
                user_ids,
                security_tokens,
            } => serde_json::json!({
                "potentialUserIds": user_ids,
                "userSecurityTokens": security_tokens,
                "faceDescriptor": request.face_descriptor,
            }),
        };

        let verify_response = self
            .session
            .execute(ApiRequest::post(
                "/auth/citizen/face-login/verify",
                verify_body,
            ))
            .await?;
        let data = verify_response
            .json::<ApiEnvelope<AuthData>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?
            .into_data()?;

        let (tokens, mut user) = Self::require_login_data(data)?;
        user.user_type = Some(UserType::Citizen);

        self.session
            .token_store()
            .set_tokens(&tokens.token, &tokens.refresh_token);
        tracing::info!(user_id = %user.id, "Citizen login succeeded");

        Ok(LoginOutcome { tokens, user })
    }

    /// Explicitly exchanges the stored refresh token for a new pair
    ///
    /// The role-scoped endpoint is used when `user_type` is known, the
    /// legacy endpoint otherwise. Server-side refresh token rotation is
    /// honored; without rotation the old refresh token is kept.
    pub async fn refresh(&self, user_type: Option<UserType>) -> ClientResult<TokenPair> {
        let store = self.session.token_store();
        let refresh_token = store.refresh_token().ok_or(ClientError::AuthExpired {
            portal: LoginPortal::for_user_type(user_type),
        })?;

        let path = match user_type {
            Some(role) => format!("/auth/{}/refresh-token", role.route_segment()),
            None => "/auth/refresh-token".to_string(),
        };
        let body = serde_json::json!({ "refreshToken": &refresh_token });

        let response = self.session.execute(ApiRequest::post(path, body)).await?;
        let data = response
            .json::<ApiEnvelope<AuthData>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?
            .into_data()?;

        let token = data.token.ok_or_else(|| {
            ClientError::MalformedResponse("refresh response is missing token".to_string())
        })?;
        let pair = TokenPair {
            token,
            refresh_token: data.refresh_token.unwrap_or(refresh_token),
        };

        store.set_tokens(&pair.token, &pair.refresh_token);
        Ok(pair)
    }

    fn password_path(prefix: &str, user_type: Option<UserType>) -> String {
        match user_type {
            Some(UserType::Admin) => format!("/auth/admin/{}", prefix),
            Some(UserType::Official) => format!("/auth/official/{}", prefix),
            _ => format!("/auth/{}", prefix),
        }
    }

    /// Requests a password reset email for an admin or official account
    ///
    /// Returns the server's acknowledgement message, when it sends one.
    pub async fn forgot_password(
        &self,
        email: &str,
        user_type: Option<UserType>,
    ) -> ClientResult<Option<String>> {
        let path = Self::password_path("forgot-password", user_type);
        let body = serde_json::json!({ "email": email });

        let response = self.session.execute(ApiRequest::post(path, body)).await?;
        Ok(response.message())
    }

    /// Completes a password reset using the emailed token
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
        user_type: Option<UserType>,
    ) -> ClientResult<Option<String>> {
        let path = format!(
            "{}/{}",
            Self::password_path("reset-password", user_type),
            reset_token
        );
        let body = serde_json::json!({ "password": password });

        let response = self.session.execute(ApiRequest::post(path, body)).await?;
        Ok(response.message())
    }

    /// Signs out locally by discarding both stored tokens
    pub fn logout(&self) {
        self.session.token_store().clear();
        tracing::info!("Logged out, tokens cleared");
    }
}
