/// Error handling for the client SDK
///
/// This module provides the unified error type returned by every API call.
/// Callers match on `ClientError` to distinguish transport failures,
/// structured HTTP errors, malformed payloads, and session expiry.
///
/// # Taxonomy
///
/// - `Network`: the request never produced a response (timeout, connect
///   failure). The session is left untouched.
/// - `Http`: the server responded with a non-2xx status. The `message` is
///   taken from the structured `{message}` body when present.
/// - `MalformedResponse`: the response arrived but did not have the expected
///   shape (e.g. a login payload missing its tokens).
/// - `AuthExpired`: the session could not be kept alive (refresh failed or no
///   refresh token was available). Tokens have been cleared; the caller
///   should send the user to the indicated login portal.
/// - `Validation`: an outgoing request failed field-level validation before
///   any network traffic happened.
///
/// Errors are `Clone` so that a single refresh failure can be delivered to
/// every request that was parked behind the in-flight refresh.
use crate::session::LoginPortal;
use crate::token::TokenStoreError;
use crate::transport::TransportError;

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Unified client error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Request failed before a response was received
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// Server responded with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message from the structured error body, or a generic fallback
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Session expired and could not be refreshed
    ///
    /// Stored tokens have already been cleared. `portal` names the login
    /// entry point appropriate for the role that was signed in.
    #[error("Authentication expired; sign in again via the {portal} portal")]
    AuthExpired {
        /// Role-appropriate login entry point
        portal: LoginPortal,
    },

    /// Outgoing request failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Persistent token store could not be opened
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

impl ClientError {
    /// Returns true when the error means the user must sign in again
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired { .. })
    }

    /// Builds an `Http` error from a status code and optional message body
    pub fn http(status: u16, message: Option<String>) -> Self {
        ClientError::Http {
            status,
            message: message.unwrap_or_else(|| "Request failed".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ClientError::http(404, Some("Issue not found".to_string()));
        assert_eq!(err.to_string(), "HTTP 404: Issue not found");

        let err = ClientError::http(500, None);
        assert_eq!(err.to_string(), "HTTP 500: Request failed");
    }

    #[test]
    fn test_auth_expired_predicate() {
        let err = ClientError::AuthExpired {
            portal: LoginPortal::Citizen,
        };
        assert!(err.is_auth_expired());

        let err = ClientError::MalformedResponse("missing data".to_string());
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn test_errors_are_cloneable() {
        // Refresh failures are fanned out to every parked request, so the
        // error type must support cloning.
        let err = ClientError::AuthExpired {
            portal: LoginPortal::Admin,
        };
        let copy = err.clone();
        assert!(copy.is_auth_expired());
    }
}
