/// Untrusted JWT payload decode
///
/// Decodes the middle segment of a JWT without verifying the signature.
/// The result is used for UI hinting and for routing to the role-scoped
/// refresh endpoint, never for authorization decisions, which belong to
/// the server.
///
/// Malformed input decodes to `None`; this function never panics.
///
/// # Example
///
/// ```
/// use gramsetu_client::token::claims::decode_unverified;
///
/// // A syntactically valid but unsigned token still decodes
/// let claims = decode_unverified("not-a-jwt");
/// assert!(claims.is_none());
/// ```
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::Deserialize;

use crate::models::UserType;

/// Claims extracted from a JWT payload, unverified
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// User record ID
    #[serde(default)]
    pub id: Option<String>,

    /// Role claim, kept raw to tolerate unknown values
    #[serde(default, rename = "userType")]
    pub user_type: Option<String>,

    /// Expiration (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Parses the role claim into a known user type
    pub fn role(&self) -> Option<UserType> {
        self.user_type.as_deref().and_then(UserType::parse)
    }

    /// Whether the token's expiration has passed (display hint only)
    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => Utc::now().timestamp() >= exp,
            None => false,
        }
    }
}

/// Decodes a JWT payload without signature verification
///
/// Returns `None` for anything that is not a three-segment token with a
/// base64url-encoded JSON payload.
pub fn decode_unverified(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    let _signature = segments.next()?;

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an unsigned token with the given payload, for decode tests
    pub(crate) fn make_token(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.sig", header, body)
    }

    #[test]
    fn test_decode_extracts_id_and_role() {
        let token = make_token(serde_json::json!({
            "id": "u-42",
            "userType": "OFFICIAL",
            "exp": 4_102_444_800i64
        }));

        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.id.as_deref(), Some("u-42"));
        assert_eq!(claims.role(), Some(UserType::Official));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_decode_expired_token() {
        let token = make_token(serde_json::json!({ "id": "u-1", "exp": 1_000_000i64 }));
        let claims = decode_unverified(&token).unwrap();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_decode_tolerates_unknown_role() {
        let token = make_token(serde_json::json!({ "userType": "ROBOT" }));
        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_unverified("").is_none());
        assert!(decode_unverified("one.two").is_none());
        assert!(decode_unverified("a.!!!.c").is_none());
        assert!(decode_unverified("opaque-token").is_none());
    }
}
