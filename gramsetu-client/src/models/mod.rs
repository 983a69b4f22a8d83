/// REST resource DTOs
///
/// This module contains the data shapes exchanged with the GramSetu API.
/// All entities are ephemeral view models hydrated from server responses;
/// the client holds no invariants over them beyond optional-field tolerance.
///
/// # Models
///
/// - `user`: registered members and their roles
/// - `issue`: reported issues, attachments, and transcription state
/// - `summary`: per-panchayat issue summaries and meeting agenda items
/// - `gram_sabha`: Gram Sabha meetings, attendance, and RSVPs
///
/// Wire names are camelCase, matching the upstream REST API.
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub mod gram_sabha;
pub mod issue;
pub mod summary;
pub mod user;

pub use gram_sabha::{
    Attendance, AttendanceStats, AttendanceStatus, GramSabha, Guest, MeetingDraft, MeetingPatch,
    MeetingRoster, MeetingStatus, Rsvp, RsvpCounts, RsvpStats, RsvpStatus,
};
pub use issue::{
    Attachment, Issue, IssueCategory, IssuePriority, IssueStatus, IssueSubcategory, MinimalIssue,
    Transcription, TranscriptionStatus,
};
pub use summary::{AgendaItem, AgendaItemOrigin, IssueSummary};
pub use user::{User, UserType};

/// Reference to another record, either a bare ID or a populated object
///
/// Several endpoints populate Mongo references on read (for example the
/// meeting detail endpoint expands `scheduledById` to `{ _id, name }`)
/// while others return the plain ID string. Callers that only need the ID
/// should go through [`DocRef::id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocRef {
    /// Plain record ID
    Id(String),

    /// Populated sub-document, shape depends on the endpoint's projection
    Populated(serde_json::Value),
}

impl DocRef {
    /// The referenced record's ID, when recoverable
    pub fn id(&self) -> Option<&str> {
        match self {
            DocRef::Id(id) => Some(id),
            DocRef::Populated(value) => value.get("_id").and_then(|v| v.as_str()),
        }
    }
}

/// Standard response envelope used by most endpoints
///
/// The API wraps payloads as `{ "success": bool, "message": ..., "data": ... }`.
/// Use [`ApiEnvelope::into_data`] to unwrap the payload or surface a typed
/// error when the envelope reports failure or the payload is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the server reports the operation as successful
    #[serde(default)]
    pub success: bool,

    /// Optional human-readable message
    #[serde(default)]
    pub message: Option<String>,

    /// Payload, present on success
    #[serde(default = "none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, converting envelope-level failure into an error
    pub fn into_data(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::MalformedResponse(
                self.message
                    .unwrap_or_else(|| "API returned an unsuccessful response".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ClientError::MalformedResponse("response is missing data".to_string()))
    }
}

/// Access/refresh token pair as issued by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token
    pub token: String,

    /// Long-lived refresh token
    pub refresh_token: String,
}

/// Payload of login and refresh responses
///
/// Every field is optional on the wire; the auth API decides which are
/// mandatory for a given operation (login requires all three, refresh only
/// the access token).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    /// New access token
    pub token: Option<String>,

    /// New refresh token (absent when the server does not rotate it)
    pub refresh_token: Option<String>,

    /// Signed-in user, returned by login endpoints
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_data() {
        let envelope: ApiEnvelope<String> =
            serde_json::from_value(serde_json::json!({ "success": true, "data": "hello" }))
                .unwrap();
        assert_eq!(envelope.into_data().unwrap(), "hello");
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let envelope: ApiEnvelope<String> = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "No summary found"
        }))
        .unwrap();

        let err = envelope.into_data().unwrap_err();
        assert!(err.to_string().contains("No summary found"));
    }

    #[test]
    fn test_doc_ref_recovers_id() {
        let plain: DocRef = serde_json::from_value(serde_json::json!("u-1")).unwrap();
        assert_eq!(plain.id(), Some("u-1"));

        let populated: DocRef =
            serde_json::from_value(serde_json::json!({ "_id": "u-2", "name": "Asha" })).unwrap();
        assert_eq!(populated.id(), Some("u-2"));
    }

    #[test]
    fn test_envelope_missing_data_is_error() {
        let envelope: ApiEnvelope<String> =
            serde_json::from_value(serde_json::json!({ "success": true })).unwrap();
        assert!(envelope.into_data().is_err());
    }
}
