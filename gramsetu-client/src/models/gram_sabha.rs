/// Gram Sabha meeting models
///
/// A Gram Sabha is a scheduled village assembly: an agenda derived from
/// the issue summaries, a roster of attendances and invited guests, and
/// per-user RSVPs tracked in a separate collection. List endpoints return
/// the meeting with references as plain IDs; the detail endpoint populates
/// `scheduledById`, `panchayatId`, and agenda `linkedIssues`, which is why
/// those fields are [`DocRef`]s.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AgendaItem, Attachment, DocRef};

/// Lifecycle status of a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Cancelled,
    Unscheduled,
    Concluded,
    InProgress,
    Rescheduled,
}

/// Verdict recorded for a single attendee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// One check-in on a meeting's attendance roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,

    /// How the attendee was verified, for example face recognition
    #[serde(default)]
    pub verification_method: Option<String>,

    pub status: AttendanceStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    /// Attending user; the roster endpoint populates name and demographics
    #[serde(default)]
    pub user_id: Option<DocRef>,
}

/// Non-member invited to a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub name: String,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

/// RSVP answer a user can give for an upcoming meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpStatus {
    Confirmed,
    Declined,
    Maybe,
}

/// A user's RSVP record for one meeting
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    pub gram_sabha_id: String,

    pub user_id: String,

    pub status: RsvpStatus,

    #[serde(default)]
    pub comments: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-status RSVP tally attached to upcoming-meeting listings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RsvpCounts {
    #[serde(default)]
    pub confirmed: u64,

    #[serde(default)]
    pub declined: u64,

    #[serde(default)]
    pub maybe: u64,
}

/// Full RSVP statistics for one meeting
///
/// `no_response` is derived server-side as registered users minus all
/// recorded answers; `total` is the panchayat's registered user count.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RsvpStats {
    #[serde(default)]
    pub confirmed: u64,

    #[serde(default)]
    pub declined: u64,

    #[serde(default)]
    pub maybe: u64,

    #[serde(default)]
    pub no_response: u64,

    #[serde(default)]
    pub total: u64,
}

/// Quorum report for one meeting
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    #[serde(default)]
    pub total_registered: u64,

    #[serde(default)]
    pub total_voters: u64,

    #[serde(default)]
    pub present: u64,

    #[serde(default)]
    pub quorum_required: u64,

    #[serde(default)]
    pub quorum_met: bool,
}

/// Attendance export projection of a past meeting
///
/// Returned by the roster endpoint with attendee names and the
/// panchayat's administrative location populated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRoster {
    #[serde(default)]
    pub attendances: Vec<Attendance>,

    #[serde(default)]
    pub guests: Vec<Guest>,

    #[serde(default)]
    pub panchayat_id: Option<DocRef>,
}

/// A Gram Sabha meeting
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GramSabha {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub agenda: Vec<AgendaItem>,

    #[serde(default)]
    pub scheduled_duration_hours: Option<f64>,

    #[serde(default)]
    pub meeting_link: Option<String>,

    #[serde(default)]
    pub status: MeetingStatus,

    #[serde(default)]
    pub minutes: Option<String>,

    #[serde(default)]
    pub meeting_notes: Option<String>,

    #[serde(default)]
    pub recording_link: Option<String>,

    #[serde(default)]
    pub actual_duration_minutes: Option<f64>,

    #[serde(default)]
    pub transcript: Option<String>,

    #[serde(default)]
    pub conclusion: Option<String>,

    /// Conferencing vendor payload, passed through untyped
    #[serde(default)]
    pub jio_meet_data: Option<serde_json::Value>,

    /// Issues brought before the assembly
    #[serde(default)]
    pub issues: Vec<DocRef>,

    #[serde(default)]
    pub attendances: Vec<Attendance>,

    #[serde(default)]
    pub guests: Vec<Guest>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub panchayat_id: Option<DocRef>,

    #[serde(default)]
    pub scheduled_by_id: Option<DocRef>,

    /// Present only on the upcoming-meetings listing
    #[serde(default)]
    pub rsvp_counts: Option<RsvpCounts>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for scheduling a new meeting
///
/// The server derives a title from the panchayat name and date when none
/// is given, and requires at least one agenda item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDraft {
    pub panchayat_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub date_time: DateTime<Utc>,

    pub location: String,

    pub scheduled_duration_hours: f64,

    pub agenda: Vec<AgendaItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

/// Partial update of an existing meeting
///
/// Unset fields are omitted from the request body and left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_duration_hours: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agenda: Option<Vec<AgendaItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MeetingStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}
