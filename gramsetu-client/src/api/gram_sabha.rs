/// Gram Sabha meetings API
///
/// Meeting CRUD, the attendance roster, and RSVPs. The response shapes are
/// uneven across this surface: meeting listings and the detail endpoint
/// return bare objects, creation and everything RSVP-related use the
/// `{ success, data }` envelope, and the attendance statistics endpoint
/// returns a flat body with the stats beside the `success` flag.
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::models::{
    ApiEnvelope, Attendance, AttendanceStats, GramSabha, MeetingDraft, MeetingPatch,
    MeetingRoster, MeetingStatus, Rsvp, RsvpStats, RsvpStatus,
};
use crate::session::Session;
use crate::transport::{ApiRequest, ApiResponse, Method};

/// Meeting endpoints
pub struct GramSabhaApi {
    session: Arc<Session>,
}

impl GramSabhaApi {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        GramSabhaApi { session }
    }

    fn bare<T: serde::de::DeserializeOwned>(response: &ApiResponse) -> ClientResult<T> {
        response
            .json::<T>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    async fn fetch_list(&self, path: String) -> ClientResult<Vec<GramSabha>> {
        let response = self.session.execute(ApiRequest::get(path)).await?;
        Self::bare(&response)
    }

    /// All meetings of a panchayat, newest first
    pub async fn fetch_for_panchayat(&self, panchayat_id: &str) -> ClientResult<Vec<GramSabha>> {
        self.fetch_list(format!("/gram-sabha/panchayat/{}", panchayat_id))
            .await
    }

    /// Upcoming meetings, each carrying its RSVP tally
    pub async fn fetch_upcoming(&self, panchayat_id: &str) -> ClientResult<Vec<GramSabha>> {
        self.fetch_list(format!("/gram-sabha/panchayat/{}/upcoming", panchayat_id))
            .await
    }

    /// The ten most recent past meetings
    pub async fn fetch_past(&self, panchayat_id: &str) -> ClientResult<Vec<GramSabha>> {
        self.fetch_list(format!("/gram-sabha/panchayat/{}/past", panchayat_id))
            .await
    }

    /// Today's meetings plus earlier ones still in progress
    pub async fn fetch_active(&self, panchayat_id: &str) -> ClientResult<Vec<GramSabha>> {
        self.fetch_list(format!("/gram-sabha/panchayat/{}/active", panchayat_id))
            .await
    }

    /// Fetches a single meeting with populated references
    ///
    /// The body is the bare meeting; agenda `linkedIssues` come back as
    /// issue projections rather than IDs.
    pub async fn fetch_by_id(&self, id: &str) -> ClientResult<GramSabha> {
        let response = self
            .session
            .execute(ApiRequest::get(format!("/gram-sabha/{}", id)))
            .await?;
        Self::bare(&response)
    }

    /// Schedules a new meeting
    pub async fn create(&self, draft: &MeetingDraft) -> ClientResult<GramSabha> {
        let body = serde_json::to_value(draft)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let response = self
            .session
            .execute(ApiRequest::post("/gram-sabha", body))
            .await?;

        Self::bare::<ApiEnvelope<GramSabha>>(&response)?.into_data()
    }

    /// Applies a partial update to a meeting the caller scheduled
    pub async fn update(&self, id: &str, patch: &MeetingPatch) -> ClientResult<GramSabha> {
        let body = serde_json::to_value(patch)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let response = self
            .session
            .execute(ApiRequest::patch(format!("/gram-sabha/{}", id), body))
            .await?;
        Self::bare(&response)
    }

    /// Moves a meeting to a new lifecycle status
    pub async fn update_status(&self, id: &str, status: MeetingStatus) -> ClientResult<GramSabha> {
        self.update(
            id,
            &MeetingPatch {
                status: Some(status),
                ..MeetingPatch::default()
            },
        )
        .await
    }

    /// Deletes a meeting, returning the deleted record
    pub async fn delete(&self, id: &str) -> ClientResult<GramSabha> {
        let response = self
            .session
            .execute(ApiRequest::new(
                Method::Delete,
                format!("/gram-sabha/{}", id),
            ))
            .await?;
        Self::bare(&response)
    }

    /// Records a check-in on a meeting's roster
    ///
    /// The server stamps the attending user from the authenticated
    /// official, so `entry.user_id` may be left unset.
    pub async fn add_attendance(&self, id: &str, entry: &Attendance) -> ClientResult<GramSabha> {
        let body = serde_json::to_value(entry)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let response = self
            .session
            .execute(ApiRequest::post(
                format!("/gram-sabha/{}/attendance", id),
                body,
            ))
            .await?;
        Self::bare(&response)
    }

    /// Attendance roster of a past meeting, for export
    pub async fn attendance_roster(&self, id: &str) -> ClientResult<MeetingRoster> {
        let response = self
            .session
            .execute(ApiRequest::get(format!("/gram-sabha/{}/attendance", id)))
            .await?;
        Self::bare(&response)
    }

    /// Quorum statistics for a meeting
    pub async fn attendance_stats(&self, id: &str) -> ClientResult<AttendanceStats> {
        let response = self
            .session
            .execute(ApiRequest::get(format!(
                "/gram-sabha/{}/attendance-stats",
                id
            )))
            .await?;
        Self::bare(&response)
    }

    /// Creates or replaces a user's RSVP for an upcoming meeting
    pub async fn submit_rsvp(
        &self,
        meeting_id: &str,
        user_id: &str,
        status: RsvpStatus,
        comments: Option<&str>,
    ) -> ClientResult<Rsvp> {
        let response = self
            .session
            .execute(ApiRequest::post(
                format!("/gram-sabha/{}/rsvp/{}", meeting_id, user_id),
                serde_json::json!({ "status": status, "comments": comments }),
            ))
            .await?;

        Self::bare::<ApiEnvelope<Rsvp>>(&response)?.into_data()
    }

    /// A user's current RSVP, `None` when they have not answered
    pub async fn rsvp_status(&self, meeting_id: &str, user_id: &str) -> ClientResult<Option<Rsvp>> {
        let response = self
            .session
            .execute(ApiRequest::get(format!(
                "/gram-sabha/{}/rsvp/{}",
                meeting_id, user_id
            )))
            .await?;

        let envelope = Self::bare::<ApiEnvelope<Rsvp>>(&response)?;
        if !envelope.success {
            return Err(ClientError::MalformedResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "RSVP lookup reported failure".to_string()),
            ));
        }
        Ok(envelope.data)
    }

    /// Full RSVP tally for a meeting, including non-responders
    pub async fn rsvp_stats(&self, meeting_id: &str) -> ClientResult<RsvpStats> {
        let response = self
            .session
            .execute(ApiRequest::get(format!(
                "/gram-sabha/{}/rsvp-stats",
                meeting_id
            )))
            .await?;

        Self::bare::<ApiEnvelope<RsvpStats>>(&response)?.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;
    use crate::token::MemoryTokenStore;
    use crate::transport::MockTransport;

    fn api_with(mock: Arc<MockTransport>) -> GramSabhaApi {
        let session = Arc::new(Session::new(mock, Arc::new(MemoryTokenStore::new())));
        GramSabhaApi::new(session)
    }

    fn meeting_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "_id": id,
            "title": "Monthly Gram Sabha",
            "dateTime": "2026-09-01T10:00:00Z",
            "location": "Panchayat Bhavan",
            "scheduledDurationHours": 2,
            "panchayatId": "p-1",
            "scheduledById": { "_id": "u-1", "name": "Sarpanch" }
        })
    }

    #[tokio::test]
    async fn test_panchayat_listing_is_bare_array() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Get,
            "/gram-sabha/panchayat/p-1",
            ApiResponse::json_value(
                200,
                &serde_json::json!([meeting_json("gs-1"), meeting_json("gs-2")]),
            ),
        );

        let api = api_with(mock);
        let meetings = api.fetch_for_panchayat("p-1").await.unwrap();

        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[1].id.as_deref(), Some("gs-2"));
    }

    #[tokio::test]
    async fn test_upcoming_listing_carries_rsvp_counts() {
        let mut meeting = meeting_json("gs-1");
        meeting["rsvpCounts"] =
            serde_json::json!({ "CONFIRMED": 7, "DECLINED": 1, "MAYBE": 2 });

        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Get,
            "/gram-sabha/panchayat/p-1/upcoming",
            ApiResponse::json_value(200, &serde_json::json!([meeting])),
        );

        let api = api_with(mock);
        let meetings = api.fetch_upcoming("p-1").await.unwrap();

        let counts = meetings[0].rsvp_counts.as_ref().unwrap();
        assert_eq!(counts.confirmed, 7);
        assert_eq!(counts.maybe, 2);
    }

    #[tokio::test]
    async fn test_create_unwraps_envelope() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Post,
            "/gram-sabha",
            ApiResponse::json_value(
                201,
                &serde_json::json!({ "success": true, "data": meeting_json("gs-9") }),
            ),
        );

        let api = api_with(mock.clone());
        let draft = MeetingDraft {
            panchayat_id: "p-1".to_string(),
            title: None,
            date_time: "2026-09-01T10:00:00Z".parse().unwrap(),
            location: "Panchayat Bhavan".to_string(),
            scheduled_duration_hours: 2.0,
            agenda: Vec::new(),
            meeting_link: None,
        };
        let meeting = api.create(&draft).await.unwrap();

        assert_eq!(meeting.id.as_deref(), Some("gs-9"));
        // Untitled drafts let the server derive a name
        let sent = mock.requests_to(Method::Post, "/gram-sabha");
        assert_eq!(sent[0].body.as_ref().unwrap().get("title"), None);
    }

    #[tokio::test]
    async fn test_status_patch_sends_only_status() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Patch,
            "/gram-sabha/gs-1",
            ApiResponse::json_value(200, &meeting_json("gs-1")),
        );

        let api = api_with(mock.clone());
        api.update_status("gs-1", MeetingStatus::InProgress)
            .await
            .unwrap();

        let sent = mock.requests_to(Method::Patch, "/gram-sabha/gs-1");
        assert_eq!(
            sent[0].body.as_ref().unwrap(),
            &serde_json::json!({ "status": "IN_PROGRESS" })
        );
    }

    #[tokio::test]
    async fn test_add_attendance_returns_updated_meeting() {
        let mut updated = meeting_json("gs-1");
        updated["attendances"] = serde_json::json!([{
            "checkInTime": "2026-09-01T10:05:00Z",
            "verificationMethod": "FACE_RECOGNITION",
            "status": "PRESENT",
            "userId": "u-7"
        }]);

        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Post,
            "/gram-sabha/gs-1/attendance",
            ApiResponse::json_value(201, &updated),
        );

        let api = api_with(mock);
        let entry = Attendance {
            check_in_time: Some("2026-09-01T10:05:00Z".parse().unwrap()),
            verification_method: Some("FACE_RECOGNITION".to_string()),
            status: AttendanceStatus::Present,
            remarks: None,
            user_id: None,
        };
        let meeting = api.add_attendance("gs-1", &entry).await.unwrap();

        assert_eq!(meeting.attendances.len(), 1);
        assert_eq!(
            meeting.attendances[0].user_id.as_ref().and_then(|r| r.id()),
            Some("u-7")
        );
    }

    #[tokio::test]
    async fn test_attendance_stats_parse_flat_body() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Get,
            "/gram-sabha/gs-1/attendance-stats",
            ApiResponse::json_value(
                200,
                &serde_json::json!({
                    "success": true,
                    "totalRegistered": 240,
                    "totalVoters": 400,
                    "present": 45,
                    "quorumRequired": 40,
                    "quorumMet": true
                }),
            ),
        );

        let api = api_with(mock);
        let stats = api.attendance_stats("gs-1").await.unwrap();

        assert_eq!(stats.present, 45);
        assert_eq!(stats.quorum_required, 40);
        assert!(stats.quorum_met);
    }

    #[tokio::test]
    async fn test_rsvp_status_null_data_is_none() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Get,
            "/gram-sabha/gs-1/rsvp/u-7",
            ApiResponse::json_value(200, &serde_json::json!({ "success": true, "data": null })),
        );

        let api = api_with(mock);
        let rsvp = api.rsvp_status("gs-1", "u-7").await.unwrap();
        assert!(rsvp.is_none());
    }

    #[tokio::test]
    async fn test_submit_rsvp_round_trip() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Post,
            "/gram-sabha/gs-1/rsvp/u-7",
            ApiResponse::json_value(
                200,
                &serde_json::json!({
                    "success": true,
                    "data": {
                        "_id": "r-1",
                        "gramSabhaId": "gs-1",
                        "userId": "u-7",
                        "status": "CONFIRMED",
                        "comments": "Will attend"
                    }
                }),
            ),
        );

        let api = api_with(mock.clone());
        let rsvp = api
            .submit_rsvp("gs-1", "u-7", RsvpStatus::Confirmed, Some("Will attend"))
            .await
            .unwrap();

        assert_eq!(rsvp.status, RsvpStatus::Confirmed);
        let sent = mock.requests_to(Method::Post, "/gram-sabha/gs-1/rsvp/u-7");
        assert_eq!(sent[0].body.as_ref().unwrap()["status"], "CONFIRMED");
    }

    #[tokio::test]
    async fn test_rsvp_stats_unwraps_envelope() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_with(
            Method::Get,
            "/gram-sabha/gs-1/rsvp-stats",
            ApiResponse::json_value(
                200,
                &serde_json::json!({
                    "success": true,
                    "data": {
                        "CONFIRMED": 12,
                        "DECLINED": 3,
                        "MAYBE": 2,
                        "NO_RESPONSE": 83,
                        "TOTAL": 100
                    }
                }),
            ),
        );

        let api = api_with(mock);
        let stats = api.rsvp_stats("gs-1").await.unwrap();
        assert_eq!(stats.no_response, 83);
    }
}
