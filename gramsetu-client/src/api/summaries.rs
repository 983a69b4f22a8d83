/// Issue summaries API
///
/// Each panchayat has at most one summary. A panchayat without a summary
/// is a normal condition, so the 404 from the fetch endpoint is mapped to
/// `Ok(None)` instead of an error.
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::models::{AgendaItem, ApiEnvelope, IssueSummary};
use crate::session::Session;
use crate::transport::ApiRequest;

/// Issue summary endpoints
pub struct SummariesApi {
    session: Arc<Session>,
}

impl SummariesApi {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        SummariesApi { session }
    }

    /// Fetches the summary for a panchayat
    ///
    /// Returns `Ok(None)` when the panchayat has no summary yet.
    pub async fn fetch(&self, panchayat_id: &str) -> ClientResult<Option<IssueSummary>> {
        let request = ApiRequest::get(format!("/summaries/panchayat/{}", panchayat_id));

        let response = match self.session.execute(request).await {
            Ok(response) => response,
            Err(ClientError::Http { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let summary = response
            .json::<ApiEnvelope<IssueSummary>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?
            .into_data()?;
        Ok(Some(summary))
    }

    /// Replaces the agenda items on a panchayat's summary
    pub async fn update_agenda(
        &self,
        panchayat_id: &str,
        agenda_items: &[AgendaItem],
    ) -> ClientResult<IssueSummary> {
        let request = ApiRequest::patch(
            format!("/summaries/panchayat/{}/agenda", panchayat_id),
            serde_json::json!({ "agendaItems": agenda_items }),
        );

        let response = self.session.execute(request).await?;
        response
            .json::<ApiEnvelope<IssueSummary>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?
            .into_data()
    }
}
