/// Issues API
///
/// Paginated issue listing, single lookups, the reduced batch projection,
/// transcription job control, and attachment retrieval.
///
/// The list endpoint is the only one with pagination: the server is
/// 1-indexed while [`IssueQuery`] keeps the 0-indexed convention of the
/// consuming views, and the total row count travels in the `x-total-count`
/// header rather than the body (which is a bare JSON array).
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::listing::SortOrder;
use crate::models::{Issue, IssueCategory, IssueStatus, IssueSubcategory, MinimalIssue};
use crate::session::Session;
use crate::transport::{ApiRequest, Method};

/// Serializes an enum to its wire name for use in a query string
fn wire<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Query parameters for the issue list endpoint
///
/// `page` is 0-indexed; the wire value is `page + 1`. Unset and empty
/// filters are omitted from the query string entirely.
#[derive(Debug, Clone)]
pub struct IssueQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort: SortOrder,
    pub user_id: Option<String>,
    pub panchayat_id: Option<String>,
    pub category: Option<IssueCategory>,
    pub subcategory: Option<IssueSubcategory>,
    pub status: Option<IssueStatus>,
    pub created_on: Option<String>,
    pub creator: Option<String>,
    pub created_for: Option<String>,
    pub created_for_id: Option<String>,
    pub search_text: Option<String>,
}

impl Default for IssueQuery {
    fn default() -> Self {
        IssueQuery {
            page: 0,
            limit: 10,
            sort_by: "createdAt".to_string(),
            sort: SortOrder::Desc,
            user_id: None,
            panchayat_id: None,
            category: None,
            subcategory: None,
            status: None,
            created_on: None,
            creator: None,
            created_for: None,
            created_for_id: None,
            search_text: None,
        }
    }
}

impl IssueQuery {
    /// Wire query pairs, with the page converted to 1-indexed
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), (self.page + 1).to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("sortBy".to_string(), self.sort_by.clone()),
            ("sort".to_string(), self.sort.as_str().to_string()),
        ];

        let mut push_opt = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                if !value.is_empty() {
                    pairs.push((key.to_string(), value));
                }
            }
        };

        push_opt("userId", self.user_id.clone());
        push_opt("panchayatId", self.panchayat_id.clone());
        push_opt("category", self.category.as_ref().map(wire));
        push_opt("subcategory", self.subcategory.as_ref().map(wire));
        push_opt("status", self.status.as_ref().map(wire));
        push_opt("createdOn", self.created_on.clone());
        push_opt("creator", self.creator.clone());
        push_opt("createdFor", self.created_for.clone());
        push_opt("createdForId", self.created_for_id.clone());
        push_opt("searchText", self.search_text.clone());

        pairs
    }
}

/// One page of the issue list
#[derive(Debug, Clone)]
pub struct IssuePage {
    /// Issues on this page
    pub data: Vec<Issue>,

    /// Total matching rows across all pages, from `x-total-count`
    pub total: u64,
}

/// Transcription job report for a single issue
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionReport {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub transcription: Option<crate::models::Transcription>,
}

/// Attachment payload as returned by the attachment endpoint
#[derive(Debug, Clone, Deserialize)]
struct AttachmentResponse {
    #[serde(default)]
    success: bool,

    #[serde(default)]
    attachment: Option<crate::models::Attachment>,
}

/// Issue endpoints
pub struct IssuesApi {
    session: Arc<Session>,
}

impl IssuesApi {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        IssuesApi { session }
    }

    /// Fetches one page of issues matching the query
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use gramsetu_client::api::{IssuesApi, IssueQuery};
    /// # use gramsetu_client::models::IssueStatus;
    /// # async fn example(issues: &IssuesApi) -> Result<(), Box<dyn std::error::Error>> {
    /// let page = issues
    ///     .fetch(&IssueQuery {
    ///         status: Some(IssueStatus::Reported),
    ///         panchayat_id: Some("p-1".to_string()),
    ///         ..IssueQuery::default()
    ///     })
    ///     .await?;
    /// println!("{} of {} issues", page.data.len(), page.total);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, query: &IssueQuery) -> ClientResult<IssuePage> {
        let mut request = ApiRequest::get("/issues");
        request.query = query.to_query();

        let response = self.session.execute(request).await?;
        let total = response.total_count.unwrap_or(0);
        let data = response
            .json::<Vec<Issue>>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(IssuePage { data, total })
    }

    /// Fetches a single issue by ID
    ///
    /// The response body is the bare issue object, not an envelope.
    pub async fn fetch_by_id(&self, id: &str) -> ClientResult<Issue> {
        let response = self
            .session
            .execute(ApiRequest::get(format!("/issues/{}", id)))
            .await?;
        response
            .json::<Issue>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    /// Fetches the reduced projection for a set of issue IDs
    pub async fn fetch_minimal(&self, ids: &[String]) -> ClientResult<Vec<MinimalIssue>> {
        #[derive(Deserialize)]
        struct BatchBody {
            #[serde(default)]
            issues: Vec<MinimalIssue>,
        }

        let response = self
            .session
            .execute(ApiRequest::post(
                "/issues/batch-minimal",
                serde_json::json!({ "ids": ids }),
            ))
            .await?;

        let body = response
            .json::<BatchBody>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        Ok(body.issues)
    }

    /// Current state of an issue's transcription job
    pub async fn transcription_status(&self, issue_id: &str) -> ClientResult<TranscriptionReport> {
        let response = self
            .session
            .execute(ApiRequest::get(format!(
                "/issues/{}/transcription",
                issue_id
            )))
            .await?;
        response
            .json::<TranscriptionReport>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    /// Requeues a failed transcription job
    pub async fn retry_transcription(&self, issue_id: &str) -> ClientResult<TranscriptionReport> {
        let response = self
            .session
            .execute(ApiRequest::new(
                Method::Post,
                format!("/issues/{}/transcription/retry", issue_id),
            ))
            .await?;
        response
            .json::<TranscriptionReport>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    /// Fetches a single attachment's content as a data URL
    pub async fn fetch_attachment(
        &self,
        issue_id: &str,
        attachment_id: &str,
    ) -> ClientResult<crate::models::Attachment> {
        let response = self
            .session
            .execute(ApiRequest::get(format!(
                "/issues/{}/attachment/{}",
                issue_id, attachment_id
            )))
            .await?;

        let body = response
            .json::<AttachmentResponse>()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        match (body.success, body.attachment) {
            (true, Some(attachment)) => Ok(attachment),
            _ => Err(ClientError::MalformedResponse(
                "attachment response has no attachment data".to_string(),
            )),
        }
    }
}
