/// Issue model
///
/// Issues are reported by citizens or officials, scoped to a panchayat, and
/// move through a fixed status lifecycle until resolved or picked into a
/// Gram Sabha agenda. Audio reports carry a server-side transcription block.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    CultureAndNature,
    Infrastructure,
    EarningOpportunities,
    BasicAmenities,
    SocialWelfareSchemes,
    Other,
}

/// Issue subcategory, grouped under its category on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSubcategory {
    // Culture and nature
    Festivals,
    TreesAndForests,
    Soil,
    NaturalWaterResources,
    ReligiousPlaces,
    // Infrastructure
    Land,
    Water,
    Energy,
    Transportation,
    Communication,
    // Earning opportunities
    Agriculture,
    AnimalHusbandry,
    Fisheries,
    SmallScaleIndustries,
    MinorForestProduce,
    KhadiAndVillageIndustries,
    // Basic amenities
    Health,
    Education,
    HousingAndSanitation,
    SportsAndEntertainment,
    Food,
    // Social welfare schemes
    WeakerSections,
    HandicappedWelfare,
    FamilyWelfare,
    WomenAndChildDevelopment,
    PovertyAlleviation,
    // Other
    Other,
}

/// Issue priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuePriority {
    Urgent,
    Normal,
}

impl Default for IssuePriority {
    fn default() -> Self {
        IssuePriority::Normal
    }
}

/// Issue lifecycle status
///
/// Ordered by lifecycle progression; the derived `Ord` is used for
/// client-side status sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Reported,
    PickedInAgenda,
    DiscussedInGramSabha,
    Transferred,
    Resolved,
    NoActionNeeded,
}

impl Default for IssueStatus {
    fn default() -> Self {
        IssueStatus::Reported
    }
}

/// State of the server-side speech-to-text job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranscriptionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Attachment stored inline as a data URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Data URL of the attachment content
    pub attachment: String,

    /// Original filename
    #[serde(default)]
    pub filename: Option<String>,

    /// MIME type
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Upload timestamp
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Speech-to-text result attached to an issue's audio recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    /// Provider-side request ID
    #[serde(default)]
    pub request_id: Option<String>,

    /// Job state
    #[serde(default)]
    pub status: Option<TranscriptionStatus>,

    /// Primary transcription text
    #[serde(default)]
    pub text: Option<String>,

    /// Raw transcription before enhancement
    #[serde(default)]
    pub original_transcription: Option<String>,

    /// LLM-enhanced English rendition
    #[serde(default)]
    pub enhanced_english_transcription: Option<String>,

    /// LLM-enhanced Hindi rendition
    #[serde(default)]
    pub enhanced_hindi_transcription: Option<String>,

    /// Spoken language
    #[serde(default)]
    pub language: Option<String>,

    /// Provider that produced the transcription
    #[serde(default)]
    pub transcription_provider: Option<String>,
}

/// An issue reported for discussion in the Gram Sabha
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Server-side record ID
    #[serde(alias = "_id")]
    pub id: String,

    /// Free-text description (absent for audio-only reports)
    #[serde(default)]
    pub text: Option<String>,

    pub category: IssueCategory,

    pub subcategory: IssueSubcategory,

    #[serde(default)]
    pub priority: IssuePriority,

    #[serde(default)]
    pub status: IssueStatus,

    /// Member the issue was raised for
    #[serde(default)]
    pub created_for_id: Option<String>,

    /// Member who reported the issue
    #[serde(default)]
    pub creator_id: Option<String>,

    /// Panchayat scope
    #[serde(default)]
    pub panchayat_id: Option<String>,

    /// Gram Sabha meeting the issue is attached to, if any
    #[serde(default)]
    pub gram_sabha_id: Option<String>,

    /// Requested resolution deadline
    #[serde(default)]
    pub to_be_resolved_before: Option<DateTime<Utc>>,

    /// Official's remark
    #[serde(default)]
    pub remark: Option<String>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub transcription: Option<Transcription>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Reduced issue projection returned by the batch-minimal endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalIssue {
    /// Server-side record ID
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub category: Option<IssueCategory>,

    #[serde(default)]
    pub subcategory: Option<IssueSubcategory>,

    #[serde(default)]
    pub status: Option<IssueStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_deserializes_with_defaults() {
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "_id": "i-1",
            "category": "INFRASTRUCTURE",
            "subcategory": "WATER"
        }))
        .unwrap();

        assert_eq!(issue.status, IssueStatus::Reported);
        assert_eq!(issue.priority, IssuePriority::Normal);
        assert!(issue.attachments.is_empty());
        assert!(issue.transcription.is_none());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&IssueStatus::PickedInAgenda).unwrap();
        assert_eq!(json, "\"PICKED_IN_AGENDA\"");

        let status: IssueStatus = serde_json::from_str("\"NO_ACTION_NEEDED\"").unwrap();
        assert_eq!(status, IssueStatus::NoActionNeeded);
    }

    #[test]
    fn test_status_ordering_follows_lifecycle() {
        assert!(IssueStatus::Reported < IssueStatus::PickedInAgenda);
        assert!(IssueStatus::PickedInAgenda < IssueStatus::Resolved);
    }

    #[test]
    fn test_transcription_block() {
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "_id": "i-2",
            "category": "BASIC_AMENITIES",
            "subcategory": "HEALTH",
            "transcription": {
                "status": "COMPLETED",
                "text": "Hand pump near the school is broken",
                "language": "Hindi"
            }
        }))
        .unwrap();

        let transcription = issue.transcription.unwrap();
        assert_eq!(transcription.status, Some(TranscriptionStatus::Completed));
        assert_eq!(transcription.language.as_deref(), Some("Hindi"));
    }
}
