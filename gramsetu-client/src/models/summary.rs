/// Issue summary and agenda models
///
/// Each panchayat has at most one issue summary, holding the agenda items
/// prepared for the next Gram Sabha meeting and references to the issues
/// they were derived from. Agenda titles and descriptions are multilingual
/// maps keyed by language code.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::DocRef;

/// Who authored an agenda item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgendaItemOrigin {
    /// Drafted by a user
    User,

    /// Generated by the summarization pipeline
    System,
}

/// A single agenda item for a Gram Sabha meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    /// Title per language code
    pub title: HashMap<String, String>,

    /// Description per language code
    pub description: HashMap<String, String>,

    /// Issues this item was derived from
    ///
    /// Plain IDs on the summary endpoints; the meeting detail endpoint
    /// populates them with issue projections.
    #[serde(default)]
    pub linked_issues: Vec<DocRef>,

    /// Whether a user or the summarization pipeline authored the item
    pub created_by_type: AgendaItemOrigin,

    /// Authoring user, present only when `created_by_type` is `User`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<String>,
}

/// Per-panchayat issue summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    /// Server-side record ID
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    /// Panchayat this summary belongs to
    pub panchayat_id: String,

    #[serde(default)]
    pub agenda_items: Vec<AgendaItem>,

    /// Issues covered by the summary
    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
