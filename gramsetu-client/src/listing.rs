/// Client-side list derivation
///
/// The issue list views filter, sort, and paginate over data they have
/// already fetched. These are pure functions over a slice of issues so they
/// can be reused and tested without any transport.
use crate::models::{Issue, IssueCategory, IssueStatus, IssueSubcategory};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire value used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sortable issue fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Creation timestamp; issues without one sort last
    CreatedAt,

    /// Lifecycle status order (reported first, no-action-needed last)
    Status,
}

/// Local filter over an already-fetched issue list
///
/// All criteria are conjunctive; an unset criterion matches everything.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub category: Option<IssueCategory>,
    pub subcategory: Option<IssueSubcategory>,

    /// Case-insensitive substring match over the issue text
    pub search_text: Option<String>,
}

impl IssueFilter {
    fn matches(&self, issue: &Issue) -> bool {
        if let Some(status) = self.status {
            if issue.status != status {
                return false;
            }
        }
        if let Some(category) = self.category {
            if issue.category != category {
                return false;
            }
        }
        if let Some(subcategory) = self.subcategory {
            if issue.subcategory != subcategory {
                return false;
            }
        }
        if let Some(needle) = &self.search_text {
            if needle.is_empty() {
                return true;
            }
            let needle = needle.to_lowercase();
            let matched = issue
                .text
                .as_deref()
                .map(|t| t.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !matched {
                return false;
            }
        }
        true
    }
}

/// Returns the issues matching the filter, preserving input order
pub fn filter(issues: &[Issue], criteria: &IssueFilter) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| criteria.matches(issue))
        .cloned()
        .collect()
}

/// Sorts issues by the given key and direction
///
/// The sort is stable, so ties keep their fetched order.
pub fn sort(issues: &mut [Issue], key: SortKey, order: SortOrder) {
    match key {
        SortKey::CreatedAt => {
            // None sorts after every concrete timestamp regardless of order
            issues.sort_by(|a, b| match (a.created_at, b.created_at) {
                (Some(x), Some(y)) => match order {
                    SortOrder::Asc => x.cmp(&y),
                    SortOrder::Desc => y.cmp(&x),
                },
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
        SortKey::Status => {
            issues.sort_by_key(|issue| issue.status);
            if order == SortOrder::Desc {
                issues.reverse();
            }
        }
    }
}

/// Returns the 0-indexed page of the given size
///
/// Pages past the end of the list are empty.
pub fn paginate(issues: &[Issue], page: usize, per_page: usize) -> Vec<Issue> {
    if per_page == 0 {
        return Vec::new();
    }
    issues
        .iter()
        .skip(page.saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect()
}
