use serde::{Deserialize, Serialize};

use crate::applications::JobId;
use crate::error::ServiceError;

/// Job posting bookmarked by the signed-in job seeker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub job_post_id: JobId,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub is_applied: bool,
}

impl SavedJob {
    /// Postings flag remote work as free text ("Remote-Only", "Partial-Remote", ...).
    pub fn is_remote(&self) -> bool {
        self.remote
            .as_deref()
            .map(|remote| remote.to_ascii_lowercase().contains("remote"))
            .unwrap_or(false)
    }

    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        [&self.job_title, &self.company_name, &self.job_location]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Filter and page selection applied client-side to the saved-job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedJobsQuery {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    /// `Some(true)` keeps remote-friendly postings, `Some(false)` keeps on-site ones.
    pub remote: Option<bool>,
    /// Match on whether the job seeker already applied.
    pub applied: Option<bool>,
    pub job_type: Option<String>,
}

impl Default for SavedJobsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            remote: None,
            applied: None,
            job_type: None,
        }
    }
}

/// One page of saved jobs plus paging metadata computed from the filtered total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobsPage {
    pub jobs: Vec<SavedJob>,
    pub total_jobs: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Remove,
    Apply,
}

impl BulkAction {
    pub const fn past_tense(self) -> &'static str {
        match self {
            BulkAction::Remove => "Removed",
            BulkAction::Apply => "Applied to",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub job_id: JobId,
    pub error: ServiceError,
}

/// Per-job result of a bulk action. Bulk actions are not atomic: jobs listed in `succeeded`
/// were mutated even when others failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub action: BulkAction,
    pub succeeded: Vec<JobId>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn empty(action: BulkAction) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} out of {} jobs",
            self.action.past_tense(),
            self.succeeded.len(),
            self.attempted()
        )
    }
}
