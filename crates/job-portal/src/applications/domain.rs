use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{ApplicationStatus, Presentation};

/// Backend identifier for an application. Opaque to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier for a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-side copy of an application as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_email: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub apply_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recruiter_notes: Option<String>,
    #[serde(default)]
    pub resume_path: Option<String>,
}

impl Application {
    pub fn presentation(&self) -> Presentation {
        self.status.presentation()
    }

    pub fn allowed_next(&self) -> &'static [ApplicationStatus] {
        self.status.allowed_next()
    }

    /// Short one-line label used by list views.
    pub fn headline(&self) -> String {
        let title = self.job_title.as_deref().unwrap_or("Untitled position");
        match self.company_name.as_deref() {
            Some(company) => format!("{title} @ {company}"),
            None => title.to_string(),
        }
    }
}

/// Body of a recruiter status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruiter_notes: Option<String>,
}

impl StatusUpdate {
    /// Builds an update, dropping notes that are empty after trimming.
    pub fn new(status: ApplicationStatus, notes: Option<&str>) -> Self {
        let recruiter_notes = notes
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);
        Self {
            status,
            recruiter_notes,
        }
    }
}

/// Per-status tallies with every status present, even when zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(flatten)]
    counts: BTreeMap<ApplicationStatus, u64>,
    #[serde(rename = "totalApplications")]
    total: u64,
}

impl StatusCounts {
    pub fn tally<'a, I>(applications: I) -> Self
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let mut counts: BTreeMap<ApplicationStatus, u64> = ApplicationStatus::ALL
            .iter()
            .map(|status| (*status, 0))
            .collect();
        let mut total = 0;
        for application in applications {
            *counts.entry(application.status).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    pub fn count(&self, status: ApplicationStatus) -> u64 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Counts in status declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ApplicationStatus, u64)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }
}
