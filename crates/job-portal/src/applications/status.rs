//! Application lifecycle rules: the transition table, editability, and the presentation
//! metadata shown next to each status.
//!
//! Everything here is a lookup into [`STATUS_TABLE`], one row per status in declaration order,
//! so the table can be checked exhaustively in tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a job application as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    InterviewScheduled,
    Interviewed,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

/// Icon and color token rendered alongside a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub icon: &'static str,
    pub color: &'static str,
}

/// Shown for status values outside the known set.
pub const FALLBACK_PRESENTATION: Presentation = Presentation {
    icon: "fa-question-circle",
    color: "#6c757d",
};

struct StatusEntry {
    status: ApplicationStatus,
    code: &'static str,
    display_name: &'static str,
    next: &'static [ApplicationStatus],
    presentation: Presentation,
    editable: bool,
    withdrawable: bool,
}

type S = ApplicationStatus;

static STATUS_TABLE: [StatusEntry; 8] = [
    StatusEntry {
        status: S::Applied,
        code: "APPLIED",
        display_name: "Applied",
        next: &[S::UnderReview, S::Rejected],
        presentation: Presentation {
            icon: "fa-paper-plane",
            color: "#007bff",
        },
        editable: true,
        withdrawable: true,
    },
    StatusEntry {
        status: S::UnderReview,
        code: "UNDER_REVIEW",
        display_name: "Under Review",
        next: &[S::InterviewScheduled, S::Rejected],
        presentation: Presentation {
            icon: "fa-eye",
            color: "#ffc107",
        },
        editable: true,
        withdrawable: true,
    },
    StatusEntry {
        status: S::InterviewScheduled,
        code: "INTERVIEW_SCHEDULED",
        display_name: "Interview Scheduled",
        next: &[S::Interviewed, S::Rejected],
        presentation: Presentation {
            icon: "fa-calendar",
            color: "#17a2b8",
        },
        editable: true,
        withdrawable: true,
    },
    StatusEntry {
        status: S::Interviewed,
        code: "INTERVIEWED",
        display_name: "Interviewed",
        next: &[S::Offered, S::Rejected],
        presentation: Presentation {
            icon: "fa-comments",
            color: "#6f42c1",
        },
        editable: true,
        withdrawable: true,
    },
    StatusEntry {
        status: S::Offered,
        code: "OFFERED",
        display_name: "Offered",
        next: &[S::Hired, S::Rejected],
        presentation: Presentation {
            icon: "fa-handshake",
            color: "#28a745",
        },
        editable: true,
        withdrawable: true,
    },
    StatusEntry {
        status: S::Hired,
        code: "HIRED",
        display_name: "Hired",
        next: &[],
        presentation: Presentation {
            icon: "fa-check-circle",
            color: "#28a745",
        },
        editable: true,
        withdrawable: false,
    },
    StatusEntry {
        status: S::Rejected,
        code: "REJECTED",
        display_name: "Rejected",
        next: &[],
        presentation: Presentation {
            icon: "fa-times-circle",
            color: "#dc3545",
        },
        editable: true,
        withdrawable: true,
    },
    StatusEntry {
        status: S::Withdrawn,
        code: "WITHDRAWN",
        display_name: "Withdrawn",
        next: &[],
        presentation: Presentation {
            icon: "fa-minus-circle",
            color: "#6c757d",
        },
        editable: false,
        withdrawable: false,
    },
];

impl ApplicationStatus {
    /// Every status, in declaration order.
    pub const ALL: [ApplicationStatus; 8] = [
        S::Applied,
        S::UnderReview,
        S::InterviewScheduled,
        S::Interviewed,
        S::Offered,
        S::Hired,
        S::Rejected,
        S::Withdrawn,
    ];

    fn entry(self) -> &'static StatusEntry {
        &STATUS_TABLE[self as usize]
    }

    /// Wire code, e.g. `UNDER_REVIEW`.
    pub fn code(self) -> &'static str {
        self.entry().code
    }

    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Statuses a recruiter may move this application to, in the order options are offered.
    pub fn allowed_next(self) -> &'static [ApplicationStatus] {
        self.entry().next
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Whether the status may still be edited. Only withdrawn applications are locked;
    /// `HIRED` and `REJECTED` stay editable even though they have no further transitions.
    pub fn is_editable(self) -> bool {
        self.entry().editable
    }

    /// Whether the applicant may still withdraw. The backend refuses once hired or withdrawn.
    pub fn can_withdraw(self) -> bool {
        self.entry().withdrawable
    }

    pub fn presentation(self) -> Presentation {
        self.entry().presentation
    }

    /// A proposal is acceptable when it keeps the current status or follows the table.
    pub fn can_transition_to(self, proposed: ApplicationStatus) -> bool {
        proposed == self || self.allowed_next().contains(&proposed)
    }

    pub fn authorize_transition(self, proposed: ApplicationStatus) -> Result<(), InvalidTransition> {
        if self.can_transition_to(proposed) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: proposed,
            })
        }
    }

    /// Parses an exact wire code. Anything outside the closed set, including other
    /// casings, is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        STATUS_TABLE
            .iter()
            .find(|entry| entry.code == raw)
            .map(|entry| entry.status)
    }
}

/// Successors for a raw status code; unknown codes have none.
pub fn allowed_next_statuses_for(raw: &str) -> &'static [ApplicationStatus] {
    ApplicationStatus::parse(raw)
        .map(ApplicationStatus::allowed_next)
        .unwrap_or(&[])
}

/// Presentation for a raw status code, falling back to [`FALLBACK_PRESENTATION`].
pub fn presentation_for(raw: &str) -> Presentation {
    ApplicationStatus::parse(raw)
        .map(ApplicationStatus::presentation)
        .unwrap_or(FALLBACK_PRESENTATION)
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// A proposed status change that the transition table does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move application from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);
