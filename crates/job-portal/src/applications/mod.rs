//! Application tracking: lifecycle rules, the backend port, the cached service facade, and
//! status polling.

pub mod cache;
pub mod directory;
pub mod domain;
pub mod polling;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use cache::ApplicationCache;
pub use directory::ApplicationDirectory;
pub use domain::{Application, ApplicationId, JobId, StatusCounts, StatusUpdate};
pub use polling::{PollError, PollHandle, PollId, StatusPoller};
pub use service::{ApplicationStatusService, StatusChangeError};
pub use status::{
    allowed_next_statuses_for, presentation_for, ApplicationStatus, InvalidTransition,
    Presentation, UnknownStatus, FALLBACK_PRESENTATION,
};
