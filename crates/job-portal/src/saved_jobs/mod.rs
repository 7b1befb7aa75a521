//! Saved jobs: client-side filtering and paging, plus best-effort bulk actions.

pub mod directory;
pub mod domain;
pub mod service;

pub use directory::SavedJobsDirectory;
pub use domain::{
    BulkAction, BulkFailure, BulkOutcome, SavedJob, SavedJobsPage, SavedJobsQuery,
};
pub use service::SavedJobsService;
