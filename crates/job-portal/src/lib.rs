//! Client core for the job portal.
//!
//! The crate owns the application status rules recruiters and job seekers see, a polling
//! controller that keeps a user's applications fresh, and thin typed wrappers over the portal's
//! REST endpoints. Transport is delegated to `reqwest`.

pub mod applications;
pub mod client;
pub mod config;
pub mod error;
pub mod saved_jobs;
pub mod telemetry;

pub use applications::{
    Application, ApplicationDirectory, ApplicationId, ApplicationStatus,
    ApplicationStatusService, JobId, PollHandle, StatusPoller,
};
pub use client::HttpJobPortalClient;
pub use error::{AppError, ServiceError};
pub use saved_jobs::{SavedJobsDirectory, SavedJobsService};
