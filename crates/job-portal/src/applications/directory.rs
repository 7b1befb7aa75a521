use async_trait::async_trait;

use super::domain::{Application, ApplicationId, StatusUpdate};
use super::status::ApplicationStatus;
use crate::error::ServiceError;

/// Backend port for reading and mutating applications.
///
/// Implementations own transport concerns; callers only see typed results. The backend is
/// expected to enforce the same transition rules the client checks before submitting.
#[async_trait]
pub trait ApplicationDirectory: Send + Sync {
    /// Applications submitted by the signed-in job seeker.
    async fn fetch_my_applications(&self) -> Result<Vec<Application>, ServiceError>;

    /// Applications received on the signed-in recruiter's postings, optionally filtered.
    async fn fetch_recruiter_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ServiceError>;

    async fn fetch_application(&self, id: ApplicationId) -> Result<Application, ServiceError>;

    async fn update_status(
        &self,
        id: ApplicationId,
        update: &StatusUpdate,
    ) -> Result<Application, ServiceError>;

    async fn withdraw(&self, id: ApplicationId) -> Result<Application, ServiceError>;
}
