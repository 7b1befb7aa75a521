use async_trait::async_trait;

use super::domain::SavedJob;
use crate::applications::JobId;
use crate::error::ServiceError;

/// Backend port for the job seeker's saved jobs.
#[async_trait]
pub trait SavedJobsDirectory: Send + Sync {
    async fn list_saved_jobs(&self) -> Result<Vec<SavedJob>, ServiceError>;
    async fn saved_jobs_count(&self) -> Result<u64, ServiceError>;
    async fn save_job(&self, job_id: JobId) -> Result<(), ServiceError>;
    async fn unsave_job(&self, job_id: JobId) -> Result<(), ServiceError>;
    async fn apply_to_job(&self, job_id: JobId) -> Result<(), ServiceError>;
}
