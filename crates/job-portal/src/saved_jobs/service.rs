use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use super::directory::SavedJobsDirectory;
use super::domain::{
    BulkAction, BulkFailure, BulkOutcome, SavedJob, SavedJobsPage, SavedJobsQuery,
};
use crate::applications::JobId;
use crate::error::ServiceError;

pub struct SavedJobsService<D> {
    directory: Arc<D>,
}

impl<D> SavedJobsService<D>
where
    D: SavedJobsDirectory,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Fetch saved jobs and apply the query's filters and paging locally.
    pub async fn page(&self, query: &SavedJobsQuery) -> Result<SavedJobsPage, ServiceError> {
        let jobs = self.directory.list_saved_jobs().await?;
        Ok(paginate(filter_jobs(jobs, query), query))
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        self.directory.saved_jobs_count().await
    }

    pub async fn save(&self, job_id: JobId) -> Result<(), ServiceError> {
        self.directory.save_job(job_id).await
    }

    pub async fn unsave(&self, job_id: JobId) -> Result<(), ServiceError> {
        self.directory.unsave_job(job_id).await
    }

    pub async fn bulk_remove(&self, job_ids: &[JobId]) -> BulkOutcome {
        self.bulk(BulkAction::Remove, job_ids).await
    }

    pub async fn bulk_apply(&self, job_ids: &[JobId]) -> BulkOutcome {
        self.bulk(BulkAction::Apply, job_ids).await
    }

    /// Remove every saved job. Listing failures abort before anything is mutated.
    pub async fn clear_all(&self) -> Result<BulkOutcome, ServiceError> {
        let jobs = self.directory.list_saved_jobs().await?;
        let ids: Vec<JobId> = jobs.iter().map(|job| job.job_post_id).collect();
        Ok(self.bulk_remove(&ids).await)
    }

    /// Attempt the action for every distinct id concurrently. No rollback is attempted when
    /// some ids fail; the outcome reports each id's result in input order.
    async fn bulk(&self, action: BulkAction, job_ids: &[JobId]) -> BulkOutcome {
        let mut seen = HashSet::new();
        let distinct: Vec<JobId> = job_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if distinct.is_empty() {
            return BulkOutcome::empty(action);
        }

        let directory = self.directory.as_ref();
        let results = join_all(distinct.into_iter().map(|job_id| async move {
            let result = match action {
                BulkAction::Remove => directory.unsave_job(job_id).await,
                BulkAction::Apply => directory.apply_to_job(job_id).await,
            };
            (job_id, result)
        }))
        .await;

        let mut outcome = BulkOutcome::empty(action);
        for (job_id, result) in results {
            match result {
                Ok(()) => outcome.succeeded.push(job_id),
                Err(error) => {
                    warn!(job = %job_id, ?action, error = %error, "bulk action failed for job");
                    outcome.failed.push(BulkFailure { job_id, error });
                }
            }
        }
        info!(
            ?action,
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk action finished"
        );
        outcome
    }
}

fn filter_jobs(jobs: Vec<SavedJob>, query: &SavedJobsQuery) -> Vec<SavedJob> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase);
    let job_type = query
        .job_type
        .as_deref()
        .map(str::trim)
        .filter(|job_type| !job_type.is_empty());

    jobs.into_iter()
        .filter(|job| needle.as_deref().map_or(true, |needle| job.matches_search(needle)))
        .filter(|job| query.remote.map_or(true, |wanted| job.is_remote() == wanted))
        .filter(|job| query.applied.map_or(true, |wanted| job.is_applied == wanted))
        .filter(|job| {
            job_type.map_or(true, |wanted| {
                job.job_type
                    .as_deref()
                    .is_some_and(|actual| actual.eq_ignore_ascii_case(wanted))
            })
        })
        .collect()
}

fn paginate(jobs: Vec<SavedJob>, query: &SavedJobsQuery) -> SavedJobsPage {
    let limit = query.limit.max(1);
    let page = query.page.max(1);
    let total_jobs = jobs.len();
    let total_pages = total_jobs.div_ceil(limit);
    let jobs = jobs
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    SavedJobsPage {
        jobs,
        total_jobs,
        total_pages,
        current_page: page,
        has_next: page.saturating_mul(limit) < total_jobs,
        has_previous: page > 1,
    }
}
