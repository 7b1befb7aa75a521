use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::cache::ApplicationCache;
use super::directory::ApplicationDirectory;
use super::domain::{Application, ApplicationId, StatusCounts, StatusUpdate};
use super::polling::{PollError, PollHandle, StatusPoller};
use super::status::{ApplicationStatus, InvalidTransition};
use crate::error::ServiceError;

/// Facade combining a directory with the local cache and the status rules.
///
/// Every mutation is validated locally first, submitted, and the returned copy reconciled into
/// the cache. Failed calls leave the cache untouched.
pub struct ApplicationStatusService<D> {
    directory: Arc<D>,
    cache: Arc<ApplicationCache>,
}

impl<D> ApplicationStatusService<D>
where
    D: ApplicationDirectory + 'static,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            cache: Arc::new(ApplicationCache::default()),
        }
    }

    pub fn cache(&self) -> &ApplicationCache {
        &self.cache
    }

    pub fn cached(&self, id: ApplicationId) -> Option<Application> {
        self.cache.get(id)
    }

    pub fn cached_applications(&self) -> Vec<Application> {
        self.cache.snapshot()
    }

    /// Refresh the job seeker's applications.
    pub async fn refresh_my_applications(&self) -> Result<Vec<Application>, ServiceError> {
        let applications = self.directory.fetch_my_applications().await?;
        self.cache.replace_all(&applications);
        Ok(applications)
    }

    /// Refresh the recruiter's inbox, optionally narrowed to one status.
    pub async fn recruiter_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ServiceError> {
        let applications = self.directory.fetch_recruiter_applications(status).await?;
        self.cache.replace_all(&applications);
        Ok(applications)
    }

    /// Validate and submit a recruiter status change.
    ///
    /// The current status comes from the cache, or from the backend when the application has
    /// not been seen yet. Withdrawn applications are locked, and proposals outside the
    /// transition table never reach the backend.
    pub async fn propose_status_change(
        &self,
        id: ApplicationId,
        proposed: ApplicationStatus,
        notes: Option<&str>,
    ) -> Result<Application, StatusChangeError> {
        let current = self.current_status(id).await?;

        if !current.is_editable() {
            warn!(application = %id, status = %current, "status change refused; application is locked");
            return Err(StatusChangeError::NotEditable { id, status: current });
        }
        if let Err(rejection) = current.authorize_transition(proposed) {
            warn!(application = %id, from = %current, to = %proposed, "status change rejected locally");
            return Err(rejection.into());
        }

        let update = StatusUpdate::new(proposed, notes);
        let updated = self
            .directory
            .update_status(id, &update)
            .await
            .inspect_err(|error| {
                warn!(application = %id, error = %error, "status change failed");
            })?;

        info!(application = %id, from = %current, to = %updated.status, "application status updated");
        self.cache.reconcile(updated.clone());
        Ok(updated)
    }

    /// Withdraw one of the job seeker's applications.
    pub async fn withdraw(&self, id: ApplicationId) -> Result<Application, StatusChangeError> {
        let current = self.current_status(id).await?;
        if !current.can_withdraw() {
            warn!(application = %id, status = %current, "withdrawal refused locally");
            return Err(StatusChangeError::NotWithdrawable { id, status: current });
        }

        let updated = self.directory.withdraw(id).await.inspect_err(|error| {
            warn!(application = %id, error = %error, "withdrawal failed");
        })?;

        info!(application = %id, "application withdrawn");
        self.cache.reconcile(updated.clone());
        Ok(updated)
    }

    /// Status tallies over the cached applications.
    pub fn statistics(&self) -> StatusCounts {
        self.cache.statistics()
    }

    /// Poll the job seeker's applications, refreshing the cache before each delivery.
    pub fn start_polling<F>(&self, interval: Duration, mut on_update: F) -> Result<PollHandle, PollError>
    where
        F: FnMut(Vec<Application>) + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        StatusPoller::new(Arc::clone(&self.directory)).start(
            move |applications| {
                cache.replace_all(&applications);
                on_update(applications);
            },
            interval,
        )
    }

    async fn current_status(&self, id: ApplicationId) -> Result<ApplicationStatus, ServiceError> {
        if let Some(application) = self.cache.get(id) {
            return Ok(application.status);
        }
        let fetched = self.directory.fetch_application(id).await?;
        let status = fetched.status;
        self.cache.reconcile(fetched);
        Ok(status)
    }
}

/// Error raised when a status change cannot be submitted or is refused.
#[derive(Debug, thiserror::Error)]
pub enum StatusChangeError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    #[error("application {id} is {status} and can no longer be edited")]
    NotEditable {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    #[error("application {id} cannot be withdrawn while {status}")]
    NotWithdrawable {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    #[error(transparent)]
    Service(#[from] ServiceError),
}
