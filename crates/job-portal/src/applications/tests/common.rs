use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::applications::directory::ApplicationDirectory;
use crate::applications::domain::{Application, ApplicationId, JobId, StatusUpdate};
use crate::applications::status::ApplicationStatus;
use crate::error::ServiceError;

pub(super) fn application(id: u64, status: ApplicationStatus) -> Application {
    Application {
        id: ApplicationId(id),
        job_id: Some(JobId(100 + id)),
        job_title: Some(format!("Backend Engineer {id}")),
        company_name: Some("TechCorp Inc.".to_string()),
        job_location: Some("San Francisco, CA".to_string()),
        applicant_name: Some("Jordan Lee".to_string()),
        applicant_email: Some("jordan@example.com".to_string()),
        cover_letter: None,
        status,
        apply_date: Some(Utc.with_ymd_and_hms(2025, 10, 6, 10, 30, 0).unwrap()),
        last_updated: Some(Utc.with_ymd_and_hms(2025, 10, 6, 10, 30, 0).unwrap()),
        recruiter_notes: None,
        resume_path: None,
    }
}

pub(super) fn transport_error() -> ServiceError {
    ServiceError::Transport("connection refused".to_string())
}

/// In-memory directory whose `fetch_my_applications` results can be scripted per call.
#[derive(Default)]
pub(super) struct ScriptedDirectory {
    script: Mutex<VecDeque<Result<Vec<Application>, ServiceError>>>,
    records: Mutex<BTreeMap<ApplicationId, Application>>,
    fetch_delay: Option<Duration>,
    update_failure: Option<ServiceError>,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    updates: Mutex<Vec<(ApplicationId, StatusUpdate)>>,
}

impl ScriptedDirectory {
    pub(super) fn with_records(applications: Vec<Application>) -> Self {
        let directory = Self::default();
        {
            let mut records = directory.records.lock().expect("records mutex poisoned");
            for application in applications {
                records.insert(application.id, application);
            }
        }
        directory
    }

    pub(super) fn scripted(mut self, results: Vec<Result<Vec<Application>, ServiceError>>) -> Self {
        self.script = Mutex::new(results.into());
        self
    }

    pub(super) fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub(super) fn failing_updates(mut self, error: ServiceError) -> Self {
        self.update_failure = Some(error);
        self
    }

    pub(super) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(super) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(super) fn updates(&self) -> Vec<(ApplicationId, StatusUpdate)> {
        self.updates.lock().expect("updates mutex poisoned").clone()
    }

    fn record(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .get(&id)
            .cloned()
            .ok_or(ServiceError::NotFound {
                resource: format!("application {id}"),
            })
    }

    fn store(&self, application: Application) {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .insert(application.id, application);
    }
}

#[async_trait]
impl ApplicationDirectory for ScriptedDirectory {
    async fn fetch_my_applications(&self) -> Result<Vec<Application>, ServiceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.script.lock().expect("script mutex poisoned").pop_front();
        let result = match scripted {
            Some(result) => result,
            None => Ok(self
                .records
                .lock()
                .expect("records mutex poisoned")
                .values()
                .cloned()
                .collect()),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn fetch_recruiter_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ServiceError> {
        Ok(self
            .records
            .lock()
            .expect("records mutex poisoned")
            .values()
            .filter(|application| status.map_or(true, |status| application.status == status))
            .cloned()
            .collect())
    }

    async fn fetch_application(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        self.record(id)
    }

    async fn update_status(
        &self,
        id: ApplicationId,
        update: &StatusUpdate,
    ) -> Result<Application, ServiceError> {
        self.updates
            .lock()
            .expect("updates mutex poisoned")
            .push((id, update.clone()));
        if let Some(error) = &self.update_failure {
            return Err(error.clone());
        }
        let mut application = self.record(id)?;
        application.status = update.status;
        if let Some(notes) = &update.recruiter_notes {
            application.recruiter_notes = Some(notes.clone());
        }
        application.last_updated = Some(Utc.with_ymd_and_hms(2025, 10, 7, 9, 0, 0).unwrap());
        self.store(application.clone());
        Ok(application)
    }

    async fn withdraw(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        let mut application = self.record(id)?;
        application.status = ApplicationStatus::Withdrawn;
        self.store(application.clone());
        Ok(application)
    }
}

/// Collects every snapshot a poll subscription delivers.
#[derive(Clone, Default)]
pub(super) struct Deliveries {
    snapshots: Arc<Mutex<Vec<Vec<Application>>>>,
}

impl Deliveries {
    pub(super) fn subscriber(&self) -> impl FnMut(Vec<Application>) + Send + 'static {
        let snapshots = Arc::clone(&self.snapshots);
        move |applications| {
            snapshots
                .lock()
                .expect("deliveries mutex poisoned")
                .push(applications);
        }
    }

    pub(super) fn count(&self) -> usize {
        self.snapshots.lock().expect("deliveries mutex poisoned").len()
    }

    pub(super) fn last(&self) -> Option<Vec<Application>> {
        self.snapshots
            .lock()
            .expect("deliveries mutex poisoned")
            .last()
            .cloned()
    }
}
