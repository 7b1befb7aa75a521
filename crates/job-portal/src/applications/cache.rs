use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::domain::{Application, ApplicationId, StatusCounts};

/// Last known copy of each application. Backend responses always win over cached entries.
#[derive(Debug, Default)]
pub struct ApplicationCache {
    entries: Mutex<BTreeMap<ApplicationId, Application>>,
}

impl ApplicationCache {
    fn entries(&self) -> MutexGuard<'_, BTreeMap<ApplicationId, Application>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole cache with a fresh snapshot.
    pub fn replace_all(&self, applications: &[Application]) {
        let mut entries = self.entries();
        entries.clear();
        entries.extend(
            applications
                .iter()
                .map(|application| (application.id, application.clone())),
        );
    }

    /// Store the backend's copy of a single application.
    pub fn reconcile(&self, application: Application) {
        self.entries().insert(application.id, application);
    }

    pub fn get(&self, id: ApplicationId) -> Option<Application> {
        self.entries().get(&id).cloned()
    }

    pub fn snapshot(&self) -> Vec<Application> {
        self.entries().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn statistics(&self) -> StatusCounts {
        StatusCounts::tally(self.entries().values())
    }
}
