//! Repeating refresh of the signed-in user's applications.
//!
//! Each call to [`StatusPoller::start`] creates an independent subscription with its own ticker
//! task. Ticks are fire-and-forget: the fetch for a tick is spawned and the ticker moves on, so a
//! fetch slower than the interval overlaps with the next one. Results reach the subscriber only
//! while the subscription is live.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::directory::ApplicationDirectory;
use super::domain::Application;

static POLL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Identifier of a single polling subscription, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollId(u64);

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "poll-{:04}", self.0)
    }
}

type Subscriber = Box<dyn FnMut(Vec<Application>) + Send>;

/// Holds the subscriber while the subscription is live. Delivery and shutdown take the same
/// lock, so once [`DeliveryGate::close`] returns the subscriber is never entered again.
/// Liveness checks read a flag instead, and never wait on a running callback.
struct DeliveryGate {
    live: AtomicBool,
    subscriber: Mutex<Option<Subscriber>>,
}

impl DeliveryGate {
    fn new(subscriber: Subscriber) -> Self {
        Self {
            live: AtomicBool::new(true),
            subscriber: Mutex::new(Some(subscriber)),
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn deliver(&self, id: PollId, applications: Vec<Application>) {
        let mut guard = self
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(subscriber) => {
                debug!(poll = %id, count = applications.len(), "delivering application snapshot");
                subscriber(applications);
            }
            None => debug!(poll = %id, "discarding snapshot for stopped subscription"),
        }
    }

    /// Returns whether the gate was still open.
    fn close(&self) -> bool {
        self.live.store(false, Ordering::Release);
        self.subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}

/// Starts polling subscriptions against an [`ApplicationDirectory`].
pub struct StatusPoller<D> {
    directory: Arc<D>,
}

impl<D> Clone for StatusPoller<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<D> StatusPoller<D>
where
    D: ApplicationDirectory + 'static,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Begin a new subscription that refetches every `interval`, first firing one full interval
    /// after this call. Must be called from within a Tokio runtime.
    ///
    /// `on_update` receives the full snapshot after each successful fetch. It must not stop its
    /// own subscription synchronously; the stop would wait on the delivery in progress.
    pub fn start<F>(&self, on_update: F, interval: Duration) -> Result<PollHandle, PollError>
    where
        F: FnMut(Vec<Application>) + Send + 'static,
    {
        if interval.is_zero() {
            return Err(PollError::InvalidInterval);
        }
        let runtime = Handle::try_current().map_err(|_| PollError::NoRuntime)?;

        let id = PollId(POLL_SEQUENCE.fetch_add(1, Ordering::Relaxed));
        let gate = Arc::new(DeliveryGate::new(Box::new(on_update)));
        let first_tick = Instant::now() + interval;

        let directory = Arc::clone(&self.directory);
        let ticker_gate = Arc::clone(&gate);
        let ticker = runtime.spawn(async move {
            let mut ticks = time::interval_at(first_tick, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !ticker_gate.is_live() {
                    break;
                }
                let directory = Arc::clone(&directory);
                let gate = Arc::clone(&ticker_gate);
                tokio::spawn(async move {
                    run_tick(id, directory.as_ref(), &gate).await;
                });
            }
        });

        debug!(poll = %id, interval_ms = interval.as_millis() as u64, "status polling started");

        Ok(PollHandle {
            id,
            gate,
            ticker: Mutex::new(Some(ticker)),
        })
    }

    /// Same as [`PollHandle::stop`].
    pub fn stop(&self, handle: &PollHandle) {
        handle.stop();
    }
}

async fn run_tick<D>(id: PollId, directory: &D, gate: &DeliveryGate)
where
    D: ApplicationDirectory + ?Sized,
{
    match directory.fetch_my_applications().await {
        Ok(applications) => gate.deliver(id, applications),
        Err(error) => {
            warn!(poll = %id, error = %error, "status poll tick failed; keeping previous snapshot");
        }
    }
}

/// Revocable token for one polling subscription. Dropping the handle stops the subscription.
pub struct PollHandle {
    id: PollId,
    gate: Arc<DeliveryGate>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl PollHandle {
    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_live()
    }

    /// Stop the subscription. No callback starts after this returns; fetches still in flight
    /// have their results discarded. Calling it again is a no-op.
    pub fn stop(&self) {
        let was_live = self.gate.close();
        if let Some(ticker) = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            ticker.abort();
        }
        if was_live {
            debug!(poll = %self.id, "status polling stopped");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("poll interval must be greater than zero")]
    InvalidInterval,
    #[error("status polling requires a running Tokio runtime")]
    NoRuntime,
}
