use std::{fmt, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use super::{Core, Event, LimiterStats, sweeper};
use crate::{Lease, LeasegateError, LimiterConfig, default_id_factory};

/// Admission control with a fixed ceiling on concurrently held leases.
///
/// At most `limit` leases are outstanding at any moment. [`acquire`] waits
/// until a slot frees up, either because another caller released its lease or
/// because the reclamation sweep forcefully released one that outlived
/// `token_reset_after`. Waiters are served in FIFO order.
///
/// The handle owns no lease state; it only posts events to the background
/// core task. It can be shared across tasks behind an `Arc`.
///
/// [`acquire`]: MaxConcurrencyLimiter::acquire
pub struct MaxConcurrencyLimiter {
    events: mpsc::UnboundedSender<Event>,
    actor: JoinHandle<()>,
    sweeper: Option<JoinHandle<()>>,
}

impl MaxConcurrencyLimiter {
    /// Start a limiter enforcing `config.limit` concurrent leases.
    ///
    /// A positive `config.token_reset_after` also starts the reclamation
    /// sweep; zero leaves unreturned leases alive forever. Spawns background
    /// tasks, so this must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::InvalidLimit`] when `config.limit` is zero.
    pub fn start(config: LimiterConfig) -> Result<Self, LeasegateError> {
        if config.limit == 0 {
            return Err(LeasegateError::InvalidLimit);
        }

        let make_id = config.id_factory.unwrap_or_else(default_id_factory);
        let (events, inbox) = mpsc::unbounded_channel();

        let core = Core::new(config.limit, config.token_reset_after, make_id);
        let actor = tokio::spawn(core.run(inbox));

        let sweeper = (!config.token_reset_after.is_zero())
            .then(|| sweeper::spawn(events.clone(), config.token_reset_after));

        Ok(Self {
            events,
            actor,
            sweeper,
        })
    } // end constructor

    /// Acquire a lease, waiting as long as it takes for capacity.
    ///
    /// This never reports "limit exceeded": a caller over the ceiling simply
    /// waits its turn. See [`acquire_timeout`] for a bounded wait.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::Closed`] when the limiter has been shut down.
    ///
    /// [`acquire_timeout`]: MaxConcurrencyLimiter::acquire_timeout
    pub async fn acquire(&self) -> Result<Lease, LeasegateError> {
        let (reply, granted) = oneshot::channel();
        self.events
            .send(Event::Acquire(reply))
            .map_err(|_| LeasegateError::Closed)?;
        granted.await.map_err(|_| LeasegateError::Closed)
    }

    /// Acquire a lease, giving up after `deadline`.
    ///
    /// A timed-out caller is dropped from the wait queue without consuming
    /// capacity or leaking pending demand.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::AcquireTimeout`] when the deadline elapses first,
    /// [`LeasegateError::Closed`] when the limiter has been shut down.
    pub async fn acquire_timeout(&self, deadline: Duration) -> Result<Lease, LeasegateError> {
        tokio::time::timeout(deadline, self.acquire())
            .await
            .map_err(|_| LeasegateError::AcquireTimeout(deadline))?
    }

    /// Return a lease to the limiter.
    ///
    /// Fire-and-forget: the caller does not wait for processing. Releasing a
    /// lease that is no longer active (double release, reclaimed by the
    /// sweep, issued elsewhere) is logged and ignored.
    pub fn release(&self, lease: Lease) {
        let _ = self.events.send(Event::Release(lease));
    }

    /// Snapshot of the limiter's internal counters.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::Closed`] when the limiter has been shut down.
    pub async fn stats(&self) -> Result<LimiterStats, LeasegateError> {
        let (reply, snapshot) = oneshot::channel();
        self.events
            .send(Event::Inspect(reply))
            .map_err(|_| LeasegateError::Closed)?;
        snapshot.await.map_err(|_| LeasegateError::Closed)
    }

    /// Stop the background core and sweeper tasks.
    ///
    /// Idempotent. Blocked acquirers observe [`LeasegateError::Closed`], as
    /// do all later calls on this handle. Dropping the limiter does the same.
    pub fn shutdown(&self) {
        self.actor.abort();
        if let Some(sweeper) = &self.sweeper {
            sweeper.abort();
        }
    }
}

impl fmt::Debug for MaxConcurrencyLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxConcurrencyLimiter")
            .field("sweeper", &self.sweeper.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for MaxConcurrencyLimiter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
