use std::{fmt, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::MissedTickBehavior,
};

use super::Event;
use crate::{IdFactory, Lease, LeasegateError, LimiterConfig, default_id_factory};

/// Admission control that paces grants at a fixed interval.
///
/// Instead of bounding how many leases are held, each tick of the interval
/// lets exactly one waiting caller through; `config.limit` is not consulted.
/// Callers that arrive between ticks queue on the event channel and are
/// served one per tick, in arrival order.
pub struct ThrottleLimiter {
    events: mpsc::UnboundedSender<Event>,
    pacer: JoinHandle<()>,
}

impl ThrottleLimiter {
    /// Start a limiter granting at most one lease per `config.throttle`.
    ///
    /// Spawns the pacer task, so this must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::InvalidThrottle`] when `config.throttle` is zero.
    pub fn start(config: LimiterConfig) -> Result<Self, LeasegateError> {
        if config.throttle.is_zero() {
            return Err(LeasegateError::InvalidThrottle);
        }

        let make_id = config.id_factory.unwrap_or_else(default_id_factory);
        let (events, inbox) = mpsc::unbounded_channel();
        let pacer = tokio::spawn(run_pacer(inbox, config.throttle, make_id));

        Ok(Self { events, pacer })
    } // end constructor

    /// Acquire a lease, waiting for this request's turn in the pacing cadence.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::Closed`] when the limiter has been shut down.
    pub async fn acquire(&self) -> Result<Lease, LeasegateError> {
        let (reply, granted) = oneshot::channel();
        self.events
            .send(Event::Acquire(reply))
            .map_err(|_| LeasegateError::Closed)?;
        granted.await.map_err(|_| LeasegateError::Closed)
    }

    /// Acquire a lease, giving up after `deadline`.
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

    /// Return a lease.
    ///
    /// Paced leases occupy no slot, so this is always a no-op; it exists so
    /// both variants share one calling convention.
    pub fn release(&self, lease: Lease) {
        let _ = self.events.send(Event::Release(lease));
    }

    /// Stop the pacer task.
    ///
    /// Idempotent. Blocked acquirers observe [`LeasegateError::Closed`], as
    /// do all later calls on this handle. Dropping the limiter does the same.
    pub fn shutdown(&self) {
        self.pacer.abort();
    }
}

impl fmt::Debug for ThrottleLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrottleLimiter").finish_non_exhaustive()
    }
}

impl Drop for ThrottleLimiter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One grant per tick: wait for the tick, then for the next live acquire
/// request. Releases and abandoned requests are drained without consuming
/// the tick.
async fn run_pacer(
    mut events: mpsc::UnboundedReceiver<Event>,
    throttle: Duration,
    make_id: IdFactory,
) {
    let mut ticks = tokio::time::interval(throttle);
    // a pacer that fell behind grants at most one overdue lease, then
    // returns to the original cadence
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;

        loop {
            match events.recv().await {
                Some(Event::Acquire(reply)) => {
                    if reply.is_closed() {
                        // caller stopped waiting; its turn passes to the next
                        continue;
                    }
                    let lease = Lease::new(make_id());
                    tracing::trace!(lease = lease.id(), "paced lease granted");
                    let _ = reply.send(lease);
                    break;
                }
                Some(Event::Release(lease)) => {
                    tracing::trace!(lease = lease.id(), "paced lease returned");
                }
                Some(Event::Sweep) | Some(Event::Inspect(_)) => {}
                None => return,
            }
        }
    }
}
