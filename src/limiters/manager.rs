use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use tokio::sync::{mpsc, oneshot};

use crate::{IdFactory, Lease};

/// Events delivered to a limiter's background task.
pub(crate) enum Event {
    /// A caller wants a lease; the reply channel parks it until one is granted.
    Acquire(oneshot::Sender<Lease>),
    /// A caller returned a lease.
    Release(Lease),
    /// Reclamation tick: release every active lease that outlived its TTL.
    Sweep,
    /// Snapshot request for the internal counters.
    Inspect(oneshot::Sender<LimiterStats>),
}

/// Point-in-time counters reported by [`MaxConcurrencyLimiter::stats`].
///
/// [`MaxConcurrencyLimiter::stats`]: crate::MaxConcurrencyLimiter::stats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimiterStats {
    /// Number of currently outstanding leases.
    pub active: usize,
    /// Number of callers still waiting for capacity.
    pub pending: usize,
}

/// Serialized state machine behind [`MaxConcurrencyLimiter`].
///
/// The core is the sole owner of the active-lease map and the wait queue.
/// It runs on its own task and mutates state only while processing a single
/// [`Event`], which is the crate's entire synchronization story: no lock is
/// ever taken, and no other component holds a reference into this state.
///
/// [`MaxConcurrencyLimiter`]: crate::MaxConcurrencyLimiter
pub(crate) struct Core {
    limit: usize,
    reset_after: Duration,
    make_id: IdFactory,
    active: HashMap<String, Lease>,
    pending: VecDeque<oneshot::Sender<Lease>>,
}

impl Core {
    pub(crate) fn new(limit: usize, reset_after: Duration, make_id: IdFactory) -> Self {
        Self {
            limit,
            reset_after,
            make_id,
            active: HashMap::new(),
            pending: VecDeque::new(),
        }
    } // end constructor

    /// Drain events until every handle to the limiter is gone.
    pub(crate) async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            match event {
                Event::Acquire(reply) => self.acquire(reply),
                Event::Release(lease) => self.release(lease.id()),
                Event::Sweep => self.sweep(),
                Event::Inspect(reply) => {
                    let _ = reply.send(self.stats());
                }
            }
        }
    }

    fn acquire(&mut self, reply: oneshot::Sender<Lease>) {
        self.pending.push_back(reply);
        self.refill();
    }

    fn release(&mut self, id: &str) {
        if self.active.remove(id).is_none() {
            // already released, reclaimed, or never issued here
            tracing::warn!(lease = id, "ignoring release of a lease that is not active");
            return;
        }
        tracing::trace!(lease = id, "lease released");
        self.refill();
    }

    /// Feed every expired lease through the regular release path, which keeps
    /// explicit release and reclamation on one code path and makes a race
    /// between the two a harmless no-op.
    fn sweep(&mut self) {
        let expired: Vec<String> = self
            .active
            .values()
            .filter(|lease| lease.needs_reset(self.reset_after))
            .map(|lease| lease.id().to_owned())
            .collect();

        for id in &expired {
            tracing::debug!(lease = %id, "reclaiming lease past its TTL");
            self.release(id);
        }
    } // end method sweep

    /// Grant leases to waiting callers, oldest first, until the ceiling is
    /// hit or demand runs out. Holds the `active.len() <= limit` invariant on
    /// every exit path.
    fn refill(&mut self) {
        while self.active.len() < self.limit {
            let Some(reply) = self.pending.pop_front() else {
                break;
            };
            if reply.is_closed() {
                // caller stopped waiting (deadline elapsed or future dropped)
                continue;
            }

            let lease = Lease::new((self.make_id)());
            self.active.insert(lease.id().to_owned(), lease.clone());
            tracing::trace!(lease = lease.id(), "lease granted");

            if let Err(lease) = reply.send(lease) {
                // the waiter vanished between the closed check and the send;
                // take the slot back
                self.active.remove(lease.id());
            }
        }
    } // end method refill

    fn stats(&self) -> LimiterStats {
        LimiterStats {
            active: self.active.len(),
            pending: self.pending.iter().filter(|tx| !tx.is_closed()).count(),
        }
    }
}
