use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

/// Factory producing the opaque unique identifier carried by each [`Lease`].
///
/// Any globally-unique, collision-resistant generator satisfies the contract.
/// The default factory produces UUIDv7 strings, which sort by creation time.
pub type IdFactory = Arc<dyn Fn() -> String + Send + Sync>;

pub(crate) fn default_id_factory() -> IdFactory {
    Arc::new(|| uuid::Uuid::now_v7().to_string())
}

/// A granted admission lease.
///
/// Immutable after creation and identified by [`Lease::id`] alone. A lease
/// granted by the max-concurrency variant occupies one slot of the limiter's
/// capacity until it is returned via `release` or reclaimed by the TTL sweep.
#[derive(Clone, Debug)]
pub struct Lease {
    id: String,
    created_at: Instant,
}

impl Lease {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            created_at: Instant::now(),
        }
    }

    /// Opaque unique identifier assigned at creation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Instant the lease was granted.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// True once the lease has been held for at least `reset_after`.
    pub(crate) fn needs_reset(&self, reset_after: Duration) -> bool {
        self.created_at.elapsed() >= reset_after
    }
}
