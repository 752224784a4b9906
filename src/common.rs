use std::{fmt, time::Duration};

use crate::IdFactory;

/// Configuration shared by both limiter variants.
///
/// Each constructor reads only the fields it needs: the max-concurrency
/// variant requires `limit` and honors `token_reset_after`; the throttle
/// variant requires `throttle` and ignores the other two.
#[derive(Clone, Default)]
pub struct LimiterConfig {
    /// How many leases can be active at a time (max-concurrency variant).
    pub limit: usize,

    /// Minimum time between grants (throttle variant).
    pub throttle: Duration,

    /// Maximum time a lease may live before being forcefully released.
    /// Zero disables reclamation: leases then live until explicitly released.
    pub token_reset_after: Duration,

    /// Override for the lease ID generator. `None` uses the UUIDv7 default.
    pub id_factory: Option<IdFactory>,
}

impl fmt::Debug for LimiterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimiterConfig")
            .field("limit", &self.limit)
            .field("throttle", &self.throttle)
            .field("token_reset_after", &self.token_reset_after)
            .field("id_factory", &self.id_factory.as_ref().map(|_| "custom"))
            .finish()
    }
}
