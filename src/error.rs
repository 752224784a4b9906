use std::time::Duration;

/// Error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum LeasegateError {
    /// The concurrency ceiling was zero at construction.
    #[error("concurrency limit must be greater than zero")]
    InvalidLimit,
    /// The throttle interval was zero at construction.
    #[error("throttle interval must be greater than zero")]
    InvalidThrottle,
    /// An acquire deadline elapsed before a lease could be granted.
    #[error("no lease became available within {0:?}")]
    AcquireTimeout(Duration),
    /// The limiter's background task is no longer running.
    #[error("limiter is shut down")]
    Closed,
}
