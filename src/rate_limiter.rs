//! Top-level entrypoint that wires the limiter variants.
//!
//! The crate ships two variants behind one facade: a concurrency ceiling
//! ([`MaxConcurrencyLimiter`]) and fixed-interval pacing ([`ThrottleLimiter`]).
//! Callers that know which variant they want can also use the concrete types
//! directly.

use std::{fmt, time::Duration};

use crate::{Lease, LeasegateError, LimiterConfig, MaxConcurrencyLimiter, ThrottleLimiter};

/// Rate limiter entrypoint.
///
/// Wraps either limiter variant behind a single acquire/release surface,
/// chosen at construction time.
pub struct RateLimiter {
    variant: Variant,
}

enum Variant {
    MaxConcurrency(MaxConcurrencyLimiter),
    Throttle(ThrottleLimiter),
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Variant::MaxConcurrency(limiter) => limiter.fmt(f),
            Variant::Throttle(limiter) => limiter.fmt(f),
        }
    }
}

impl RateLimiter {
    /// Build the concurrency-ceiling variant.
    ///
    /// See [`MaxConcurrencyLimiter::start`].
    ///
    /// # Errors
    ///
    /// [`LeasegateError::InvalidLimit`] when `config.limit` is zero.
    pub fn max_concurrency(config: LimiterConfig) -> Result<Self, LeasegateError> {
        Ok(Self {
            variant: Variant::MaxConcurrency(MaxConcurrencyLimiter::start(config)?),
        })
    }

    /// Build the fixed-interval pacing variant.
    ///
    /// See [`ThrottleLimiter::start`].
    ///
    /// # Errors
    ///
    /// [`LeasegateError::InvalidThrottle`] when `config.throttle` is zero.
    pub fn throttle(config: LimiterConfig) -> Result<Self, LeasegateError> {
        Ok(Self {
            variant: Variant::Throttle(ThrottleLimiter::start(config)?),
        })
    }

    /// Acquire a lease, blocking until the variant grants one.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::Closed`] when the limiter has been shut down.
    pub async fn acquire(&self) -> Result<Lease, LeasegateError> {
        match &self.variant {
            Variant::MaxConcurrency(limiter) => limiter.acquire().await,
            Variant::Throttle(limiter) => limiter.acquire().await,
        }
    }

    /// Acquire a lease, giving up after `deadline`.
    ///
    /// # Errors
    ///
    /// [`LeasegateError::AcquireTimeout`] when the deadline elapses first,
    /// [`LeasegateError::Closed`] when the limiter has been shut down.
    pub async fn acquire_timeout(&self, deadline: Duration) -> Result<Lease, LeasegateError> {
        match &self.variant {
            Variant::MaxConcurrency(limiter) => limiter.acquire_timeout(deadline).await,
            Variant::Throttle(limiter) => limiter.acquire_timeout(deadline).await,
        }
    }

    /// Return a lease to the limiter. Non-blocking and idempotent.
    pub fn release(&self, lease: Lease) {
        match &self.variant {
            Variant::MaxConcurrency(limiter) => limiter.release(lease),
            Variant::Throttle(limiter) => limiter.release(lease),
        }
    }

    /// Stop the variant's background tasks. Idempotent.
    pub fn shutdown(&self) {
        match &self.variant {
            Variant::MaxConcurrency(limiter) => limiter.shutdown(),
            Variant::Throttle(limiter) => limiter.shutdown(),
        }
    }
}
