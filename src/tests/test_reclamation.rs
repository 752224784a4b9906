use std::{sync::Arc, time::Duration};

use crate::{LeasegateError, LimiterConfig, MaxConcurrencyLimiter};

fn limiter(limit: usize, token_reset_after: Duration) -> MaxConcurrencyLimiter {
    MaxConcurrencyLimiter::start(LimiterConfig {
        limit,
        token_reset_after,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn unreturned_lease_is_reclaimed_after_the_ttl() {
    let limiter = Arc::new(limiter(1, Duration::from_secs(2)));

    let first = limiter.acquire().await.unwrap();

    let waiter = {
        let limiter = Arc::clone(&limiter);
        tokio::spawn(async move { limiter.acquire().await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!waiter.is_finished());

    // halfway through the TTL nothing has been reclaimed
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!waiter.is_finished());

    // the sweep fires at the TTL boundary and frees the slot
    let second = waiter.await.unwrap().unwrap();
    assert_ne!(first.id(), second.id());

    // the reclaimed lease is stale now; returning it must not free a slot
    limiter.release(first);
    tokio::time::sleep(Duration::from_millis(1)).await;

    let stats = limiter.stats().await.unwrap();
    assert_eq!(stats.active, 1);
    assert_eq!(stats.pending, 0);
}

#[tokio::test(start_paused = true)]
async fn sweep_reclaims_every_expired_lease() {
    let limiter = limiter(3, Duration::from_secs(1));

    let _a = limiter.acquire().await.unwrap();
    let _b = limiter.acquire().await.unwrap();
    let _c = limiter.acquire().await.unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let stats = limiter.stats().await.unwrap();
    assert_eq!(stats.active, 0);
}

#[tokio::test(start_paused = true)]
async fn zero_reset_after_never_reclaims() {
    let limiter = limiter(1, Duration::ZERO);

    let _held = limiter.acquire().await.unwrap();

    // with reclamation disabled a forgotten lease blocks forever
    let res = limiter.acquire_timeout(Duration::from_secs(60)).await;
    assert!(matches!(res, Err(LeasegateError::AcquireTimeout(_))));

    let stats = limiter.stats().await.unwrap();
    assert_eq!(stats.active, 1);
}

#[tokio::test(start_paused = true)]
async fn released_lease_is_absent_from_the_next_sweep() {
    let limiter = limiter(2, Duration::from_secs(1));

    let a = limiter.acquire().await.unwrap();
    let _b = limiter.acquire().await.unwrap();

    // returned just before the sweep; the tick must not double-free its slot
    tokio::time::sleep(Duration::from_millis(900)).await;
    limiter.release(a);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stats = limiter.stats().await.unwrap();
    assert_eq!(stats.active, 0);
    assert_eq!(stats.pending, 0);
}
