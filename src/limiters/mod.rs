//! Limiter variants and the event loop they share.
//!
//! Both variants keep every piece of mutable state inside one spawned task
//! and talk to it exclusively through value-carrying messages:
//!
//! - [`MaxConcurrencyLimiter`]: a serialized core tracks active leases and
//!   waiting callers, enforcing a concurrency ceiling. A companion sweeper
//!   task feeds reclamation ticks into the same event channel.
//! - [`ThrottleLimiter`]: a pacer loop lets one waiting caller through per
//!   tick of a fixed interval, with no ceiling.
//!
//! Because a task processes one event at a time, "check capacity → grant →
//! record" is atomic without a mutex, and double releases cannot corrupt
//! state regardless of how callers interleave.

mod manager;
pub use manager::LimiterStats;
pub(crate) use manager::{Core, Event};

mod max_concurrency;
pub use max_concurrency::*;

mod sweeper;

mod throttle;
pub use throttle::*;
