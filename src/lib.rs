#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod rate_limiter;
pub use rate_limiter::*;

mod limiters;
pub use limiters::*;

mod lease;
pub use lease::*;

mod error;
pub use error::*;

mod common;
pub use common::*;

#[cfg(test)]
mod tests;
