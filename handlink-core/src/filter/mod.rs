//! Temporal filtering of angle vectors
//!
//! Applied in order: the smoother pulls the raw target toward the previous
//! output, then the rate limiter bounds how far that result may move in a
//! single frame.

pub mod rate_limit;
pub mod smoother;

pub use rate_limit::RateLimiter;
pub use smoother::Smoother;
