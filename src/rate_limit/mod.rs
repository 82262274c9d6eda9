//! Rate limiting for outbound messages.

pub mod token_bucket;

pub use token_bucket::RateLimiter;
