pub mod client;
pub mod rate_limit;

pub use client::FinnhubClient;
pub use rate_limit::{RateLimitSnapshot, RateLimitTracker};
