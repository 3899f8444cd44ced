//! Application services: rate-limited fetching and the caches built on it.

pub mod cache;
pub mod fetch;
