//! Rate-limited access to the external market API.
//!
//! - [`RateLimitedFetcher`]: single, paginated and batch fetches under one
//!   process-wide concurrency ceiling
//! - [`Paginated`]: merged pages plus the pages that were dropped
//! - [`BatchOutcome`]: one optional result per batch item

mod batch;
mod fetcher;

pub use batch::{BatchOutcome, ProgressFn};
pub use fetcher::{
    Paginated, RateLimitedFetcher, DEFAULT_BATCH_WORKERS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_PROGRESS_INTERVAL, EXPIRES_HEADER, MAX_PAGES, PAGES_HEADER,
};
