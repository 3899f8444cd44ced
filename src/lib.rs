//! Tradelane - market data caching and jump routing for a space trading game.
//!
//! The crate keeps several independently aging datasets fresh under
//! concurrent demand without exceeding the market API's concurrency ceiling,
//! and answers reachability and shortest-path queries over the static
//! universe graph.
//!
//! # Modules
//!
//! - [`domain`] - Identifiers, market record shapes, the universe graph and routing
//! - [`port`] - Traits for the HTTP transport and persistence collaborators
//! - [`adapter`] - reqwest transport, in-memory stores and the CLI
//! - [`application`] - Rate-limited fetcher and the tiered caches built on it
//! - [`infrastructure`] - Configuration, logging, universe loading and wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scripted transport and fixtures for integration tests
//!
//! # Example
//!
//! ```no_run
//! use tradelane::infrastructure::config::Config;
//! use tradelane::infrastructure::MarketCore;
//!
//! # async fn run() -> tradelane::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let core = MarketCore::bootstrap(&config)?;
//! let nearby = core.universe.reachable_within(30_000_142.into(), 3, 0.5);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
