//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root wiring the caches into a [`MarketCore`]
//! - [`config`] - Configuration loading and validation
//! - [`universe`] - Static universe file loader

pub mod bootstrap;
pub mod config;
pub mod universe;

pub use bootstrap::{MarketCore, Stores};
