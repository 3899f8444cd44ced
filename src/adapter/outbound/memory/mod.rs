//! In-memory implementations of the persistence ports.
//!
//! Useful when no durable store is configured; contents live as long as the
//! process.

pub mod store;

pub use store::{MemoryHistoryStore, MemoryStationNameStore};
