//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`transport`]: [`ScriptedTransport`](transport::ScriptedTransport), a
//!   deterministic [`HttpTransport`](crate::port::HttpTransport) with call
//!   counters, scripted responses and optional latency.
//! - [`universe`]: small universe graphs for routing tests.
//! - [`market`]: JSON payload builders in the API's shapes.
//! - [`store`]: [`RecordingStore`](store::RecordingStore), a counting,
//!   switchable-failure double for both persistence ports.

pub mod market;
pub mod store;
pub mod transport;
pub mod universe;
