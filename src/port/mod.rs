//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points of the core. They are traits that
//! adapters implement to integrate with external systems.
//!
//! # Available Ports
//!
//! - [`HttpTransport`] - One HTTP GET against the external market API
//! - [`StationNameStore`] - Durable second tier for station names
//! - [`HistoryStore`] - Durable store for regional trade history

pub mod outbound;

pub use outbound::store::{HistoryStore, StationNameStore};
pub use outbound::transport::{HttpRequest, HttpResponse, HttpTransport};
