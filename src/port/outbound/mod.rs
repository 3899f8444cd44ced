//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the market API
//! transport and the persistence collaborators.

pub mod store;
pub mod transport;
