//! Adapter for the game's public market API (ESI).

pub mod settings;
pub mod transport;

pub use settings::EsiConfig;
pub use transport::ReqwestTransport;
