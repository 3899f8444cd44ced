//! Infrastructure configuration modules.

pub mod cache;
pub mod logging;
pub mod settings;

pub use cache::CacheConfig;
pub use logging::LoggingConfig;
pub use settings::Config;
