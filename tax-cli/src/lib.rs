pub mod config;
pub mod logging;
pub mod replay;

pub use config::{AllowanceSettings, ConfigError, LoggingSettings, TaxConfig};
pub use replay::{Operation, ReplayError, ReplaySummary, Session};
