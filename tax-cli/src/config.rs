//! TOML configuration for the `taxcalc` binary.
//!
//! ```toml
//! [allowances]
//! personal = 60000
//! k_receipt = 50000
//!
//! [logging]
//! level = "info"
//! file = "taxcalc.log"
//! ```
//!
//! Every key is optional. Initial caps must fall inside the same ranges the
//! administrative updates enforce.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::allowances::{CapBounds, CapRangeError};
use tax_core::{AllowanceCaps, AllowanceRegistry, AllowanceType};
use thiserror::Error;

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid initial cap: {0}")]
    InvalidCap(#[from] CapRangeError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxConfig {
    #[serde(default)]
    pub allowances: AllowanceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Initial values for the adjustable allowance caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowanceSettings {
    #[serde(default = "default_personal")]
    pub personal: Decimal,

    #[serde(default = "default_k_receipt")]
    pub k_receipt: Decimal,
}

impl Default for AllowanceSettings {
    fn default() -> Self {
        Self {
            personal: default_personal(),
            k_receipt: default_k_receipt(),
        }
    }
}

fn default_personal() -> Decimal {
    AllowanceCaps::DEFAULT_PERSONAL
}

fn default_k_receipt() -> Decimal {
    AllowanceCaps::DEFAULT_K_RECEIPT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Any `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file to append to in addition to stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl TaxConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TaxConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the initial caps against the administrative update ranges.
    pub fn validate(&self) -> Result<(), CapRangeError> {
        CapBounds::PERSONAL.check(AllowanceType::Personal, self.allowances.personal)?;
        CapBounds::K_RECEIPT.check(AllowanceType::KReceipt, self.allowances.k_receipt)?;
        Ok(())
    }

    pub fn caps(&self) -> AllowanceCaps {
        AllowanceCaps {
            personal: self.allowances.personal,
            k_receipt: self.allowances.k_receipt,
            ..AllowanceCaps::default()
        }
    }

    /// Builds a registry seeded with the configured caps.
    pub fn registry(&self) -> AllowanceRegistry {
        AllowanceRegistry::new(self.caps())
    }
}
