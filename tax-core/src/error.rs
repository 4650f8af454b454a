use thiserror::Error;

use crate::allowances::{AllowanceError, CapRangeError};
use crate::calculations::IncomeTaxError;

/// Every way a tax request can be rejected.
///
/// None of these are fatal: the registry is untouched and other requests
/// are unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// The request body did not match the expected schema.
    #[error("Invalid JSON: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Allowance(#[from] AllowanceError),

    #[error(transparent)]
    CapRange(#[from] CapRangeError),

    #[error(transparent)]
    Calculation(#[from] IncomeTaxError),
}

impl From<serde_json::Error> for TaxError {
    fn from(err: serde_json::Error) -> Self {
        TaxError::MalformedInput(err.to_string())
    }
}
