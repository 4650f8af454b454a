pub mod allowances;
pub mod api;
pub mod calculations;
pub mod error;
pub mod models;

pub use allowances::{AllowanceError, AllowanceRegistry, CapRangeError};
pub use api::{
    ComputeRequest, ComputeResponse, KReceiptDeductionResponse, PersonalDeductionResponse,
    TaxService, UpdateCapRequest,
};
pub use calculations::{IncomeTaxCalculator, IncomeTaxError};
pub use error::TaxError;
pub use models::*;
