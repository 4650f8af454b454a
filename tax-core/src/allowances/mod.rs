//! Allowance caps and validation of caller-supplied allowances.

mod registry;
mod validator;

pub use registry::{AllowanceRegistry, CapBounds, CapRangeError};
pub use validator::{AllowanceError, validate, with_personal_allowance};
