//! Income tax calculation over a progressive bracket schedule.

pub mod common;
pub mod income_tax;

pub use income_tax::{IncomeTaxCalculator, IncomeTaxError};
