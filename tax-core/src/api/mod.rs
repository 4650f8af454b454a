//! Request and response shapes, and the façade that ties validation,
//! the cap registry and the tax engine together.

mod requests;
mod service;

pub use requests::{
    ComputeRequest, ComputeResponse, KReceiptDeductionResponse, PersonalDeductionResponse,
    UpdateCapRequest,
};
pub use service::TaxService;
