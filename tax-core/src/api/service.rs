use std::sync::Arc;

use tracing::{debug, warn};

use crate::allowances::{AllowanceRegistry, validate};
use crate::calculations::IncomeTaxCalculator;
use crate::{
    ComputeRequest, ComputeResponse, KReceiptDeductionResponse, PersonalDeductionResponse,
    TaxError, TaxInput, TaxSchedule, UpdateCapRequest,
};

/// Entry point for tax calculations and administrative cap updates.
///
/// The registry is shared, so several services (or request handlers) built
/// from clones of the same `Arc` see each other's updates immediately.
/// Callers of the update methods are assumed to be authenticated already.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use rust_decimal_macros::dec;
/// use tax_core::{AllowanceRegistry, TaxService, UpdateCapRequest};
///
/// let service = TaxService::new(Arc::new(AllowanceRegistry::default()));
///
/// let response = service
///     .calculate_json(r#"{"totalIncome": 500000, "wht": 0, "allowances": []}"#)
///     .unwrap();
/// assert_eq!(response.tax, dec!(29000.0));
///
/// service
///     .update_personal_deduction(&UpdateCapRequest { amount: dec!(100000) })
///     .unwrap();
///
/// let response = service
///     .calculate_json(r#"{"totalIncome": 500000}"#)
///     .unwrap();
/// assert_eq!(response.tax, dec!(25000.0));
/// ```
#[derive(Debug, Clone)]
pub struct TaxService {
    registry: Arc<AllowanceRegistry>,
    schedule: TaxSchedule,
}

impl TaxService {
    /// Creates a service using the standard bracket schedule.
    pub fn new(registry: Arc<AllowanceRegistry>) -> Self {
        Self::with_schedule(registry, TaxSchedule::standard())
    }

    pub fn with_schedule(
        registry: Arc<AllowanceRegistry>,
        schedule: TaxSchedule,
    ) -> Self {
        Self { registry, schedule }
    }

    pub fn registry(&self) -> &Arc<AllowanceRegistry> {
        &self.registry
    }

    pub fn schedule(&self) -> &TaxSchedule {
        &self.schedule
    }

    /// Validates the request's allowances and calculates the tax.
    ///
    /// The caps are read once, so validation and the injected personal
    /// allowance agree even if an update lands mid-request.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::Allowance`] for rejected allowances and
    /// [`TaxError::Calculation`] if the engine fails.
    pub fn calculate(
        &self,
        request: &ComputeRequest,
    ) -> Result<ComputeResponse, TaxError> {
        let caps = self.registry.snapshot();
        let allowances = validate(&request.allowances, &caps)?;

        let input = TaxInput {
            total_income: request.total_income,
            withholding_tax_paid: request.withholding_tax_paid,
            allowances,
        };
        debug!(
            total_income = %input.total_income,
            withholding = %input.withholding_tax_paid,
            allowances = input.allowances.len(),
            "calculating tax"
        );

        let result = IncomeTaxCalculator::new(self.schedule.brackets()).calculate(&input)?;
        Ok(result.into())
    }

    /// Decodes a JSON request body and calculates the tax.
    ///
    /// Nothing is calculated when decoding fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::MalformedInput`] for a body that does not match
    /// the request schema, otherwise as [`TaxService::calculate`].
    pub fn calculate_json(
        &self,
        body: &str,
    ) -> Result<ComputeResponse, TaxError> {
        let request = ComputeRequest::from_json(body)
            .inspect_err(|error| warn!(%error, "tax request rejected"))?;
        self.calculate(&request)
    }

    /// Sets the personal allowance cap used for later calculations.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::CapRange`] unless `10,000 <= amount <= 100,000`.
    pub fn update_personal_deduction(
        &self,
        request: &UpdateCapRequest,
    ) -> Result<PersonalDeductionResponse, TaxError> {
        let personal_deduction = self.registry.update_personal_cap(request.amount)?;
        Ok(PersonalDeductionResponse { personal_deduction })
    }

    /// Sets the k-receipt allowance cap used for later calculations.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::CapRange`] unless `0 <= amount <= 100,000`.
    pub fn update_k_receipt_deduction(
        &self,
        request: &UpdateCapRequest,
    ) -> Result<KReceiptDeductionResponse, TaxError> {
        let k_receipt = self.registry.update_k_receipt_cap(request.amount)?;
        Ok(KReceiptDeductionResponse { k_receipt })
    }
}

impl Default for TaxService {
    fn default() -> Self {
        Self::new(Arc::new(AllowanceRegistry::default()))
    }
}
