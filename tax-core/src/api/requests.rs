use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::deserialize_number;
use crate::{AllowanceEntry, TaxError, TaxLevel, TaxResult};

/// Body of a tax calculation request.
///
/// Decoding is strict: unknown fields are rejected at every level and
/// amounts must be JSON numbers. Missing fields default to zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComputeRequest {
    #[serde(default, deserialize_with = "deserialize_number")]
    pub total_income: Decimal,

    #[serde(
        default,
        rename = "wht",
        alias = "withholdingTaxPaid",
        deserialize_with = "deserialize_number"
    )]
    pub withholding_tax_paid: Decimal,

    #[serde(default)]
    pub allowances: Vec<AllowanceEntry>,
}

impl ComputeRequest {
    /// Decodes a request body.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::MalformedInput`] if the body is not valid JSON,
    /// has a field of the wrong type or carries an unknown field.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_core::{ComputeRequest, TaxError};
    ///
    /// let ok = ComputeRequest::from_json(r#"{"totalIncome": 500000, "wht": 0}"#);
    /// assert!(ok.is_ok());
    ///
    /// let err = ComputeRequest::from_json(r#"{"totalIncome": "invalid"}"#);
    /// assert!(matches!(err, Err(TaxError::MalformedInput(_))));
    /// ```
    pub fn from_json(body: &str) -> Result<Self, TaxError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Result of a tax calculation as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub tax: Decimal,

    /// Omitted from the output unless a refund applies.
    #[serde(default, skip_serializing_if = "Decimal::is_zero")]
    pub tax_refund: Decimal,

    pub tax_level: Vec<TaxLevel>,
}

impl From<TaxResult> for ComputeResponse {
    fn from(result: TaxResult) -> Self {
        Self {
            tax: result.total_tax,
            tax_refund: result.tax_refund,
            tax_level: result.levels,
        }
    }
}

/// Body of either administrative cap update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCapRequest {
    #[serde(default, deserialize_with = "deserialize_number")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDeductionResponse {
    pub personal_deduction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KReceiptDeductionResponse {
    pub k_receipt: Decimal,
}
