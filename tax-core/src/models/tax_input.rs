use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Allowance;

/// Validated input to the tax engine.
///
/// Negative income, withholding and allowance amounts are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub total_income: Decimal,
    pub withholding_tax_paid: Decimal,
    pub allowances: Vec<Allowance>,
}
