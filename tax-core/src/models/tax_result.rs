use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax owed within one bracket after the withholding offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLevel {
    pub level: String,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Income left after every allowance was subtracted.
    pub taxable_income: Decimal,

    /// Tax still owed; zero whenever `tax_refund` is positive.
    pub total_tax: Decimal,

    /// Withholding paid in excess of the tax owed.
    pub tax_refund: Decimal,

    /// One entry per bracket, in schedule order.
    pub levels: Vec<TaxLevel>,
}
