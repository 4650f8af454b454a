use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` for the open-ended top bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub label: String,
}

impl TaxBracket {
    pub fn new(
        min_income: i64,
        max_income: Option<i64>,
        rate_percent: i64,
        label: &str,
    ) -> Self {
        Self {
            min_income: Decimal::from(min_income),
            max_income: max_income.map(Decimal::from),
            tax_rate: Decimal::new(rate_percent, 2),
            label: label.to_string(),
        }
    }
}

/// An ordered, non-overlapping set of brackets covering all incomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    pub fn new(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    /// The five-bracket progressive schedule.
    pub fn standard() -> Self {
        Self::new(vec![
            TaxBracket::new(0, Some(150_000), 0, "0-150,000"),
            TaxBracket::new(150_001, Some(500_000), 10, "150,001-500,000"),
            TaxBracket::new(500_001, Some(1_000_000), 15, "500,001-1,000,000"),
            TaxBracket::new(1_000_001, Some(2_000_000), 20, "1,000,001-2,000,000"),
            TaxBracket::new(2_000_001, None, 35, "2,000,001 ขึ้นไป"),
        ])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
