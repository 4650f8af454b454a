//! Progressive income tax with a bracket-by-bracket withholding offset.
//!
//! # Algorithm
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income = total income - sum of allowances |
//! | 2    | For each bracket whose lower bound is below taxable income: |
//! | 2a   | Upper = smaller of taxable income or bracket maximum |
//! | 2b   | Taxable in bracket = upper - (bracket minimum - 1) |
//! | 2c   | Bracket tax = taxable in bracket × rate |
//! | 2d   | Withholding still unused is credited against the bracket tax |
//! | 2e   | Bracket tax is rounded to one decimal place and reported |
//! | 3    | Any withholding left after the last bracket is subtracted from the total |
//! | 4    | A negative total becomes a refund |
//! | 5    | Total and refund are rounded to one decimal place |
//!
//! Withholding is consumed greedily from the lowest bracket upward, so a
//! later bracket is only reduced once every earlier bracket is fully offset.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::IncomeTaxCalculator;
//! use tax_core::{Allowance, AllowanceType, TaxInput, TaxSchedule};
//!
//! let schedule = TaxSchedule::standard();
//! let input = TaxInput {
//!     total_income: dec!(500000),
//!     withholding_tax_paid: dec!(25000),
//!     allowances: vec![Allowance {
//!         allowance_type: AllowanceType::Personal,
//!         amount: dec!(60000),
//!     }],
//! };
//!
//! let calculator = IncomeTaxCalculator::new(schedule.brackets());
//! let result = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(4000.0));
//! assert_eq!(result.tax_refund, dec!(0));
//! assert_eq!(result.levels[1].tax, dec!(4000.0));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{min, round_one_dp};
use crate::{Allowance, TaxBracket, TaxInput, TaxLevel, TaxResult};

/// Errors that can occur during an income tax calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeTaxError {
    /// The calculator was built with an empty bracket schedule.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// An intermediate amount exceeded the decimal range.
    #[error("amount out of range during tax calculation")]
    Overflow,
}

/// Calculator for progressive income tax.
///
/// Brackets must be sorted by `min_income` in ascending order; the last
/// bracket normally has `max_income` set to `None`.
#[derive(Debug, Clone)]
pub struct IncomeTaxCalculator<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Calculates tax owed or refunded for an already validated input.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeTaxError`] if:
    /// - No tax brackets were provided
    /// - An amount overflows the decimal range
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> Result<TaxResult, IncomeTaxError> {
        if self.tax_brackets.is_empty() {
            return Err(IncomeTaxError::NoTaxBrackets);
        }

        let taxable_income = self.taxable_income(input.total_income, &input.allowances)?;
        if taxable_income < Decimal::ZERO {
            warn!(
                total_income = %input.total_income,
                taxable_income = %taxable_income,
                "Allowances exceed total income; no bracket tax is due"
            );
        }

        let mut remaining_withholding = input.withholding_tax_paid;
        let mut total_tax = Decimal::ZERO;
        let mut levels = Vec::with_capacity(self.tax_brackets.len());

        for bracket in self.tax_brackets {
            let tax = if taxable_income > bracket.min_income {
                let gross = self.bracket_tax(bracket, taxable_income)?;
                let (net, remaining) = self.offset_withholding(gross, remaining_withholding)?;
                remaining_withholding = remaining;
                round_one_dp(net)
            } else {
                Decimal::ZERO
            };

            debug!(
                level = %bracket.label,
                tax = %tax,
                remaining_withholding = %remaining_withholding,
                "bracket evaluated"
            );

            total_tax = total_tax
                .checked_add(tax)
                .ok_or(IncomeTaxError::Overflow)?;
            levels.push(TaxLevel {
                level: bracket.label.clone(),
                tax,
            });
        }

        let (total_tax, tax_refund) = self.settle(total_tax, remaining_withholding)?;

        debug!(
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            tax_refund = %tax_refund,
            "income tax calculated"
        );

        Ok(TaxResult {
            taxable_income,
            total_tax,
            tax_refund,
            levels,
        })
    }

    /// Subtracts every allowance from total income.
    fn taxable_income(
        &self,
        total_income: Decimal,
        allowances: &[Allowance],
    ) -> Result<Decimal, IncomeTaxError> {
        allowances
            .iter()
            .try_fold(total_income, |income, allowance| {
                income.checked_sub(allowance.amount)
            })
            .ok_or(IncomeTaxError::Overflow)
    }

    /// Gross tax for the slice of income falling inside `bracket`.
    ///
    /// The lower bound is treated as inclusive with a one unit adjustment,
    /// so the first bracket spans 150,001 units and later brackets span
    /// exactly their width.
    fn bracket_tax(
        &self,
        bracket: &TaxBracket,
        taxable_income: Decimal,
    ) -> Result<Decimal, IncomeTaxError> {
        let upper = match bracket.max_income {
            Some(max_income) => min(taxable_income, max_income),
            None => taxable_income,
        };

        bracket
            .min_income
            .checked_sub(Decimal::ONE)
            .and_then(|lower| upper.checked_sub(lower))
            .and_then(|in_bracket| in_bracket.checked_mul(bracket.tax_rate))
            .ok_or(IncomeTaxError::Overflow)
    }

    /// Credits unused withholding against a bracket's tax.
    ///
    /// Returns the bracket tax after the credit and the withholding still
    /// left for later brackets.
    fn offset_withholding(
        &self,
        bracket_tax: Decimal,
        remaining_withholding: Decimal,
    ) -> Result<(Decimal, Decimal), IncomeTaxError> {
        if bracket_tax >= remaining_withholding {
            let net = bracket_tax
                .checked_sub(remaining_withholding)
                .ok_or(IncomeTaxError::Overflow)?;
            Ok((net, Decimal::ZERO))
        } else {
            let remaining = remaining_withholding
                .checked_sub(bracket_tax)
                .ok_or(IncomeTaxError::Overflow)?;
            Ok((Decimal::ZERO, remaining))
        }
    }

    /// Applies leftover withholding and splits the result into tax owed
    /// and refund, both rounded to one decimal place.
    fn settle(
        &self,
        total_tax: Decimal,
        remaining_withholding: Decimal,
    ) -> Result<(Decimal, Decimal), IncomeTaxError> {
        let balance = total_tax
            .checked_sub(remaining_withholding)
            .ok_or(IncomeTaxError::Overflow)?;

        if balance < Decimal::ZERO {
            Ok((Decimal::ZERO, round_one_dp(-balance)))
        } else {
            Ok((round_one_dp(balance), Decimal::ZERO))
        }
    }
}
