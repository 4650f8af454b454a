use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{Allowance, AllowanceCaps, AllowanceEntry, AllowanceType};

/// Reasons a caller-supplied allowance list is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllowanceError {
    #[error("duplicate allowance type: {0}")]
    DuplicateAllowanceType(String),

    /// The personal allowance is always injected and may not be supplied.
    #[error("not allowed type: {0}")]
    ForbiddenAllowanceType(String),

    #[error("invalid allowance type: {0}")]
    UnknownAllowanceType(String),
}

/// Validates caller-supplied allowances against `caps`.
///
/// Entries are checked for forbidden and duplicate types first, then for
/// unknown types. Amounts above their cap are clamped to the cap; amounts
/// are never rejected, and negative amounts pass through unchanged. The
/// personal allowance at the current cap is appended to the result.
///
/// # Errors
///
/// Returns the first [`AllowanceError`] encountered in input order.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::allowances::validate;
/// use tax_core::{AllowanceCaps, AllowanceEntry, AllowanceType};
///
/// let entries = vec![AllowanceEntry::new("donation", dec!(200000))];
///
/// let allowances = validate(&entries, &AllowanceCaps::default()).unwrap();
///
/// assert_eq!(allowances.len(), 2);
/// assert_eq!(allowances[0].amount, dec!(100000)); // clamped
/// assert_eq!(allowances[1].allowance_type, AllowanceType::Personal);
/// assert_eq!(allowances[1].amount, dec!(60000));
/// ```
pub fn validate(
    entries: &[AllowanceEntry],
    caps: &AllowanceCaps,
) -> Result<Vec<Allowance>, AllowanceError> {
    check_types(entries).inspect_err(|error| warn!(%error, "allowances rejected"))?;

    let allowances = entries
        .iter()
        .map(|entry| clamp(entry, caps))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|error| warn!(%error, "allowances rejected"))?;

    Ok(with_personal_allowance(allowances, caps))
}

/// Appends the personal allowance at the cap currently in force.
pub fn with_personal_allowance(
    mut allowances: Vec<Allowance>,
    caps: &AllowanceCaps,
) -> Vec<Allowance> {
    allowances.push(Allowance {
        allowance_type: AllowanceType::Personal,
        amount: caps.personal,
    });
    allowances
}

/// Rejects caller-supplied personal allowances and repeated types.
fn check_types(entries: &[AllowanceEntry]) -> Result<(), AllowanceError> {
    let mut seen = HashSet::with_capacity(entries.len());

    for entry in entries {
        let name = entry.allowance_type.as_str();
        if name == AllowanceType::Personal.as_str() {
            return Err(AllowanceError::ForbiddenAllowanceType(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(AllowanceError::DuplicateAllowanceType(name.to_string()));
        }
    }

    Ok(())
}

fn clamp(
    entry: &AllowanceEntry,
    caps: &AllowanceCaps,
) -> Result<Allowance, AllowanceError> {
    let allowance_type = AllowanceType::parse(&entry.allowance_type)
        .ok_or_else(|| AllowanceError::UnknownAllowanceType(entry.allowance_type.clone()))?;

    let cap = caps.cap(allowance_type);
    let amount = if entry.amount > cap {
        debug!(%allowance_type, requested = %entry.amount, %cap, "allowance clamped to cap");
        cap
    } else {
        entry.amount
    };

    Ok(Allowance {
        allowance_type,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    fn entry(
        allowance_type: &str,
        amount: Decimal,
    ) -> AllowanceEntry {
        AllowanceEntry::new(allowance_type, amount)
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_appends_personal_allowance_to_empty_list() {
        let result = validate(&[], &AllowanceCaps::default());

        assert_eq!(
            result,
            Ok(vec![Allowance {
                allowance_type: AllowanceType::Personal,
                amount: dec!(60000),
            }])
        );
    }

    #[test]
    fn validate_keeps_amounts_within_cap() {
        let entries = vec![entry("donation", dec!(500)), entry("k-receipt", dec!(20000))];

        let result = validate(&entries, &AllowanceCaps::default()).unwrap();

        assert_eq!(
            result,
            vec![
                Allowance {
                    allowance_type: AllowanceType::Donation,
                    amount: dec!(500),
                },
                Allowance {
                    allowance_type: AllowanceType::KReceipt,
                    amount: dec!(20000),
                },
                Allowance {
                    allowance_type: AllowanceType::Personal,
                    amount: dec!(60000),
                },
            ]
        );
    }

    #[test]
    fn validate_clamps_amounts_above_cap() {
        let entries = vec![entry("donation", dec!(200000)), entry("k-receipt", dec!(50000.01))];

        let result = validate(&entries, &AllowanceCaps::default()).unwrap();

        assert_eq!(result[0].amount, dec!(100000));
        assert_eq!(result[1].amount, dec!(50000));
    }

    #[test]
    fn validate_does_not_modify_input() {
        let entries = vec![entry("donation", dec!(200000))];

        validate(&entries, &AllowanceCaps::default()).unwrap();

        assert_eq!(entries[0].amount, dec!(200000));
    }

    #[test]
    fn validate_passes_negative_amounts_through() {
        let entries = vec![entry("donation", dec!(-1000))];

        let result = validate(&entries, &AllowanceCaps::default()).unwrap();

        assert_eq!(result[0].amount, dec!(-1000));
    }

    #[test]
    fn validate_uses_supplied_caps() {
        let caps = AllowanceCaps {
            k_receipt: dec!(10000),
            personal: dec!(80000),
            ..AllowanceCaps::default()
        };
        let entries = vec![entry("k-receipt", dec!(40000))];

        let result = validate(&entries, &caps).unwrap();

        assert_eq!(result[0].amount, dec!(10000));
        assert_eq!(result[1].amount, dec!(80000));
    }

    #[test]
    fn validate_rejects_duplicate_types_regardless_of_amount() {
        let entries = vec![entry("donation", dec!(0)), entry("donation", dec!(100))];

        let result = validate(&entries, &AllowanceCaps::default());

        assert_eq!(
            result,
            Err(AllowanceError::DuplicateAllowanceType("donation".to_string()))
        );
    }

    #[test]
    fn validate_rejects_caller_supplied_personal() {
        let entries = vec![entry("personal", dec!(10))];

        let result = validate(&entries, &AllowanceCaps::default());

        assert_eq!(
            result,
            Err(AllowanceError::ForbiddenAllowanceType("personal".to_string()))
        );
    }

    #[test]
    fn validate_rejects_unknown_type() {
        let entries = vec![entry("donation", dec!(0)), entry("charity", dec!(10))];

        let result = validate(&entries, &AllowanceCaps::default());

        assert_eq!(
            result,
            Err(AllowanceError::UnknownAllowanceType("charity".to_string()))
        );
    }

    #[test]
    fn validate_checks_personal_before_unknown_types() {
        let entries = vec![entry("charity", dec!(10)), entry("personal", dec!(10))];

        let result = validate(&entries, &AllowanceCaps::default());

        assert_eq!(
            result,
            Err(AllowanceError::ForbiddenAllowanceType("personal".to_string()))
        );
    }

    #[test]
    fn validate_reports_duplicate_unknown_types_as_duplicates() {
        let entries = vec![entry("charity", dec!(10)), entry("charity", dec!(10))];

        let result = validate(&entries, &AllowanceCaps::default());

        assert_eq!(
            result,
            Err(AllowanceError::DuplicateAllowanceType("charity".to_string()))
        );
    }

    #[test]
    fn validate_type_names_are_case_sensitive() {
        let entries = vec![entry("Donation", dec!(10))];

        let result = validate(&entries, &AllowanceCaps::default());

        assert_eq!(
            result,
            Err(AllowanceError::UnknownAllowanceType("Donation".to_string()))
        );
    }

    // =========================================================================
    // with_personal_allowance tests
    // =========================================================================

    #[test]
    fn with_personal_allowance_appends_exactly_one_entry() {
        let caps = AllowanceCaps {
            personal: dec!(10000),
            ..AllowanceCaps::default()
        };

        let result = with_personal_allowance(vec![], &caps);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount, dec!(10000));
    }
}
