use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{AllowanceCaps, AllowanceType};

/// Rejection of an administrative cap update.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapRangeError {
    #[error("{allowance_type} amount cannot be less than {min}")]
    BelowMinimum {
        allowance_type: AllowanceType,
        amount: Decimal,
        min: Decimal,
    },

    #[error("{allowance_type} amount cannot be more than {max}")]
    AboveMaximum {
        allowance_type: AllowanceType,
        amount: Decimal,
        max: Decimal,
    },
}

/// Inclusive bounds an administrator may set a cap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl CapBounds {
    pub const PERSONAL: CapBounds = CapBounds {
        min: Decimal::from_parts(10_000, 0, 0, false, 0),
        max: Decimal::from_parts(100_000, 0, 0, false, 0),
    };

    pub const K_RECEIPT: CapBounds = CapBounds {
        min: Decimal::ZERO,
        max: Decimal::from_parts(100_000, 0, 0, false, 0),
    };

    /// Checks `amount` against the bounds for `allowance_type`.
    pub fn check(
        &self,
        allowance_type: AllowanceType,
        amount: Decimal,
    ) -> Result<Decimal, CapRangeError> {
        if amount < self.min {
            return Err(CapRangeError::BelowMinimum {
                allowance_type,
                amount,
                min: self.min,
            });
        }
        if amount > self.max {
            return Err(CapRangeError::AboveMaximum {
                allowance_type,
                amount,
                max: self.max,
            });
        }
        Ok(amount)
    }
}

/// The caps an administrator may change; the donation cap is fixed.
#[derive(Debug, Clone, Copy)]
enum AdjustableCap {
    Personal,
    KReceipt,
}

impl AdjustableCap {
    fn allowance_type(self) -> AllowanceType {
        match self {
            Self::Personal => AllowanceType::Personal,
            Self::KReceipt => AllowanceType::KReceipt,
        }
    }

    fn bounds(self) -> CapBounds {
        match self {
            Self::Personal => CapBounds::PERSONAL,
            Self::KReceipt => CapBounds::K_RECEIPT,
        }
    }

    fn slot(
        self,
        caps: &mut AllowanceCaps,
    ) -> &mut Decimal {
        match self {
            Self::Personal => &mut caps.personal,
            Self::KReceipt => &mut caps.k_receipt,
        }
    }
}

/// Shared, runtime-adjustable allowance caps.
///
/// Readers take a full [`AllowanceCaps`] snapshot so that one request sees
/// a single consistent set of caps even while an update is in flight.
/// Share between callers with `Arc<AllowanceRegistry>`.
#[derive(Debug, Default)]
pub struct AllowanceRegistry {
    caps: RwLock<AllowanceCaps>,
}

impl AllowanceRegistry {
    pub fn new(caps: AllowanceCaps) -> Self {
        Self {
            caps: RwLock::new(caps),
        }
    }

    /// Copy of the caps currently in force.
    pub fn snapshot(&self) -> AllowanceCaps {
        *self.read()
    }

    /// Sets the personal allowance cap.
    ///
    /// # Errors
    ///
    /// Returns [`CapRangeError`] unless `10,000 <= amount <= 100,000`. The
    /// registry is left unchanged on error.
    pub fn update_personal_cap(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, CapRangeError> {
        self.update(AdjustableCap::Personal, amount)
    }

    /// Sets the k-receipt allowance cap.
    ///
    /// # Errors
    ///
    /// Returns [`CapRangeError`] unless `0 <= amount <= 100,000`. The
    /// registry is left unchanged on error.
    pub fn update_k_receipt_cap(
        &self,
        amount: Decimal,
    ) -> Result<Decimal, CapRangeError> {
        self.update(AdjustableCap::KReceipt, amount)
    }

    fn update(
        &self,
        target: AdjustableCap,
        amount: Decimal,
    ) -> Result<Decimal, CapRangeError> {
        let allowance_type = target.allowance_type();
        let amount = target
            .bounds()
            .check(allowance_type, amount)
            .inspect_err(|error| {
                warn!(%allowance_type, %amount, %error, "cap update rejected");
            })?;

        let previous = {
            let mut caps = self.write();
            std::mem::replace(target.slot(&mut caps), amount)
        };

        info!(%allowance_type, %previous, current = %amount, "allowance cap updated");
        Ok(amount)
    }

    // The caps are plain data, so a writer that panicked cannot leave them
    // half-updated; recover the guard instead of propagating the poison.
    fn read(&self) -> RwLockReadGuard<'_, AllowanceCaps> {
        self.caps.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AllowanceCaps> {
        self.caps.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn default_registry_uses_default_caps() {
        let registry = AllowanceRegistry::default();

        let caps = registry.snapshot();

        assert_eq!(caps.donation, dec!(100000));
        assert_eq!(caps.k_receipt, dec!(50000));
        assert_eq!(caps.personal, dec!(60000));
    }

    #[test]
    fn new_registry_keeps_supplied_caps() {
        let caps = AllowanceCaps {
            personal: dec!(70000),
            ..AllowanceCaps::default()
        };

        let registry = AllowanceRegistry::new(caps);

        assert_eq!(registry.snapshot(), caps);
    }

    // =========================================================================
    // update_personal_cap tests
    // =========================================================================

    #[test]
    fn update_personal_cap_accepts_bounds() {
        let registry = AllowanceRegistry::default();

        assert_eq!(registry.update_personal_cap(dec!(10000)), Ok(dec!(10000)));
        assert_eq!(registry.update_personal_cap(dec!(100000)), Ok(dec!(100000)));
        assert_eq!(registry.snapshot().personal, dec!(100000));
    }

    #[test]
    fn update_personal_cap_rejects_below_minimum() {
        let registry = AllowanceRegistry::default();

        let result = registry.update_personal_cap(dec!(9999.99));

        assert_eq!(
            result,
            Err(CapRangeError::BelowMinimum {
                allowance_type: AllowanceType::Personal,
                amount: dec!(9999.99),
                min: dec!(10000),
            })
        );
        assert_eq!(registry.snapshot().personal, dec!(60000));
    }

    #[test]
    fn update_personal_cap_rejects_above_maximum() {
        let registry = AllowanceRegistry::default();

        let result = registry.update_personal_cap(dec!(100001));

        assert_eq!(
            result,
            Err(CapRangeError::AboveMaximum {
                allowance_type: AllowanceType::Personal,
                amount: dec!(100001),
                max: dec!(100000),
            })
        );
        assert_eq!(registry.snapshot().personal, dec!(60000));
    }

    #[test]
    fn update_personal_cap_leaves_other_caps_untouched() {
        let registry = AllowanceRegistry::default();

        registry.update_personal_cap(dec!(70000)).unwrap();

        let caps = registry.snapshot();
        assert_eq!(caps.k_receipt, dec!(50000));
        assert_eq!(caps.donation, dec!(100000));
    }

    // =========================================================================
    // update_k_receipt_cap tests
    // =========================================================================

    #[test]
    fn update_k_receipt_cap_accepts_zero() {
        let registry = AllowanceRegistry::default();

        assert_eq!(registry.update_k_receipt_cap(dec!(0)), Ok(dec!(0)));
        assert_eq!(registry.snapshot().k_receipt, dec!(0));
    }

    #[test]
    fn update_k_receipt_cap_rejects_negative() {
        let registry = AllowanceRegistry::default();

        let result = registry.update_k_receipt_cap(dec!(-1));

        assert!(matches!(result, Err(CapRangeError::BelowMinimum { .. })));
        assert_eq!(registry.snapshot().k_receipt, dec!(50000));
    }

    #[test]
    fn update_k_receipt_cap_rejects_above_maximum() {
        let registry = AllowanceRegistry::default();

        let result = registry.update_k_receipt_cap(dec!(100000.1));

        assert!(matches!(result, Err(CapRangeError::AboveMaximum { .. })));
    }

    #[test]
    fn cap_range_error_names_type_and_bound() {
        let registry = AllowanceRegistry::default();

        let error = registry.update_personal_cap(dec!(5)).unwrap_err();

        assert_eq!(error.to_string(), "personal amount cannot be less than 10000");
    }

    // =========================================================================
    // concurrency tests
    // =========================================================================

    #[test]
    fn concurrent_updates_never_produce_a_torn_snapshot() {
        let registry = Arc::new(AllowanceRegistry::default());

        thread::scope(|scope| {
            for i in 0..4u32 {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    for j in 0..250u32 {
                        let amount = Decimal::from(10_000 + (i * 250 + j) * 10);
                        registry.update_personal_cap(amount).unwrap();
                        registry.update_k_receipt_cap(amount).unwrap();
                    }
                });
            }
            for _ in 0..4 {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    for _ in 0..250 {
                        let caps = registry.snapshot();
                        assert!(caps.personal >= dec!(10000) && caps.personal <= dec!(19990));
                        assert!(caps.k_receipt == dec!(50000) || caps.k_receipt >= dec!(10000));
                        assert_eq!(caps.donation, dec!(100000));
                    }
                });
            }
        });

        let caps = registry.snapshot();
        assert!(caps.personal >= dec!(10000) && caps.personal <= dec!(100000));
    }
}
