use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The allowance categories the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowanceType {
    Donation,
    KReceipt,
    Personal,
}

impl AllowanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
            Self::Personal => "personal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            "personal" => Some(Self::Personal),
            _ => None,
        }
    }
}

impl std::fmt::Display for AllowanceType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum amount that may be claimed per allowance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceCaps {
    pub donation: Decimal,
    pub k_receipt: Decimal,
    pub personal: Decimal,
}

impl AllowanceCaps {
    pub const DEFAULT_DONATION: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);
    pub const DEFAULT_K_RECEIPT: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);
    pub const DEFAULT_PERSONAL: Decimal = Decimal::from_parts(60_000, 0, 0, false, 0);

    pub fn cap(
        &self,
        allowance_type: AllowanceType,
    ) -> Decimal {
        match allowance_type {
            AllowanceType::Donation => self.donation,
            AllowanceType::KReceipt => self.k_receipt,
            AllowanceType::Personal => self.personal,
        }
    }
}

impl Default for AllowanceCaps {
    fn default() -> Self {
        Self {
            donation: Self::DEFAULT_DONATION,
            k_receipt: Self::DEFAULT_K_RECEIPT,
            personal: Self::DEFAULT_PERSONAL,
        }
    }
}

/// An allowance that has passed validation and been clamped to its cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub allowance_type: AllowanceType,
    pub amount: Decimal,
}

/// An allowance as supplied by the caller, before validation.
///
/// The type is kept as a raw string so that unrecognised names surface as
/// an allowance error rather than a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AllowanceEntry {
    #[serde(default)]
    pub allowance_type: String,
    #[serde(default, deserialize_with = "super::deserialize_number")]
    pub amount: Decimal,
}

impl AllowanceEntry {
    pub fn new(
        allowance_type: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            allowance_type: allowance_type.into(),
            amount,
        }
    }
}
