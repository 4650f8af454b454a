use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Deserializes a decimal that must be written as a number.
///
/// Quoted values such as `"500000"` are rejected so that a field of the
/// wrong type is reported as malformed input.
pub(crate) fn deserialize_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| serde::de::Error::custom(format!("number {text} is out of range")))
}
