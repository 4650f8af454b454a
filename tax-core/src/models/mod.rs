mod allowance;
mod number;
mod tax_bracket;
mod tax_input;
mod tax_result;

pub use allowance::{Allowance, AllowanceCaps, AllowanceEntry, AllowanceType};
pub use tax_bracket::{TaxBracket, TaxSchedule};
pub use tax_input::TaxInput;
pub use tax_result::{TaxLevel, TaxResult};

pub(crate) use number::deserialize_number;
