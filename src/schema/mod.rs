mod campaign;
mod charity_request;
mod donation;
mod transaction;
mod withdrawal;

pub use campaign::*;
pub use charity_request::*;
pub use donation::*;
pub use transaction::*;
pub use withdrawal::*;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::AppError;

/// Monetary amounts cross every boundary as decimal strings. This is the one
/// place they are parsed; binary floating point is never involved.
pub fn parse_amount(field: &str, value: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(value.trim())
        .map_err(|_| AppError::Validation(format!("{field} is not a valid decimal: {value:?}")))
}
