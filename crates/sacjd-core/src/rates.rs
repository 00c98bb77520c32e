use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::SacjdError;
use crate::types::{PeriodType, Rate};
use crate::SacjdResult;

/// Per-period rate equivalent to `nominal` for the given period length.
///
/// Semiannual periods use the geometric half-period rate
/// `(1 + nominal)^0.5 - 1`; annual periods use `nominal` as quoted.
pub fn effective_rate(nominal: Rate, period_type: PeriodType) -> SacjdResult<Rate> {
    match period_type {
        PeriodType::Annual => Ok(nominal),
        PeriodType::Semiannual => (Decimal::ONE + nominal)
            .sqrt()
            .map(|root| root - Decimal::ONE)
            .ok_or_else(|| SacjdError::NumericDegenerate {
                context: format!("semiannual rate conversion of {nominal}"),
            }),
    }
}

/// Compound a per-period rate over `periods` periods: `(1 + r)^k - 1`.
pub fn compound_rate(periodic: Rate, periods: u32) -> Rate {
    (Decimal::ONE + periodic).powu(u64::from(periods)) - Decimal::ONE
}
