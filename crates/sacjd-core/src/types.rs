use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::SacjdError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Decimal places used for every presented monetary amount.
pub const MONEY_DP: u32 = 2;

/// Length of one schedule period relative to the quoted rate.
///
/// Deserializes from the numeric codes `1` (annual) and `2` (semiannual)
/// as well as from the lowercase names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "PeriodTypeRepr")]
pub enum PeriodType {
    #[default]
    Annual,
    Semiannual,
}

impl PeriodType {
    /// Number of schedule periods per year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            PeriodType::Annual => 1,
            PeriodType::Semiannual => 2,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Annual => write!(f, "annual"),
            PeriodType::Semiannual => write!(f, "semiannual"),
        }
    }
}

impl TryFrom<u8> for PeriodType {
    type Error = SacjdError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PeriodType::Annual),
            2 => Ok(PeriodType::Semiannual),
            other => Err(SacjdError::InvalidParameter {
                field: "period_type".into(),
                reason: format!("Unknown period type code {other} (expected 1 = annual, 2 = semiannual)"),
            }),
        }
    }
}

impl FromStr for PeriodType {
    type Err = SacjdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "1" => Ok(PeriodType::Annual),
            "semiannual" | "semi-annual" | "2" => Ok(PeriodType::Semiannual),
            other => Err(SacjdError::InvalidParameter {
                field: "period_type".into(),
                reason: format!("Unknown period type '{other}' (expected annual or semiannual)"),
            }),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PeriodTypeRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<PeriodTypeRepr> for PeriodType {
    type Error = SacjdError;

    fn try_from(repr: PeriodTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            PeriodTypeRepr::Code(code) => PeriodType::try_from(code),
            PeriodTypeRepr::Name(name) => name.parse(),
        }
    }
}

/// Round a full-precision amount for presentation: 2 dp, midpoint away from
/// zero, fixed scale. Never feed the result back into an accumulator.
pub fn round_money(value: Decimal) -> Money {
    let mut rounded = value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // drop the sign of a rounded-away residual such as -1e-25
        rounded = Decimal::ZERO;
    }
    rounded.rescale(MONEY_DP);
    rounded
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
