use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use sacjd_core::amortization::sacjd::{self, SacjdInput};
use sacjd_core::PeriodType;

use crate::input;

/// Arguments for a SACJD schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Borrowed capital
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate as a decimal (0.12 = 12%)
    #[arg(long, alias = "nominal-rate")]
    pub rate: Option<Decimal>,

    /// Number of amortizing installments
    #[arg(long, alias = "installment-count")]
    pub installments: Option<u32>,

    /// Interest-only grace periods before the first installment
    #[arg(long, alias = "grace-periods", default_value_t = 0)]
    pub grace: u32,

    /// Period length: annual or semiannual (1 or 2 also accepted)
    #[arg(long, default_value = "annual")]
    pub period_type: PeriodType,

    /// Emit a row for every grace period
    #[arg(long)]
    pub include_grace_rows: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: SacjdInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SacjdInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            nominal_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            installment_count: args
                .installments
                .ok_or("--installments is required (or provide --input)")?,
            grace_periods: args.grace,
            period_type: args.period_type,
            include_grace_rows: args.include_grace_rows,
        }
    };

    let result = sacjd::calculate_sacjd_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
