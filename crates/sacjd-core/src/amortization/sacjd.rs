//! SACJD amortization schedules.
//!
//! Constant capital amortization where interest accrued during a grace
//! period, and each period's own accrual, is redistributed evenly across the
//! installments still outstanding. All arithmetic runs on
//! `rust_decimal::Decimal` at full precision; amounts are rounded to cents
//! only when the presentation records are built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::SacjdError;
use crate::rates::effective_rate;
use crate::types::{round_money, with_metadata, ComputationOutput, Money, PeriodType, Rate};
use crate::SacjdResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Loan parameters for one schedule calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SacjdInput {
    /// Total borrowed capital.
    pub principal: Money,
    /// Rate per year as quoted, before any period conversion.
    pub nominal_rate: Rate,
    /// Number of amortizing installments.
    pub installment_count: u32,
    /// Interest-only periods before the first installment.
    #[serde(default)]
    pub grace_periods: u32,
    #[serde(default)]
    pub period_type: PeriodType,
    /// Emit one row per grace period ahead of the installments.
    #[serde(default)]
    pub include_grace_rows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Grace,
    Installment,
}

/// A single period of the schedule.
///
/// [`project_periods`] returns these at full precision;
/// [`calculate_sacjd_schedule`] returns them rounded via [`PeriodRecord::rounded`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period_number: u32,
    pub period_kind: PeriodKind,
    /// Accrued interest including this period's accrual.
    pub interest_accrued_before: Money,
    /// Divisor used to redistribute the accrued interest.
    pub remaining_installments: u32,
    pub interest_portion: Money,
    pub capital_portion: Money,
    /// Capital portion + interest portion.
    pub total_installment_value: Money,
    pub interest_accrued_after: Money,
    pub remaining_capital_after: Money,
}

impl PeriodRecord {
    /// Copy of the record with every monetary field rounded to cents.
    pub fn rounded(&self) -> PeriodRecord {
        PeriodRecord {
            period_number: self.period_number,
            period_kind: self.period_kind,
            interest_accrued_before: round_money(self.interest_accrued_before),
            remaining_installments: self.remaining_installments,
            interest_portion: round_money(self.interest_portion),
            capital_portion: round_money(self.capital_portion),
            total_installment_value: round_money(self.total_installment_value),
            interest_accrued_after: round_money(self.interest_accrued_after),
            remaining_capital_after: round_money(self.remaining_capital_after),
        }
    }
}

/// Totals over the whole schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub installment_count: u32,
    pub grace_periods: u32,
    pub total_capital_repaid: Money,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    /// Interest accrued during the grace periods, carried into the first installment.
    pub grace_interest_accrued: Money,
    pub first_installment: Money,
    pub last_installment: Money,
}

/// Output of a SACJD schedule calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SacjdOutput {
    /// Per-period rate actually applied (full precision).
    pub effective_rate: Rate,
    pub capital_portion: Money,
    pub periods: Vec<PeriodRecord>,
    pub summary: ScheduleSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a SACJD schedule: rounded period records, totals and metadata.
pub fn calculate_sacjd_schedule(
    input: &SacjdInput,
) -> SacjdResult<ComputationOutput<SacjdOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let Projection {
        rate,
        capital_portion,
        periods: flows,
    } = project(input)?;

    if input.nominal_rate.is_zero() {
        warnings.push("Nominal rate is zero; schedule carries no interest".into());
    }
    if input.grace_periods > 0 && !input.include_grace_rows {
        warnings.push(format!(
            "{} grace period(s) accrue interest without rows; the accrual is folded into installment 1",
            input.grace_periods
        ));
    }

    let summary = summarize(input, rate, &flows)?;
    let periods: Vec<PeriodRecord> = flows.iter().map(PeriodRecord::rounded).collect();

    let output = SacjdOutput {
        effective_rate: rate,
        capital_portion: round_money(capital_portion),
        periods,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SACJD — constant capital amortization with redistributed grace interest",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "nominal_rate": input.nominal_rate.to_string(),
            "effective_rate": rate.to_string(),
            "installment_count": input.installment_count,
            "grace_periods": input.grace_periods,
            "period_type": input.period_type,
            "include_grace_rows": input.include_grace_rows,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Full-precision schedule rows, grace rows first when requested.
///
/// Validation happens before any arithmetic; on error no rows are produced.
pub fn project_periods(input: &SacjdInput) -> SacjdResult<Vec<PeriodRecord>> {
    project(input).map(|projection| projection.periods)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

struct Projection {
    rate: Rate,
    capital_portion: Money,
    periods: Vec<PeriodRecord>,
}

fn project(input: &SacjdInput) -> SacjdResult<Projection> {
    validate_sacjd_input(input)?;

    let rate = effective_rate(input.nominal_rate, input.period_type)?;
    let n = input.installment_count;
    let capital_portion = input.principal / Decimal::from(n);

    debug!(
        principal = %input.principal,
        effective_rate = %rate,
        installments = n,
        grace_periods = input.grace_periods,
        include_grace_rows = input.include_grace_rows,
        "projecting SACJD schedule"
    );

    let grace_rows = if input.include_grace_rows {
        input.grace_periods as usize
    } else {
        0
    };
    let mut periods: Vec<PeriodRecord> = Vec::with_capacity(grace_rows + n as usize);
    let mut accrued = Decimal::ZERO;
    let mut remaining_capital = input.principal;

    // Grace: capital is untouched, so every period accrues on the full principal.
    for g in 1..=input.grace_periods {
        accrued = accrue(accrued, remaining_capital, rate, "grace", g)?;
        if input.include_grace_rows {
            periods.push(PeriodRecord {
                period_number: g,
                period_kind: PeriodKind::Grace,
                interest_accrued_before: accrued,
                remaining_installments: n,
                interest_portion: Decimal::ZERO,
                capital_portion: Decimal::ZERO,
                total_installment_value: Decimal::ZERO,
                interest_accrued_after: accrued,
                remaining_capital_after: remaining_capital,
            });
        }
    }

    let offset = grace_rows as u32;
    for i in 1..=n {
        accrued = accrue(accrued, remaining_capital, rate, "installment", i)?;
        let interest_accrued_before = accrued;

        // Counts down from the full installment count whatever the grace length.
        let remaining_installments = n - i + 1;
        let interest_portion = accrued / Decimal::from(remaining_installments);
        let total_installment_value = capital_portion
            .checked_add(interest_portion)
            .ok_or_else(|| overflow(format!("installment {i} total value")))?;

        remaining_capital -= capital_portion;
        accrued -= interest_portion;

        periods.push(PeriodRecord {
            period_number: offset + i,
            period_kind: PeriodKind::Installment,
            interest_accrued_before,
            remaining_installments,
            interest_portion,
            capital_portion,
            total_installment_value,
            interest_accrued_after: accrued,
            remaining_capital_after: remaining_capital,
        });
    }

    debug!(rows = periods.len(), "SACJD schedule complete");
    Ok(Projection {
        rate,
        capital_portion,
        periods,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_sacjd_input(input: &SacjdInput) -> SacjdResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(SacjdError::InvalidParameter {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.nominal_rate < Decimal::ZERO {
        return Err(SacjdError::InvalidParameter {
            field: "nominal_rate".into(),
            reason: "Nominal rate cannot be negative".into(),
        });
    }
    if input.installment_count == 0 {
        return Err(SacjdError::InvalidParameter {
            field: "installment_count".into(),
            reason: "At least one installment is required".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `accrued + capital * rate`, or an error when the accrual leaves Decimal range.
fn accrue(accrued: Money, capital: Money, rate: Rate, phase: &str, period: u32) -> SacjdResult<Money> {
    capital
        .checked_mul(rate)
        .and_then(|interest| accrued.checked_add(interest))
        .ok_or_else(|| overflow(format!("{phase} period {period} interest accrual")))
}

fn overflow(context: String) -> SacjdError {
    SacjdError::NumericDegenerate {
        context: format!("{context} (exceeds Decimal range)"),
    }
}

fn checked_sum(mut values: impl Iterator<Item = Money>, what: &str) -> SacjdResult<Money> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| overflow(what.to_string()))
    })
}

fn summarize(input: &SacjdInput, rate: Rate, flows: &[PeriodRecord]) -> SacjdResult<ScheduleSummary> {
    let installments = || {
        flows
            .iter()
            .filter(|p| p.period_kind == PeriodKind::Installment)
    };

    let total_capital_repaid = checked_sum(installments().map(|p| p.capital_portion), "total capital repaid")?;
    let total_interest_paid = checked_sum(installments().map(|p| p.interest_portion), "total interest paid")?;
    let total_paid = total_capital_repaid
        .checked_add(total_interest_paid)
        .ok_or_else(|| overflow("total paid".into()))?;
    let first_installment = installments()
        .next()
        .map(|p| p.total_installment_value)
        .unwrap_or(Decimal::ZERO);
    let last_installment = installments()
        .last()
        .map(|p| p.total_installment_value)
        .unwrap_or(Decimal::ZERO);

    // Capital is untouched during grace, so each grace period accrues on the full principal.
    let grace_interest_accrued = input
        .principal
        .checked_mul(rate)
        .and_then(|per_period| per_period.checked_mul(Decimal::from(input.grace_periods)))
        .ok_or_else(|| overflow("grace interest accrued".into()))?;

    Ok(ScheduleSummary {
        installment_count: input.installment_count,
        grace_periods: input.grace_periods,
        total_capital_repaid: round_money(total_capital_repaid),
        total_interest_paid: round_money(total_interest_paid),
        total_paid: round_money(total_paid),
        grace_interest_accrued: round_money(grace_interest_accrued),
        first_installment: round_money(first_installment),
        last_installment: round_money(last_installment),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn one_year_grace_loan() -> SacjdInput {
        SacjdInput {
            principal: dec!(100_000),
            nominal_rate: dec!(0.12),
            installment_count: 5,
            grace_periods: 1,
            period_type: PeriodType::Annual,
            include_grace_rows: false,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Period-by-period values
    // -----------------------------------------------------------------------
    #[test]
    fn test_schedule_period_by_period() {
        let flows = project_periods(&one_year_grace_loan()).unwrap();
        assert_eq!(flows.len(), 5);

        // (accrued before, interest portion, total, accrued after, capital after)
        let expected = [
            (dec!(24000), dec!(4800), dec!(24800), dec!(19200), dec!(80000)),
            (dec!(28800), dec!(7200), dec!(27200), dec!(21600), dec!(60000)),
            (dec!(28800), dec!(9600), dec!(29600), dec!(19200), dec!(40000)),
            (dec!(24000), dec!(12000), dec!(32000), dec!(12000), dec!(20000)),
            (dec!(14400), dec!(14400), dec!(34400), dec!(0), dec!(0)),
        ];

        for (p, (before, interest, total, after, capital)) in flows.iter().zip(expected) {
            assert_eq!(p.interest_accrued_before, before, "period {}", p.period_number);
            assert_eq!(p.interest_portion, interest, "period {}", p.period_number);
            assert_eq!(p.capital_portion, dec!(20000));
            assert_eq!(p.total_installment_value, total, "period {}", p.period_number);
            assert_eq!(p.interest_accrued_after, after, "period {}", p.period_number);
            assert_eq!(p.remaining_capital_after, capital, "period {}", p.period_number);
        }
    }

    #[test]
    fn test_installment_numbering_without_grace_rows() {
        let flows = project_periods(&one_year_grace_loan()).unwrap();
        let numbers: Vec<u32> = flows.iter().map(|p| p.period_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert!(flows.iter().all(|p| p.period_kind == PeriodKind::Installment));
    }

    // -----------------------------------------------------------------------
    // 2. Redistribution denominator ignores elapsed grace periods
    // -----------------------------------------------------------------------
    #[test]
    fn test_denominator_counts_down_from_installment_count() {
        let mut input = one_year_grace_loan();
        input.grace_periods = 3;
        input.include_grace_rows = true;
        let flows = project_periods(&input).unwrap();

        let divisors: Vec<u32> = flows.iter().map(|p| p.remaining_installments).collect();
        assert_eq!(divisors, vec![5, 5, 5, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_grace_interest_front_loads_first_installment() {
        let with_grace = project_periods(&one_year_grace_loan()).unwrap();
        let mut input = one_year_grace_loan();
        input.grace_periods = 0;
        let without_grace = project_periods(&input).unwrap();

        // 24000 / 5 vs 12000 / 5
        assert_eq!(with_grace[0].interest_portion, dec!(4800));
        assert_eq!(without_grace[0].interest_portion, dec!(2400));
    }

    // -----------------------------------------------------------------------
    // 3. Grace rows
    // -----------------------------------------------------------------------
    #[test]
    fn test_grace_rows_are_zeroed() {
        let mut input = one_year_grace_loan();
        input.grace_periods = 2;
        input.include_grace_rows = true;
        let flows = project_periods(&input).unwrap();
        assert_eq!(flows.len(), 7);

        let grace = &flows[..2];
        assert_eq!(grace[0].interest_accrued_before, dec!(12000));
        assert_eq!(grace[1].interest_accrued_before, dec!(24000));
        for row in grace {
            assert_eq!(row.period_kind, PeriodKind::Grace);
            assert!(row.interest_portion.is_zero());
            assert!(row.capital_portion.is_zero());
            assert!(row.total_installment_value.is_zero());
            assert_eq!(row.interest_accrued_after, row.interest_accrued_before);
            assert_eq!(row.remaining_capital_after, dec!(100_000));
        }

        assert_eq!(flows[2].period_number, 3);
        assert_eq!(flows[2].period_kind, PeriodKind::Installment);
        // 2 * 12000 grace + 12000 own accrual
        assert_eq!(flows[2].interest_accrued_before, dec!(36000));
    }

    #[test]
    fn test_grace_rows_do_not_change_installments() {
        let mut input = one_year_grace_loan();
        input.grace_periods = 2;
        let hidden = project_periods(&input).unwrap();
        input.include_grace_rows = true;
        let shown = project_periods(&input).unwrap();

        let shown_installments: Vec<&PeriodRecord> = shown
            .iter()
            .filter(|p| p.period_kind == PeriodKind::Installment)
            .collect();
        assert_eq!(shown_installments.len(), hidden.len());
        for (a, b) in hidden.iter().zip(shown_installments) {
            assert_eq!(a.interest_portion, b.interest_portion);
            assert_eq!(a.total_installment_value, b.total_installment_value);
            assert_eq!(a.period_number + 2, b.period_number);
        }
    }

    // -----------------------------------------------------------------------
    // 4. Rounding and envelope
    // -----------------------------------------------------------------------
    #[test]
    fn test_rounding_is_presentation_only() {
        let input = SacjdInput {
            principal: dec!(100_000),
            nominal_rate: dec!(0.07),
            installment_count: 3,
            grace_periods: 0,
            period_type: PeriodType::Annual,
            include_grace_rows: false,
        };
        let flows = project_periods(&input).unwrap();
        // 100000 / 3 keeps full precision internally
        assert!(flows[0].capital_portion.scale() > 2);

        let output = calculate_sacjd_schedule(&input).unwrap();
        let presented = &output.result.periods;
        assert_eq!(presented[0].capital_portion.to_string(), "33333.33");
        assert_eq!(presented[2].remaining_capital_after.to_string(), "0.00");
        assert_eq!(presented[2].interest_accrued_after.to_string(), "0.00");
    }

    #[test]
    fn test_warnings() {
        let output = calculate_sacjd_schedule(&one_year_grace_loan()).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("folded into installment 1"));

        let mut input = one_year_grace_loan();
        input.nominal_rate = Decimal::ZERO;
        input.include_grace_rows = true;
        let output = calculate_sacjd_schedule(&input).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("no interest"));
    }

    #[test]
    fn test_summary_totals() {
        let output = calculate_sacjd_schedule(&one_year_grace_loan()).unwrap();
        let s = &output.result.summary;
        assert_eq!(s.total_capital_repaid, dec!(100000.00));
        assert_eq!(s.total_interest_paid, dec!(48000.00));
        assert_eq!(s.total_paid, dec!(148000.00));
        assert_eq!(s.grace_interest_accrued, dec!(12000.00));
        assert_eq!(s.first_installment, dec!(24800.00));
        assert_eq!(s.last_installment, dec!(34400.00));
    }

    #[test]
    fn test_metadata_populated() {
        let output = calculate_sacjd_schedule(&one_year_grace_loan()).unwrap();
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
        assert!(!output.metadata.version.is_empty());
        assert_eq!(output.assumptions["installment_count"], 5);
        assert_eq!(output.assumptions["period_type"], "annual");
    }

    // -----------------------------------------------------------------------
    // 5. Validation
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_zero_installments() {
        let mut input = one_year_grace_loan();
        input.installment_count = 0;
        match project_periods(&input) {
            Err(SacjdError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "installment_count")
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_non_positive_principal() {
        let mut input = one_year_grace_loan();
        input.principal = Decimal::ZERO;
        assert!(matches!(
            calculate_sacjd_schedule(&input),
            Err(SacjdError::InvalidParameter { .. })
        ));
        input.principal = dec!(-1);
        assert!(calculate_sacjd_schedule(&input).is_err());
    }

    #[test]
    fn test_validation_negative_rate() {
        let mut input = one_year_grace_loan();
        input.nominal_rate = dec!(-0.01);
        match calculate_sacjd_schedule(&input) {
            Err(SacjdError::InvalidParameter { field, .. }) => assert_eq!(field, "nominal_rate"),
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_accrual_beyond_decimal_range_is_an_error() {
        let input = SacjdInput {
            principal: dec!(50_000_000_000_000_000_000_000_000_000),
            nominal_rate: dec!(1),
            installment_count: 2,
            grace_periods: 1,
            period_type: PeriodType::Annual,
            include_grace_rows: true,
        };
        // 5e28 of grace accrual plus 5e28 on installment 1 exceeds Decimal::MAX
        match project_periods(&input) {
            Err(SacjdError::NumericDegenerate { context }) => {
                assert!(context.contains("installment period 1"), "{context}")
            }
            other => panic!("Expected NumericDegenerate, got {other:?}"),
        }
        assert!(matches!(
            calculate_sacjd_schedule(&input),
            Err(SacjdError::NumericDegenerate { .. })
        ));
    }

    #[test]
    fn test_near_decimal_max_principal_still_schedules() {
        let input = SacjdInput {
            principal: dec!(30_000_000_000_000_000_000_000_000_000),
            nominal_rate: dec!(0.5),
            installment_count: 1,
            grace_periods: 0,
            period_type: PeriodType::Annual,
            include_grace_rows: false,
        };
        let output = calculate_sacjd_schedule(&input).unwrap();
        let row = &output.result.periods[0];
        assert_eq!(row.interest_portion, dec!(15_000_000_000_000_000_000_000_000_000));
        assert_eq!(row.total_installment_value, dec!(45_000_000_000_000_000_000_000_000_000));
        assert_eq!(row.remaining_capital_after, Decimal::ZERO);
    }

    #[test]
    fn test_envelope_rate_matches_projection() {
        let mut input = one_year_grace_loan();
        input.period_type = PeriodType::Semiannual;
        let output = calculate_sacjd_schedule(&input).unwrap();
        let expected = effective_rate(dec!(0.12), PeriodType::Semiannual).unwrap();
        assert_eq!(output.result.effective_rate, expected);
        assert_eq!(output.result.capital_portion.to_string(), "20000.00");
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: SacjdInput = serde_json::from_str(
            r#"{"principal": "1000", "nominal_rate": "0.1", "installment_count": 4}"#,
        )
        .unwrap();
        assert_eq!(input.grace_periods, 0);
        assert_eq!(input.period_type, PeriodType::Annual);
        assert!(!input.include_grace_rows);
    }

    #[test]
    fn test_negative_grace_rejected_at_deserialization() {
        let parsed = serde_json::from_str::<SacjdInput>(
            r#"{"principal": "1000", "nominal_rate": "0.1", "installment_count": 4, "grace_periods": -1}"#,
        );
        assert!(parsed.is_err());
    }
}
