use super::input::coerce_number;
use super::types::{
    BasicCompoundInputs, CalculationResult, CalculationSummary, RecurringCompoundInputs,
    YearlyBreakdownRow,
};

/// Lump-sum compound growth.
///
/// The yearly rows step whole years by `(1 + r/n)^n`, including a partial final year,
/// while the summary uses the exact fractional exponent `n × months / 12`. For
/// durations that are not whole years the last row therefore overshoots the summary.
pub fn run_basic_compound(inputs: &BasicCompoundInputs) -> CalculationResult {
    let principal = coerce_number(inputs.principal);
    let annual_rate = coerce_number(inputs.annual_rate);
    let n = inputs.frequency.periods_per_year() as f64;
    let total_months = inputs.duration.total_months();
    let total_years = total_months.div_ceil(12);

    let period_factor = 1.0 + annual_rate / n;
    let year_factor = period_factor.powf(n);

    let mut breakdown = Vec::with_capacity(total_years as usize);
    let mut balance = principal;
    for year in 1..=total_years {
        let opening = balance;
        let closing = opening * year_factor;
        balance = closing;
        breakdown.push(YearlyBreakdownRow {
            year,
            principal: opening,
            interest: closing - opening,
            final_amount: closing,
        });
    }

    let final_amount = principal * period_factor.powf(n * (total_months as f64 / 12.0));

    CalculationResult {
        summary: CalculationSummary::new(final_amount, principal),
        breakdown,
    }
}

/// Lump sum plus monthly deposits, compounding monthly whatever the rate basis.
///
/// Each month: deposit, accrue interest on the post-deposit balance, capitalise.
pub fn run_recurring_compound(inputs: &RecurringCompoundInputs) -> CalculationResult {
    let principal = coerce_number(inputs.principal);
    let deposit = coerce_number(inputs.monthly_deposit);
    let monthly_rate = coerce_number(inputs.annual_rate()) / 12.0;
    let total_months = inputs.duration.total_months();
    let total_years = total_months.div_ceil(12);

    let mut breakdown = Vec::with_capacity(total_years as usize);
    let mut balance = principal;
    for year in 1..=total_years {
        let months_in_year = months_in_year(year, total_months);
        if months_in_year == 0 && total_months > 0 {
            continue;
        }

        let opening = balance;
        let deposits = deposit * months_in_year as f64;
        let mut interest = 0.0;
        let mut running = opening;
        for _ in 0..months_in_year {
            running += deposit;
            let accrued = running * monthly_rate;
            interest += accrued;
            running += accrued;
        }

        let closing = opening + deposits + interest;
        balance = closing;
        breakdown.push(YearlyBreakdownRow {
            year,
            principal: opening + deposits,
            interest,
            final_amount: closing,
        });
    }

    let total_principal = principal + deposit * total_months as f64;

    CalculationResult {
        summary: CalculationSummary::new(balance, total_principal),
        breakdown,
    }
}

fn months_in_year(year: u32, total_months: u32) -> u32 {
    if u64::from(year) * 12 > u64::from(total_months) {
        total_months % 12
    } else {
        12
    }
}
