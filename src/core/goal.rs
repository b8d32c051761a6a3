use super::input::coerce_number;
use super::solver::{RateSolveConfig, solve_required_rate};
use super::types::{GoalInputs, GoalResult, RetirementFund};

/// `amount × (1 + annual_rate)^years`, compounded annually.
pub fn future_value_lump_sum(amount: f64, annual_rate: f64, years: u32) -> f64 {
    amount * (1.0 + annual_rate).powf(years as f64)
}

/// Future value of `total_months` end-of-month contributions at `annual_rate / 12`.
///
/// At a zero rate the annuity factor degenerates to `total_months`.
pub fn future_value_of_contributions(monthly: f64, annual_rate: f64, total_months: u32) -> f64 {
    if total_months == 0 {
        return 0.0;
    }
    monthly * annuity_factor(annual_rate / 12.0, total_months)
}

/// Assets at retirement if everything in `inputs` but the return rate is kept.
pub fn projected_assets_at_rate(inputs: &GoalInputs, annual_rate: f64) -> f64 {
    let total_months = total_months(inputs.years_to_retirement);
    future_value_lump_sum(inputs.current_assets, annual_rate, inputs.years_to_retirement)
        + future_value_of_contributions(inputs.monthly_contribution, annual_rate, total_months)
}

/// Projects assets at retirement against the target and, on a shortfall, works out the
/// monthly contribution or annual return that would close it.
pub fn project_goal(inputs: &GoalInputs) -> GoalResult {
    let inputs = sanitize(inputs);
    let total_months = total_months(inputs.years_to_retirement);

    let fv_current = future_value_lump_sum(
        inputs.current_assets,
        inputs.annual_rate,
        inputs.years_to_retirement,
    );
    let fv_contributions = future_value_of_contributions(
        inputs.monthly_contribution,
        inputs.annual_rate,
        total_months,
    );
    let projected_assets = fv_current + fv_contributions;
    let surplus = projected_assets - inputs.target_fund;
    let total_contributions = inputs.monthly_contribution * total_months as f64;

    let mut result = GoalResult {
        projected_assets,
        target_fund: inputs.target_fund,
        surplus,
        growth_from_principal: fv_current - inputs.current_assets,
        growth_from_contributions: fv_contributions - total_contributions,
        total_contributions,
        required_monthly_contribution: None,
        required_return_rate: None,
    };

    if surplus < 0.0 {
        let needed_from_contributions = inputs.target_fund - fv_current;
        if needed_from_contributions > 0.0 && total_months > 0 {
            let factor = annuity_factor(inputs.annual_rate / 12.0, total_months);
            result.required_monthly_contribution = Some(needed_from_contributions / factor);
        }

        if inputs.target_fund > inputs.current_assets {
            let solved = solve_required_rate(&inputs, RateSolveConfig::default());
            result.required_return_rate = solved.solved_rate.map(|rate| rate * 100.0);
        }
    }

    result
}

/// Target suggested from a retirement plan, rounded to the currency unit.
pub fn default_target_fund(plan: &RetirementFund) -> f64 {
    plan.required_fund.round()
}

pub fn default_years_to_retirement(current_age: u32, retirement_age: u32) -> Option<u32> {
    (retirement_age > current_age).then(|| retirement_age - current_age)
}

fn annuity_factor(monthly_rate: f64, total_months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return total_months as f64;
    }
    ((1.0 + monthly_rate).powf(total_months as f64) - 1.0) / monthly_rate
}

fn total_months(years: u32) -> u32 {
    years.saturating_mul(12)
}

fn sanitize(inputs: &GoalInputs) -> GoalInputs {
    GoalInputs {
        target_fund: coerce_number(inputs.target_fund),
        current_assets: coerce_number(inputs.current_assets),
        years_to_retirement: inputs.years_to_retirement,
        annual_rate: coerce_number(inputs.annual_rate),
        monthly_contribution: coerce_number(inputs.monthly_contribution),
    }
}
