use super::input::coerce_number;
use super::types::{RetirementFund, RetirementInputs};

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RetirementError {
    #[error("retirement age must exceed current age")]
    AgeOrdering,
    #[error("return rate must exceed inflation rate")]
    RateOrdering,
}

impl RetirementError {
    pub fn code(self) -> &'static str {
        match self {
            RetirementError::AgeOrdering => "ageOrdering",
            RetirementError::RateOrdering => "rateOrdering",
        }
    }
}

/// Sizes the fund needed at retirement as a real-return perpetuity.
///
/// Today's spending is inflated to the retirement date, then divided by
/// `return_rate - inflation_rate`. The drawdown phase is treated as infinite.
pub fn required_retirement_fund(
    inputs: &RetirementInputs,
) -> Result<RetirementFund, RetirementError> {
    if inputs.retirement_age <= inputs.current_age {
        return Err(RetirementError::AgeOrdering);
    }

    let inflation = coerce_number(inputs.inflation_rate);
    let return_rate = coerce_number(inputs.return_rate);
    if return_rate <= inflation {
        return Err(RetirementError::RateOrdering);
    }

    let years_to_retirement = inputs.retirement_age - inputs.current_age;
    let monthly_expense = coerce_number(inputs.monthly_expense);
    let inflation_factor = (1.0 + inflation).powf(years_to_retirement as f64);
    let future_annual_expense = monthly_expense * 12.0 * inflation_factor;
    let real_return_rate = return_rate - inflation;

    Ok(RetirementFund {
        required_fund: future_annual_expense / real_return_rate,
        years_to_retirement,
        future_monthly_expense: monthly_expense * inflation_factor,
        future_annual_expense,
        real_return_rate,
    })
}
