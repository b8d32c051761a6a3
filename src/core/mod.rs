mod compound;
mod goal;
pub mod input;
mod retirement;
mod solver;
mod types;

pub use compound::{run_basic_compound, run_recurring_compound};
pub use goal::{
    default_target_fund, default_years_to_retirement, future_value_lump_sum,
    future_value_of_contributions, project_goal, projected_assets_at_rate,
};
pub use retirement::{RetirementError, required_retirement_fund};
pub use solver::{RateSolveConfig, RateSolveResult, solve_required_rate};
pub use types::{
    BasicCompoundInputs, CalculationResult, CalculationSummary, CompoundingFrequency, Duration,
    GoalInputs, GoalResult, PeriodUnit, RateBasis, RecurringCompoundInputs, RetirementFund,
    RetirementInputs, YearlyBreakdownRow,
};
