use super::goal::projected_assets_at_rate;
use super::types::GoalInputs;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSolveConfig {
    pub search_min: f64,
    pub search_max: f64,
    pub max_iterations: u32,
    /// Lower bound used instead of a non-positive midpoint, which would divide by zero in
    /// the contribution annuity.
    pub rate_floor: f64,
}

impl Default for RateSolveConfig {
    fn default() -> Self {
        Self {
            search_min: 0.0,
            search_max: 1.0,
            max_iterations: 100,
            rate_floor: 1e-9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSolveResult {
    /// Annual rate as a fraction; `None` when even `search_max` does not reach the target.
    pub solved_rate: Option<f64>,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub iterations: u32,
}

/// Bisects the annual return rate at which current assets plus the unchanged monthly
/// contribution grow to `target_fund` in `years_to_retirement`.
///
/// Runs the full iteration budget and reports the upper end of the final bracket, so the
/// reported rate never undershoots the target. Nothing is reported when the bracket
/// never leaves `search_max`.
pub fn solve_required_rate(inputs: &GoalInputs, config: RateSolveConfig) -> RateSolveResult {
    let mut lo = config.search_min;
    let mut hi = config.search_max;
    let mut it = 0;
    while it < config.max_iterations {
        it += 1;
        let mid = (lo + hi) * 0.5;
        if mid <= 0.0 {
            lo = config.rate_floor;
            continue;
        }

        if projected_assets_at_rate(inputs, mid) < inputs.target_fund {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    RateSolveResult {
        solved_rate: (hi < config.search_max).then_some(hi),
        lower_bound: lo,
        upper_bound: hi,
        iterations: it,
    }
}
