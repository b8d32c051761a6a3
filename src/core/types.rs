use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PeriodUnit {
    Years,
    Months,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RateBasis {
    Annual,
    Monthly,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompoundingFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }

    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        match periods {
            1 => Some(CompoundingFrequency::Annually),
            2 => Some(CompoundingFrequency::SemiAnnually),
            4 => Some(CompoundingFrequency::Quarterly),
            12 => Some(CompoundingFrequency::Monthly),
            365 => Some(CompoundingFrequency::Daily),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Duration {
    pub count: u32,
    pub unit: PeriodUnit,
}

impl Duration {
    pub fn years(count: u32) -> Self {
        Self {
            count,
            unit: PeriodUnit::Years,
        }
    }

    pub fn months(count: u32) -> Self {
        Self {
            count,
            unit: PeriodUnit::Months,
        }
    }

    pub fn total_months(self) -> u32 {
        match self.unit {
            PeriodUnit::Years => self.count.saturating_mul(12),
            PeriodUnit::Months => self.count,
        }
    }
}

/// Lump-sum growth. `annual_rate` is a fraction (7% = 0.07).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicCompoundInputs {
    pub principal: f64,
    pub duration: Duration,
    pub annual_rate: f64,
    pub frequency: CompoundingFrequency,
}

/// Lump sum plus a fixed deposit at the start of every month.
///
/// `rate` is a fraction on the basis named by `rate_basis`; a monthly rate is turned
/// into an annual one by multiplying by 12, never by compounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecurringCompoundInputs {
    pub principal: f64,
    pub monthly_deposit: f64,
    pub duration: Duration,
    pub rate: f64,
    pub rate_basis: RateBasis,
}

impl RecurringCompoundInputs {
    pub fn annual_rate(&self) -> f64 {
        match self.rate_basis {
            RateBasis::Annual => self.rate,
            RateBasis::Monthly => self.rate * 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub monthly_expense: f64,
    pub inflation_rate: f64,
    pub return_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalInputs {
    pub target_fund: f64,
    pub current_assets: f64,
    pub years_to_retirement: u32,
    pub annual_rate: f64,
    pub monthly_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyBreakdownRow {
    pub year: u32,
    pub principal: f64,
    pub interest: f64,
    pub final_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSummary {
    pub final_amount: f64,
    pub total_principal: f64,
    pub total_interest: f64,
}

impl CalculationSummary {
    pub fn new(final_amount: f64, total_principal: f64) -> Self {
        Self {
            final_amount,
            total_principal,
            total_interest: final_amount - total_principal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub summary: CalculationSummary,
    pub breakdown: Vec<YearlyBreakdownRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementFund {
    pub required_fund: f64,
    pub years_to_retirement: u32,
    pub future_monthly_expense: f64,
    pub future_annual_expense: f64,
    pub real_return_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResult {
    pub projected_assets: f64,
    pub target_fund: f64,
    /// Negative when the projection falls short of the target.
    pub surplus: f64,
    pub growth_from_principal: f64,
    pub growth_from_contributions: f64,
    pub total_contributions: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_monthly_contribution: Option<f64>,
    /// Annual percent, strictly between 0 and 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_return_rate: Option<f64>,
}

impl GoalResult {
    pub fn is_short(&self) -> bool {
        self.surplus < 0.0
    }
}
