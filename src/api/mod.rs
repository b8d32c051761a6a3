pub mod cli;
pub mod http;

use serde::{Deserialize, Serialize};

use crate::config::FormDefaults;
use crate::core::input::{
    coerce_number, coerce_whole, parse_amount, parse_rate_percent, parse_whole,
};
use crate::core::{
    BasicCompoundInputs, CompoundingFrequency, Duration, GoalInputs, GoalResult, PeriodUnit,
    RateBasis, RecurringCompoundInputs, RetirementInputs, default_target_fund,
    default_years_to_retirement, required_retirement_fund,
};
use crate::error::{ApiError, ApiResult};

/// A form field as sent by a client: either a JSON number or free-form text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn amount(&self) -> f64 {
        match self {
            FieldValue::Number(v) => coerce_number(*v),
            FieldValue::Text(s) => parse_amount(s),
        }
    }

    fn rate_percent(&self) -> f64 {
        match self {
            FieldValue::Number(v) => coerce_number(*v),
            FieldValue::Text(s) => parse_rate_percent(s),
        }
    }

    fn whole(&self) -> u32 {
        match self {
            FieldValue::Number(v) => coerce_whole(*v),
            FieldValue::Text(s) => parse_whole(s),
        }
    }
}

#[cfg(test)]
impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiPeriodUnit {
    #[serde(alias = "year", alias = "y")]
    Years,
    #[serde(alias = "month", alias = "m")]
    Months,
}

impl From<ApiPeriodUnit> for PeriodUnit {
    fn from(value: ApiPeriodUnit) -> Self {
        match value {
            ApiPeriodUnit::Years => PeriodUnit::Years,
            ApiPeriodUnit::Months => PeriodUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRateBasis {
    #[serde(alias = "yearly")]
    Annual,
    Monthly,
}

impl From<ApiRateBasis> for RateBasis {
    fn from(value: ApiRateBasis) -> Self {
        match value {
            ApiRateBasis::Annual => RateBasis::Annual,
            ApiRateBasis::Monthly => RateBasis::Monthly,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicCompoundPayload {
    pub initial_principal: Option<FieldValue>,
    pub period: Option<FieldValue>,
    pub period_unit: Option<ApiPeriodUnit>,
    pub rate: Option<FieldValue>,
    pub compounding_frequency: Option<FieldValue>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecurringCompoundPayload {
    pub initial_principal: Option<FieldValue>,
    pub monthly_deposit: Option<FieldValue>,
    pub period: Option<FieldValue>,
    pub period_unit: Option<ApiPeriodUnit>,
    pub rate: Option<FieldValue>,
    pub rate_unit: Option<ApiRateBasis>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetirementPayload {
    pub current_age: Option<FieldValue>,
    pub retirement_age: Option<FieldValue>,
    pub monthly_expenses: Option<FieldValue>,
    pub inflation_rate: Option<FieldValue>,
    pub return_rate: Option<FieldValue>,
}

impl RetirementPayload {
    fn is_empty(&self) -> bool {
        self.current_age.is_none()
            && self.retirement_age.is_none()
            && self.monthly_expenses.is_none()
            && self.inflation_rate.is_none()
            && self.return_rate.is_none()
    }
}

/// Goal projection fields. The retirement fields are optional context: when the target
/// is absent they size it, and the ages fill in a missing years-to-retirement.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalPayload {
    pub target_fund: Option<FieldValue>,
    pub current_assets: Option<FieldValue>,
    pub years_to_retirement: Option<FieldValue>,
    pub return_rate: Option<FieldValue>,
    pub monthly_contribution: Option<FieldValue>,

    pub current_age: Option<FieldValue>,
    pub retirement_age: Option<FieldValue>,
    pub monthly_expenses: Option<FieldValue>,
    pub inflation_rate: Option<FieldValue>,
    pub retirement_return_rate: Option<FieldValue>,
}

impl GoalPayload {
    fn retirement_payload(&self) -> RetirementPayload {
        RetirementPayload {
            current_age: self.current_age.clone(),
            retirement_age: self.retirement_age.clone(),
            monthly_expenses: self.monthly_expenses.clone(),
            inflation_rate: self.inflation_rate.clone(),
            return_rate: self.retirement_return_rate.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetSource {
    Input,
    RetirementPlan,
    Unset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalRequest {
    pub inputs: GoalInputs,
    pub target_source: TargetSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub target_source: TargetSource,
    pub years_to_retirement: u32,
    #[serde(flatten)]
    pub result: GoalResult,
}

fn amount_or(field: &Option<FieldValue>, default: f64) -> f64 {
    field.as_ref().map_or(default, FieldValue::amount)
}

fn rate_or(field: &Option<FieldValue>, default_percent: f64) -> f64 {
    field.as_ref().map_or(default_percent, FieldValue::rate_percent) / 100.0
}

fn whole_or(field: &Option<FieldValue>, default: u32) -> u32 {
    field.as_ref().map_or(default, FieldValue::whole)
}

pub fn basic_inputs_from_payload(
    payload: &BasicCompoundPayload,
    defaults: &FormDefaults,
) -> ApiResult<BasicCompoundInputs> {
    let periods = whole_or(&payload.compounding_frequency, defaults.basic_frequency);
    let frequency = CompoundingFrequency::from_periods_per_year(periods).ok_or_else(|| {
        ApiError::invalid("compoundingFrequency", "must be one of 1, 2, 4, 12, 365")
    })?;

    Ok(BasicCompoundInputs {
        principal: amount_or(&payload.initial_principal, defaults.basic_principal),
        duration: Duration {
            count: whole_or(&payload.period, defaults.basic_period),
            unit: payload.period_unit.map_or(PeriodUnit::Years, Into::into),
        },
        annual_rate: rate_or(&payload.rate, defaults.basic_rate_percent),
        frequency,
    })
}

pub fn recurring_inputs_from_payload(
    payload: &RecurringCompoundPayload,
    defaults: &FormDefaults,
) -> RecurringCompoundInputs {
    RecurringCompoundInputs {
        principal: amount_or(&payload.initial_principal, defaults.recurring_principal),
        monthly_deposit: amount_or(&payload.monthly_deposit, defaults.recurring_monthly_deposit),
        duration: Duration {
            count: whole_or(&payload.period, defaults.recurring_period),
            unit: payload.period_unit.map_or(PeriodUnit::Years, Into::into),
        },
        rate: rate_or(&payload.rate, defaults.recurring_rate_percent),
        rate_basis: payload.rate_unit.map_or(RateBasis::Annual, Into::into),
    }
}

pub fn retirement_inputs_from_payload(
    payload: &RetirementPayload,
    defaults: &FormDefaults,
) -> RetirementInputs {
    RetirementInputs {
        current_age: whole_or(&payload.current_age, defaults.current_age),
        retirement_age: whole_or(&payload.retirement_age, defaults.retirement_age),
        monthly_expense: amount_or(&payload.monthly_expenses, defaults.monthly_expense),
        inflation_rate: rate_or(&payload.inflation_rate, defaults.inflation_rate_percent),
        return_rate: rate_or(&payload.return_rate, defaults.retirement_return_percent),
    }
}

pub fn goal_request_from_payload(payload: &GoalPayload, defaults: &FormDefaults) -> GoalRequest {
    let context = payload.retirement_payload();
    let retirement = retirement_inputs_from_payload(&context, defaults);

    let (target_fund, target_source) = match &payload.target_fund {
        Some(field) => (field.amount(), TargetSource::Input),
        None if !context.is_empty() => {
            match required_retirement_fund(&retirement) {
                Ok(plan) => (default_target_fund(&plan), TargetSource::RetirementPlan),
                Err(err) => {
                    tracing::debug!(%err, "retirement plan unusable as goal target");
                    (0.0, TargetSource::Unset)
                }
            }
        }
        None => (0.0, TargetSource::Unset),
    };

    let years_to_retirement = match &payload.years_to_retirement {
        Some(field) => field.whole(),
        None => default_years_to_retirement(retirement.current_age, retirement.retirement_age)
            .unwrap_or(0),
    };

    GoalRequest {
        inputs: GoalInputs {
            target_fund,
            current_assets: amount_or(&payload.current_assets, defaults.goal_current_assets),
            years_to_retirement,
            annual_rate: rate_or(&payload.return_rate, defaults.goal_return_percent),
            monthly_contribution: amount_or(
                &payload.monthly_contribution,
                defaults.goal_monthly_contribution,
            ),
        },
        target_source,
    }
}

pub fn ensure_duration_within(duration: Duration, max_months: u32) -> ApiResult<()> {
    if duration.total_months() > max_months {
        return Err(ApiError::invalid(
            "period",
            format!("must not exceed {max_months} months"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FORM_DEFAULTS;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn basic_payload_parses_web_keys_and_text_numbers() {
        let payload: BasicCompoundPayload = serde_json::from_str(
            r#"{
              "initialPrincipal": "20,000,000",
              "period": "18",
              "periodUnit": "months",
              "rate": 5.5,
              "compoundingFrequency": "12"
            }"#,
        )
        .expect("json should parse");
        let inputs = basic_inputs_from_payload(&payload, &FORM_DEFAULTS).expect("valid inputs");

        assert_approx(inputs.principal, 20_000_000.0);
        assert_eq!(inputs.duration, Duration::months(18));
        assert_approx(inputs.annual_rate, 0.055);
        assert_eq!(inputs.frequency, CompoundingFrequency::Monthly);
    }

    #[test]
    fn missing_fields_take_form_defaults_but_blank_fields_become_zero() {
        let missing = basic_inputs_from_payload(&BasicCompoundPayload::default(), &FORM_DEFAULTS)
            .expect("valid inputs");
        assert_approx(missing.principal, 10_000_000.0);
        assert_eq!(missing.duration, Duration::years(10));
        assert_approx(missing.annual_rate, 0.07);
        assert_eq!(missing.frequency, CompoundingFrequency::Annually);

        let payload: BasicCompoundPayload = serde_json::from_str(
            r#"{ "initialPrincipal": "", "period": "abc", "rate": "-3" }"#,
        )
        .expect("json should parse");
        let blank = basic_inputs_from_payload(&payload, &FORM_DEFAULTS).expect("valid inputs");
        assert_approx(blank.principal, 0.0);
        assert_eq!(blank.duration.count, 0);
        assert_approx(blank.annual_rate, 0.0);
    }

    #[test]
    fn unsupported_compounding_frequency_is_rejected() {
        let payload = BasicCompoundPayload {
            compounding_frequency: Some(FieldValue::Number(3.0)),
            ..BasicCompoundPayload::default()
        };
        let err = basic_inputs_from_payload(&payload, &FORM_DEFAULTS).expect_err("must reject");
        assert!(err.to_string().contains("compoundingFrequency"));
    }

    #[test]
    fn recurring_payload_reads_rate_unit() {
        let payload: RecurringCompoundPayload = serde_json::from_str(
            r#"{
              "initialPrincipal": 0,
              "monthlyDeposit": "300,000",
              "period": 5,
              "periodUnit": "years",
              "rate": "1",
              "rateUnit": "monthly"
            }"#,
        )
        .expect("json should parse");
        let inputs = recurring_inputs_from_payload(&payload, &FORM_DEFAULTS);

        assert_approx(inputs.monthly_deposit, 300_000.0);
        assert_eq!(inputs.duration.total_months(), 60);
        assert_eq!(inputs.rate_basis, RateBasis::Monthly);
        assert_approx(inputs.annual_rate(), 0.12);
    }

    #[test]
    fn retirement_payload_truncates_ages() {
        let payload: RetirementPayload = serde_json::from_str(
            r#"{ "currentAge": "30.9", "retirementAge": 50, "monthlyExpenses": "3,000,000",
                 "inflationRate": "3", "returnRate": "8" }"#,
        )
        .expect("json should parse");
        let inputs = retirement_inputs_from_payload(&payload, &FORM_DEFAULTS);
        assert_eq!(inputs.current_age, 30);
        assert_eq!(inputs.retirement_age, 50);
        assert_approx(inputs.monthly_expense, 3_000_000.0);
        assert_approx(inputs.inflation_rate, 0.03);
        assert_approx(inputs.return_rate, 0.08);
    }

    #[test]
    fn goal_target_defaults_from_retirement_plan() {
        let payload: GoalPayload = serde_json::from_str(
            r#"{ "currentAge": 30, "retirementAge": 65, "monthlyExpenses": 4000000,
                 "inflationRate": 2.5, "retirementReturnRate": 7 }"#,
        )
        .expect("json should parse");
        let request = goal_request_from_payload(&payload, &FORM_DEFAULTS);

        let plan = required_retirement_fund(&RetirementInputs {
            current_age: 30,
            retirement_age: 65,
            monthly_expense: 4_000_000.0,
            inflation_rate: 0.025,
            return_rate: 0.07,
        })
        .expect("valid plan");
        assert_eq!(request.target_source, TargetSource::RetirementPlan);
        assert_eq!(request.inputs.target_fund, plan.required_fund.round());
        assert_eq!(request.inputs.years_to_retirement, 35);
    }

    #[test]
    fn goal_explicit_target_wins_and_invalid_plan_gives_zero() {
        let explicit = GoalPayload {
            target_fund: Some("1,000,000,000".into()),
            years_to_retirement: Some("20".into()),
            current_age: Some(FieldValue::Number(30.0)),
            ..GoalPayload::default()
        };
        let request = goal_request_from_payload(&explicit, &FORM_DEFAULTS);
        assert_eq!(request.target_source, TargetSource::Input);
        assert_approx(request.inputs.target_fund, 1_000_000_000.0);
        assert_eq!(request.inputs.years_to_retirement, 20);

        let invalid = GoalPayload {
            current_age: Some(FieldValue::Number(70.0)),
            ..GoalPayload::default()
        };
        let request = goal_request_from_payload(&invalid, &FORM_DEFAULTS);
        assert_eq!(request.target_source, TargetSource::Unset);
        assert_eq!(request.inputs.target_fund, 0.0);
        assert_eq!(request.inputs.years_to_retirement, 0);
    }

    #[test]
    fn goal_without_context_uses_default_ages_for_years() {
        let request = goal_request_from_payload(&GoalPayload::default(), &FORM_DEFAULTS);
        assert_eq!(request.target_source, TargetSource::Unset);
        assert_eq!(request.inputs.years_to_retirement, 35);
        assert_approx(request.inputs.current_assets, 50_000_000.0);
        assert_approx(request.inputs.annual_rate, 0.08);
        assert_approx(request.inputs.monthly_contribution, 500_000.0);
    }

    #[test]
    fn goal_response_serialization_flattens_result() {
        let request = goal_request_from_payload(
            &GoalPayload {
                target_fund: Some(FieldValue::Number(1e12)),
                ..GoalPayload::default()
            },
            &FORM_DEFAULTS,
        );
        let response = GoalResponse {
            target_source: request.target_source,
            years_to_retirement: request.inputs.years_to_retirement,
            result: crate::core::project_goal(&request.inputs),
        };
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"targetSource\":\"input\""));
        assert!(json.contains("\"yearsToRetirement\":35"));
        assert!(json.contains("\"projectedAssets\""));
        assert!(json.contains("\"surplus\""));
        assert!(json.contains("\"requiredMonthlyContribution\""));
    }

    #[test]
    fn duration_guard_rejects_absurd_periods() {
        assert!(ensure_duration_within(Duration::years(100), 1_200).is_ok());
        let err = ensure_duration_within(Duration::years(101), 1_200).expect_err("must reject");
        assert!(err.to_string().contains("period"));
    }
}
