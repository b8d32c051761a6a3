use std::fmt::{self, Write as _};
use std::net::IpAddr;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use super::{
    ApiPeriodUnit, ApiRateBasis, BasicCompoundPayload, FieldValue, GoalPayload, GoalResponse,
    RecurringCompoundPayload, RetirementPayload, TargetSource, basic_inputs_from_payload,
    ensure_duration_within, goal_request_from_payload, recurring_inputs_from_payload,
    retirement_inputs_from_payload,
};
use crate::config::{DEFAULT_MAX_DURATION_MONTHS, DEFAULT_PORT, FormDefaults, ServerConfig};
use crate::core::{
    CalculationResult, RetirementFund, project_goal, required_retirement_fund,
    run_basic_compound, run_recurring_compound,
};
use crate::error::{ApiError, ApiResult};
use crate::format::{format_rate_percent, format_won, korean_won};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPeriodUnit {
    Years,
    Months,
}

impl From<CliPeriodUnit> for ApiPeriodUnit {
    fn from(value: CliPeriodUnit) -> Self {
        match value {
            CliPeriodUnit::Years => ApiPeriodUnit::Years,
            CliPeriodUnit::Months => ApiPeriodUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRateBasis {
    Annual,
    Monthly,
}

impl From<CliRateBasis> for ApiRateBasis {
    fn from(value: CliRateBasis) -> Self {
        match value {
            CliRateBasis::Annual => ApiRateBasis::Annual,
            CliRateBasis::Monthly => ApiRateBasis::Monthly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl CliFrequency {
    fn periods_per_year(self) -> f64 {
        match self {
            CliFrequency::Annually => 1.0,
            CliFrequency::SemiAnnually => 2.0,
            CliFrequency::Quarterly => 4.0,
            CliFrequency::Monthly => 12.0,
            CliFrequency::Daily => 365.0,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Compound interest, retirement fund and savings goal calculator"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level used when RUST_LOG is unset"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lump-sum compound growth
    Basic(BasicArgs),
    /// Lump sum plus fixed monthly deposits
    Recurring(RecurringArgs),
    /// Fund needed at retirement to sustain today's spending
    Retirement(RetirementArgs),
    /// Project assets against a target and size any shortfall
    Goal(GoalArgs),
    /// Serve the calculators over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    #[arg(long, help = "Print the result record as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BasicArgs {
    #[arg(long, help = "Initial principal; commas allowed")]
    pub principal: Option<String>,
    #[arg(long, help = "Duration in --unit")]
    pub period: Option<String>,
    #[arg(long, value_enum)]
    pub unit: Option<CliPeriodUnit>,
    #[arg(long, help = "Annual rate in percent")]
    pub rate: Option<String>,
    #[arg(long, value_enum)]
    pub frequency: Option<CliFrequency>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RecurringArgs {
    #[arg(long, help = "Initial principal; commas allowed")]
    pub principal: Option<String>,
    #[arg(long, help = "Deposit made at the start of every month")]
    pub deposit: Option<String>,
    #[arg(long, help = "Duration in --unit")]
    pub period: Option<String>,
    #[arg(long, value_enum)]
    pub unit: Option<CliPeriodUnit>,
    #[arg(long, help = "Rate in percent on the --rate-unit basis")]
    pub rate: Option<String>,
    #[arg(long, value_enum)]
    pub rate_unit: Option<CliRateBasis>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RetirementArgs {
    #[arg(long)]
    pub current_age: Option<String>,
    #[arg(long)]
    pub retirement_age: Option<String>,
    #[arg(long, help = "Monthly spending in today's money")]
    pub monthly_expenses: Option<String>,
    #[arg(long, help = "Expected annual inflation in percent")]
    pub inflation_rate: Option<String>,
    #[arg(long, help = "Expected annual return after retirement in percent")]
    pub return_rate: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct GoalArgs {
    #[arg(long, help = "Target fund; sized from the retirement flags when omitted")]
    pub target_fund: Option<String>,
    #[arg(long)]
    pub current_assets: Option<String>,
    #[arg(long, help = "Defaults to retirement age minus current age")]
    pub years: Option<String>,
    #[arg(long, help = "Expected annual return in percent")]
    pub return_rate: Option<String>,
    #[arg(long)]
    pub monthly_contribution: Option<String>,
    #[arg(long)]
    pub current_age: Option<String>,
    #[arg(long)]
    pub retirement_age: Option<String>,
    #[arg(long)]
    pub monthly_expenses: Option<String>,
    #[arg(long)]
    pub inflation_rate: Option<String>,
    #[arg(long, help = "Post-retirement return used to size the target, in percent")]
    pub retirement_return_rate: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, default_value_t = ServerConfig::default().host)]
    pub host: IpAddr,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DURATION_MONTHS,
        help = "Reject calculations longer than this many months"
    )]
    pub max_duration_months: u32,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            max_duration_months: args.max_duration_months,
        }
    }
}

fn text(value: Option<String>) -> Option<FieldValue> {
    value.map(FieldValue::Text)
}

impl From<BasicArgs> for BasicCompoundPayload {
    fn from(args: BasicArgs) -> Self {
        BasicCompoundPayload {
            initial_principal: text(args.principal),
            period: text(args.period),
            period_unit: args.unit.map(Into::into),
            rate: text(args.rate),
            compounding_frequency: args
                .frequency
                .map(|f| FieldValue::Number(f.periods_per_year())),
        }
    }
}

impl From<RecurringArgs> for RecurringCompoundPayload {
    fn from(args: RecurringArgs) -> Self {
        RecurringCompoundPayload {
            initial_principal: text(args.principal),
            monthly_deposit: text(args.deposit),
            period: text(args.period),
            period_unit: args.unit.map(Into::into),
            rate: text(args.rate),
            rate_unit: args.rate_unit.map(Into::into),
        }
    }
}

impl From<RetirementArgs> for RetirementPayload {
    fn from(args: RetirementArgs) -> Self {
        RetirementPayload {
            current_age: text(args.current_age),
            retirement_age: text(args.retirement_age),
            monthly_expenses: text(args.monthly_expenses),
            inflation_rate: text(args.inflation_rate),
            return_rate: text(args.return_rate),
        }
    }
}

impl From<GoalArgs> for GoalPayload {
    fn from(args: GoalArgs) -> Self {
        GoalPayload {
            target_fund: text(args.target_fund),
            current_assets: text(args.current_assets),
            years_to_retirement: text(args.years),
            return_rate: text(args.return_rate),
            monthly_contribution: text(args.monthly_contribution),
            current_age: text(args.current_age),
            retirement_age: text(args.retirement_age),
            monthly_expenses: text(args.monthly_expenses),
            inflation_rate: text(args.inflation_rate),
            retirement_return_rate: text(args.retirement_return_rate),
        }
    }
}

pub async fn run(cli: Cli) -> ExitCode {
    let defaults = FormDefaults::default();
    match cli.command {
        Command::Basic(args) => {
            let json = args.output.json;
            match basic_calculation(&args.into(), &defaults) {
                Ok(result) => emit(json, &result, render_calculation),
                Err(err) => rejected(&err),
            }
        }
        Command::Recurring(args) => {
            let json = args.output.json;
            match recurring_calculation(&args.into(), &defaults) {
                Ok(result) => emit(json, &result, render_calculation),
                Err(err) => rejected(&err),
            }
        }
        Command::Retirement(args) => {
            let json = args.output.json;
            let inputs = retirement_inputs_from_payload(&args.into(), &defaults);
            match required_retirement_fund(&inputs) {
                Ok(fund) => emit(json, &fund, render_retirement),
                Err(err) => {
                    tracing::warn!(code = err.code(), "retirement plan rejected");
                    eprintln!("{err}");
                    ExitCode::from(2)
                }
            }
        }
        Command::Goal(args) => {
            let json = args.output.json;
            let request = goal_request_from_payload(&args.into(), &defaults);
            let response = GoalResponse {
                target_source: request.target_source,
                years_to_retirement: request.inputs.years_to_retirement,
                result: project_goal(&request.inputs),
            };
            emit(json, &response, render_goal)
        }
        Command::Serve(args) => {
            if let Err(e) = super::http::run_http_server(args.into()).await {
                tracing::error!(error = %e, "server error");
                eprintln!("Server error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn basic_calculation(
    payload: &BasicCompoundPayload,
    defaults: &FormDefaults,
) -> ApiResult<CalculationResult> {
    let inputs = basic_inputs_from_payload(payload, defaults)?;
    ensure_duration_within(inputs.duration, DEFAULT_MAX_DURATION_MONTHS)?;
    Ok(run_basic_compound(&inputs))
}

fn recurring_calculation(
    payload: &RecurringCompoundPayload,
    defaults: &FormDefaults,
) -> ApiResult<CalculationResult> {
    let inputs = recurring_inputs_from_payload(payload, defaults);
    ensure_duration_within(inputs.duration, DEFAULT_MAX_DURATION_MONTHS)?;
    Ok(run_recurring_compound(&inputs))
}

fn rejected(err: &ApiError) -> ExitCode {
    tracing::warn!(code = err.code(), "input rejected");
    eprintln!("{err}");
    ExitCode::from(2)
}

fn emit<T: Serialize>(json: bool, value: &T, render: fn(&T) -> String) -> ExitCode {
    if !json {
        print!("{}", render(value));
        return ExitCode::SUCCESS;
    }
    match serde_json::to_string_pretty(value) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize result");
            ExitCode::FAILURE
        }
    }
}

fn won_with_reading(value: f64) -> String {
    let reading = korean_won(value);
    if reading.is_empty() {
        format_won(value, true)
    } else {
        format!("{} ({reading}원)", format_won(value, true))
    }
}

fn field(out: &mut String, label: &str, value: impl fmt::Display) {
    let _ = writeln!(out, "{label:<24} {value}");
}

pub fn render_calculation(result: &CalculationResult) -> String {
    let mut out = String::new();
    let s = &result.summary;
    field(&mut out, "Final amount", won_with_reading(s.final_amount));
    field(&mut out, "Total principal", format_won(s.total_principal, true));
    field(&mut out, "Total interest", format_won(s.total_interest, true));
    if result.breakdown.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>4}  {:>20}  {:>20}  {:>20}",
        "Year", "Principal", "Interest", "Balance"
    );
    for row in &result.breakdown {
        let _ = writeln!(
            out,
            "{:>4}  {:>20}  {:>20}  {:>20}",
            row.year,
            format_won(row.principal, true),
            format_won(row.interest, true),
            format_won(row.final_amount, true)
        );
    }
    out
}

pub fn render_retirement(fund: &RetirementFund) -> String {
    let mut out = String::new();
    field(&mut out, "Required fund", won_with_reading(fund.required_fund));
    field(&mut out, "Years to retirement", fund.years_to_retirement);
    field(
        &mut out,
        "Monthly spending then",
        format_won(fund.future_monthly_expense, true),
    );
    field(
        &mut out,
        "Annual spending then",
        format_won(fund.future_annual_expense, true),
    );
    field(
        &mut out,
        "Real return",
        format_rate_percent(fund.real_return_rate * 100.0),
    );
    out
}

pub fn render_goal(response: &GoalResponse) -> String {
    let r = &response.result;
    let mut out = String::new();
    let target = won_with_reading(r.target_fund);
    let target = match response.target_source {
        TargetSource::Input => target,
        TargetSource::RetirementPlan => format!("{target}, from retirement plan"),
        TargetSource::Unset => "not set".to_string(),
    };
    field(&mut out, "Target fund", target);
    field(&mut out, "Projected assets", won_with_reading(r.projected_assets));
    field(&mut out, "Years to retirement", response.years_to_retirement);
    field(
        &mut out,
        "Growth of current assets",
        format_won(r.growth_from_principal, true),
    );
    field(
        &mut out,
        "Total contributions",
        format_won(r.total_contributions, true),
    );
    field(
        &mut out,
        "Growth of contributions",
        format_won(r.growth_from_contributions, true),
    );

    if !r.is_short() {
        field(&mut out, "Surplus", format_won(r.surplus, true));
        return out;
    }
    field(&mut out, "Shortfall", format_won(r.surplus.abs(), true));
    if let Some(monthly) = r.required_monthly_contribution {
        field(&mut out, "Needed monthly", format_won(monthly, true));
    }
    match r.required_return_rate {
        Some(rate) => field(&mut out, "Needed annual return", format_rate_percent(rate)),
        None => field(&mut out, "Needed annual return", "not reachable below 100%"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FORM_DEFAULTS;
    use crate::core::{Duration, RateBasis};

    #[test]
    fn basic_subcommand_parses_free_form_flags() {
        let cli = Cli::try_parse_from([
            "nestegg",
            "basic",
            "--principal",
            "1,000,000",
            "--period",
            "18",
            "--unit",
            "months",
            "--frequency",
            "semi-annually",
            "--json",
        ])
        .expect("valid args");
        let Command::Basic(args) = cli.command else {
            panic!("expected basic command");
        };
        assert!(args.output.json);
        let inputs = basic_inputs_from_payload(&args.into(), &FORM_DEFAULTS).expect("valid inputs");
        assert_eq!(inputs.principal, 1_000_000.0);
        assert_eq!(inputs.duration, Duration::months(18));
        assert_eq!(inputs.frequency.periods_per_year(), 2);
        assert_eq!(inputs.annual_rate, 0.07);
    }

    #[test]
    fn recurring_subcommand_reads_rate_unit() {
        let cli = Cli::try_parse_from([
            "nestegg",
            "recurring",
            "--deposit",
            "500000",
            "--rate",
            "1",
            "--rate-unit",
            "monthly",
        ])
        .expect("valid args");
        let Command::Recurring(args) = cli.command else {
            panic!("expected recurring command");
        };
        let inputs = recurring_inputs_from_payload(&args.into(), &FORM_DEFAULTS);
        assert_eq!(inputs.monthly_deposit, 500_000.0);
        assert_eq!(inputs.rate_basis, RateBasis::Monthly);
        assert_eq!(inputs.duration, Duration::years(40));
    }

    #[test]
    fn serve_defaults_match_server_config() {
        let cli = Cli::try_parse_from(["nestegg", "serve", "--port", "9000"]).expect("valid args");
        assert_eq!(cli.log_level, "info");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        let config = ServerConfig::from(args);
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, ServerConfig::default().host);
        assert_eq!(config.max_duration_months, DEFAULT_MAX_DURATION_MONTHS);
    }

    #[test]
    fn oversized_periods_are_rejected_before_calculating() {
        let cli = Cli::try_parse_from(["nestegg", "basic", "--period", "99999999999", "--json"])
            .expect("valid args");
        let Command::Basic(args) = cli.command else {
            panic!("expected basic command");
        };
        let err = basic_calculation(&args.into(), &FORM_DEFAULTS).expect_err("must reject");
        assert_eq!(err.code(), "invalidInput");
        assert!(err.to_string().contains("period"));

        let cli = Cli::try_parse_from([
            "nestegg",
            "recurring",
            "--period",
            "400000000",
            "--unit",
            "months",
        ])
        .expect("valid args");
        let Command::Recurring(args) = cli.command else {
            panic!("expected recurring command");
        };
        let err = recurring_calculation(&args.into(), &FORM_DEFAULTS).expect_err("must reject");
        assert!(err.to_string().contains("period"));
    }

    #[test]
    fn periods_at_the_limit_still_calculate() {
        let payload = RecurringCompoundPayload {
            period: Some(FieldValue::Number(f64::from(DEFAULT_MAX_DURATION_MONTHS))),
            period_unit: Some(ApiPeriodUnit::Months),
            ..RecurringCompoundPayload::default()
        };
        let result = recurring_calculation(&payload, &FORM_DEFAULTS).expect("within limit");
        assert_eq!(result.breakdown.len(), (DEFAULT_MAX_DURATION_MONTHS / 12) as usize);
    }

    #[test]
    fn unknown_frequency_is_a_parse_error() {
        let err = Cli::try_parse_from(["nestegg", "basic", "--frequency", "weekly"]);
        assert!(err.is_err());
    }

    #[test]
    fn calculation_rendering_lists_every_year() {
        let inputs = basic_inputs_from_payload(&BasicCompoundPayload::default(), &FORM_DEFAULTS)
            .expect("valid inputs");
        let text = render_calculation(&run_basic_compound(&inputs));
        assert!(text.contains("Final amount"));
        assert!(text.contains("₩10,000,000"));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("10 ")).count(), 1);
    }

    #[test]
    fn retirement_rendering_includes_korean_reading() {
        let inputs = retirement_inputs_from_payload(&RetirementPayload::default(), &FORM_DEFAULTS);
        let fund = required_retirement_fund(&inputs).expect("default plan is valid");
        let text = render_retirement(&fund);
        assert!(text.contains("억"));
        assert!(text.contains("4.50%"));
    }

    #[test]
    fn goal_rendering_explains_shortfall() {
        let payload = GoalPayload {
            target_fund: Some("10,000,000,000".into()),
            ..GoalPayload::default()
        };
        let request = goal_request_from_payload(&payload, &FORM_DEFAULTS);
        let response = GoalResponse {
            target_source: request.target_source,
            years_to_retirement: request.inputs.years_to_retirement,
            result: project_goal(&request.inputs),
        };
        let text = render_goal(&response);
        assert!(text.contains("Shortfall"));
        assert!(text.contains("Needed monthly"));
        assert!(text.contains("Needed annual return"));
    }
}
