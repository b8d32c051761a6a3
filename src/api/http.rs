use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;

use super::{
    BasicCompoundPayload, GoalPayload, GoalResponse, RecurringCompoundPayload, RetirementPayload,
    basic_inputs_from_payload, ensure_duration_within, goal_request_from_payload,
    recurring_inputs_from_payload, retirement_inputs_from_payload,
};
use crate::config::{FormDefaults, ServerConfig};
use crate::core::{
    project_goal, required_retirement_fund, run_basic_compound, run_recurring_compound,
};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub defaults: FormDefaults,
    pub max_duration_months: u32,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            defaults: FormDefaults::default(),
            max_duration_months: config.max_duration_months,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/basic-compound",
            get(basic_get_handler).post(basic_post_handler),
        )
        .route(
            "/api/recurring-compound",
            get(recurring_get_handler).post(recurring_post_handler),
        )
        .route(
            "/api/retirement-fund",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .route(
            "/api/goal-projection",
            get(goal_get_handler).post(goal_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let app = router(AppState::new(&config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "calculator HTTP API listening");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

async fn basic_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<BasicCompoundPayload>,
) -> Response {
    respond(basic_handler_impl(&state, &payload))
}

async fn basic_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<BasicCompoundPayload>,
) -> Response {
    respond(basic_handler_impl(&state, &payload))
}

async fn recurring_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<RecurringCompoundPayload>,
) -> Response {
    respond(recurring_handler_impl(&state, &payload))
}

async fn recurring_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<RecurringCompoundPayload>,
) -> Response {
    respond(recurring_handler_impl(&state, &payload))
}

async fn retirement_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<RetirementPayload>,
) -> Response {
    respond(retirement_handler_impl(&state, &payload))
}

async fn retirement_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<RetirementPayload>,
) -> Response {
    respond(retirement_handler_impl(&state, &payload))
}

async fn goal_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<GoalPayload>,
) -> Response {
    respond(goal_handler_impl(&state, &payload))
}

async fn goal_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<GoalPayload>,
) -> Response {
    respond(goal_handler_impl(&state, &payload))
}

fn basic_handler_impl(state: &AppState, payload: &BasicCompoundPayload) -> ApiResult<Response> {
    let inputs = basic_inputs_from_payload(payload, &state.defaults)?;
    ensure_duration_within(inputs.duration, state.max_duration_months)?;
    tracing::info!(
        months = inputs.duration.total_months(),
        periods_per_year = inputs.frequency.periods_per_year(),
        "basic compound requested"
    );

    let result = run_basic_compound(&inputs);
    tracing::debug!(final_amount = result.summary.final_amount, "basic compound done");
    Ok(json_response(StatusCode::OK, result))
}

fn recurring_handler_impl(
    state: &AppState,
    payload: &RecurringCompoundPayload,
) -> ApiResult<Response> {
    let inputs = recurring_inputs_from_payload(payload, &state.defaults);
    ensure_duration_within(inputs.duration, state.max_duration_months)?;
    tracing::info!(
        months = inputs.duration.total_months(),
        "recurring compound requested"
    );

    let result = run_recurring_compound(&inputs);
    tracing::debug!(final_amount = result.summary.final_amount, "recurring compound done");
    Ok(json_response(StatusCode::OK, result))
}

fn retirement_handler_impl(state: &AppState, payload: &RetirementPayload) -> ApiResult<Response> {
    let inputs = retirement_inputs_from_payload(payload, &state.defaults);
    tracing::info!(
        current_age = inputs.current_age,
        retirement_age = inputs.retirement_age,
        "retirement fund requested"
    );

    let fund = required_retirement_fund(&inputs)?;
    tracing::debug!(required_fund = fund.required_fund, "retirement fund done");
    Ok(json_response(StatusCode::OK, fund))
}

fn goal_handler_impl(state: &AppState, payload: &GoalPayload) -> ApiResult<Response> {
    let request = goal_request_from_payload(payload, &state.defaults);
    tracing::info!(
        years = request.inputs.years_to_retirement,
        target_source = ?request.target_source,
        "goal projection requested"
    );

    let result = project_goal(&request.inputs);
    tracing::debug!(
        surplus = result.surplus,
        required_return_rate = ?result.required_return_rate,
        "goal projection done"
    );
    Ok(json_response(
        StatusCode::OK,
        GoalResponse {
            target_source: request.target_source,
            years_to_retirement: request.inputs.years_to_retirement,
            result,
        },
    ))
}

fn respond(result: ApiResult<Response>) -> Response {
    result.unwrap_or_else(IntoResponse::into_response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
