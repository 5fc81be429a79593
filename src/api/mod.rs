use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Comparison, HistoricalWindow, Scenario, WindowReport, compare, notable_windows,
    tent_win_counts,
};
use crate::report::{axis_label, chart_file_name, chart_title, strategy_label};

mod cli;

pub use cli::{CliBondSeries, ScenarioArgs, build_scenario, validate_stock_range};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const DEFAULT_MIN_STOCKS: u32 = 10;
const DEFAULT_MAX_STOCKS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiBondSeries {
    #[serde(alias = "totalBondMarket", alias = "total_bond_market", alias = "total")]
    TotalBondMarket,
    #[serde(alias = "shortTermTreasuries", alias = "short_term_treasuries")]
    ShortTermTreasuries,
    #[serde(
        alias = "intermediateTermTreasuries",
        alias = "intermediate_term_treasuries"
    )]
    IntermediateTermTreasuries,
    #[serde(alias = "longTermTreasuries", alias = "long_term_treasuries")]
    LongTermTreasuries,
    #[serde(alias = "shortTermBonds", alias = "short_term_bonds")]
    ShortTermBonds,
    #[serde(alias = "intermediateTermBonds", alias = "intermediate_term_bonds")]
    IntermediateTermBonds,
}

impl From<ApiBondSeries> for CliBondSeries {
    fn from(value: ApiBondSeries) -> Self {
        match value {
            ApiBondSeries::TotalBondMarket => CliBondSeries::TotalBondMarket,
            ApiBondSeries::ShortTermTreasuries => CliBondSeries::ShortTermTreasuries,
            ApiBondSeries::IntermediateTermTreasuries => CliBondSeries::IntermediateTermTreasuries,
            ApiBondSeries::LongTermTreasuries => CliBondSeries::LongTermTreasuries,
            ApiBondSeries::ShortTermBonds => CliBondSeries::ShortTermBonds,
            ApiBondSeries::IntermediateTermBonds => CliBondSeries::IntermediateTermBonds,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    horizon: Option<usize>,
    initial_portfolio: Option<f64>,
    withdrawal_rate: Option<f64>,
    nominal_expense: Option<f64>,
    nominal_years: Option<usize>,
    fixed_stocks: Option<f64>,
    tent_start: Option<f64>,
    tent_end: Option<f64>,
    tent_years: Option<usize>,
    bonds: Option<ApiBondSeries>,

    min_year: Option<u32>,
    max_year: Option<u32>,

    min_stocks: Option<u32>,
    max_stocks: Option<u32>,
}

/// Inclusive calendar range of start years to summarise.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct YearRange {
    pub min_year: u32,
    pub max_year: u32,
}

#[derive(Debug)]
struct ApiRequest {
    scenario: Scenario,
    window: Option<YearRange>,
    min_stocks: u32,
    max_stocks: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowResponse {
    name: String,
    title: String,
    file_name: String,
    x_ticks: Option<u32>,
    #[serde(flatten)]
    report: WindowReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    horizon: usize,
    bonds: &'static str,
    fixed_label: String,
    tent_label: String,
    axis_label: String,
    tent_wins: usize,
    #[serde(flatten)]
    comparison: Comparison,
    windows: Vec<WindowResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WinCount {
    stocks: u32,
    tent_wins: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResponse {
    tent_label: String,
    start_years: usize,
    win_counts: Vec<WinCount>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Full comparison plus one summary per requested or notable window.
pub fn build_compare_response(
    scenario: &Scenario,
    window: Option<YearRange>,
) -> Result<CompareResponse, String> {
    let history = scenario.history();
    let comparison = compare(&history, scenario).map_err(|e| e.to_string())?;
    let horizon = scenario.simulation.horizon;

    let windows = match window {
        Some(range) => vec![(
            format!("custom_{}_{}", range.min_year, range.max_year),
            range,
            None,
        )],
        None => notable_windows(horizon)
            .into_iter()
            .map(|HistoricalWindow { name, min_year, max_year, x_ticks }| {
                (name.to_string(), YearRange { min_year, max_year }, Some(x_ticks))
            })
            .collect(),
    };

    let windows = windows
        .into_iter()
        .map(|(name, range, x_ticks)| {
            let report = comparison
                .window(range.min_year, range.max_year)
                .map_err(|e| format!("window {}-{}: {e}", range.min_year, range.max_year))?;
            Ok(WindowResponse {
                title: chart_title(horizon, range.min_year, range.max_year),
                file_name: chart_file_name(&name, scenario),
                name,
                x_ticks,
                report,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(CompareResponse {
        horizon,
        bonds: scenario.bonds.label(),
        fixed_label: strategy_label(scenario.fixed),
        tent_label: strategy_label(scenario.tent),
        axis_label: axis_label(horizon),
        tent_wins: comparison.tent_wins(),
        comparison,
        windows,
    })
}

impl CompareResponse {
    pub fn window_reports(&self) -> impl Iterator<Item = &WindowReport> {
        self.windows.iter().map(|window| &window.report)
    }

    pub fn headline(&self) -> String {
        format!(
            "{} ahead of {} in {} of {} start years ({})",
            self.tent_label,
            self.fixed_label,
            self.tent_wins,
            self.comparison.start_years.len(),
            self.bonds
        )
    }
}

pub fn build_sweep_response(
    scenario: &Scenario,
    min_stocks: u32,
    max_stocks: u32,
) -> Result<SweepResponse, String> {
    validate_stock_range(min_stocks, max_stocks)?;
    let history = scenario.history();
    let counts = tent_win_counts(
        &history,
        &scenario.simulation,
        scenario.tent,
        min_stocks..=max_stocks,
    )
    .map_err(|e| e.to_string())?;

    Ok(SweepResponse {
        tent_label: strategy_label(scenario.tent),
        start_years: history.years() + 1 - scenario.simulation.horizon,
        win_counts: counts
            .into_iter()
            .map(|(stocks, tent_wins)| WinCount { stocks, tent_wins })
            .collect(),
    })
}

impl SweepResponse {
    /// One `{stocks}%: {wins} tent wins` line per fixed allocation.
    pub fn lines(&self) -> Vec<String> {
        self.win_counts
            .iter()
            .map(|count| format!("{}%: {} tent wins", count.stocks, count.tent_wins))
            .collect()
    }
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .route("/api/sweep", get(sweep_get_handler).post(sweep_post_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    println!("Bond tent HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(
    payload: Result<Query<ScenarioPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => compare_handler_impl(payload),
        Err(rejection) => invalid_payload_response(rejection.body_text()),
    }
}

async fn compare_post_handler(
    payload: Result<Json<ScenarioPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => compare_handler_impl(payload),
        Err(rejection) => invalid_payload_response(rejection.body_text()),
    }
}

async fn sweep_get_handler(
    payload: Result<Query<ScenarioPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => sweep_handler_impl(payload),
        Err(rejection) => invalid_payload_response(rejection.body_text()),
    }
}

async fn sweep_post_handler(
    payload: Result<Json<ScenarioPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => sweep_handler_impl(payload),
        Err(rejection) => invalid_payload_response(rejection.body_text()),
    }
}

fn compare_handler_impl(payload: ScenarioPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    tracing::info!(scenario = ?request.scenario, window = ?request.window, "compare request");

    match build_compare_response(&request.scenario, request.window) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn sweep_handler_impl(payload: ScenarioPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    tracing::info!(
        min_stocks = request.min_stocks,
        max_stocks = request.max_stocks,
        "sweep request"
    );

    match build_sweep_response(&request.scenario, request.min_stocks, request.max_stocks) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn invalid_payload_response(detail: String) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("Invalid API payload: {detail}"),
    )
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    tracing::warn!(status = status.as_u16(), error = msg, "request failed");
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ScenarioPayload>(json)
        .map_err(|e| format!("Invalid API payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ScenarioPayload) -> Result<ApiRequest, String> {
    let mut args = cli::default_scenario_args();

    if let Some(v) = payload.horizon {
        args.horizon = v;
    }
    if let Some(v) = payload.initial_portfolio {
        args.initial_portfolio = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        args.withdrawal_rate = v;
    }
    if let Some(v) = payload.nominal_expense {
        args.nominal_expense = v;
    }
    if let Some(v) = payload.nominal_years {
        args.nominal_years = v;
    }
    if let Some(v) = payload.fixed_stocks {
        args.fixed_stocks = v;
    }
    if let Some(v) = payload.tent_start {
        args.tent_start = v;
    }
    if let Some(v) = payload.tent_end {
        args.tent_end = v;
    }
    if let Some(v) = payload.tent_years {
        args.tent_years = v;
    }
    if let Some(v) = payload.bonds {
        args.bonds = v.into();
    }

    let scenario = build_scenario(&args)?;
    let history = scenario.history();

    let window = match (payload.min_year, payload.max_year) {
        (None, None) => None,
        (min_year, max_year) => Some(YearRange {
            min_year: min_year.unwrap_or(history.first_year()),
            max_year: max_year.unwrap_or(history.last_year()),
        }),
    };
    if let Some(range) = window {
        if range.min_year > range.max_year {
            return Err("minYear must be <= maxYear".to_string());
        }
    }

    let min_stocks = payload.min_stocks.unwrap_or(DEFAULT_MIN_STOCKS);
    let max_stocks = payload.max_stocks.unwrap_or(DEFAULT_MAX_STOCKS);
    validate_stock_range(min_stocks, max_stocks)?;

    Ok(ApiRequest {
        scenario,
        window,
        min_stocks,
        max_stocks,
    })
}
