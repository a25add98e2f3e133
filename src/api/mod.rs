use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{Category, RetirementResult, YearMonth, compute};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const BIRTH_YEAR_OPTIONS: i32 = 50;
const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "retirement",
    about = "Delayed statutory retirement date estimator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the original and delayed retirement date for one person
    Calc(CalcArgs),
    /// Serve the web calculator and JSON API
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    #[arg(long)]
    birth_year: i32,
    #[arg(long, help = "Birth month, 1-12")]
    birth_month: u32,
    #[arg(long, value_enum, default_value_t = CliCategory::Male)]
    category: CliCategory,
    #[arg(long, help = "Print the full result as JSON")]
    json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCategory {
    Male,
    #[value(alias = "workerMale")]
    WorkerMale,
    Female,
}

impl From<CliCategory> for Category {
    fn from(value: CliCategory) -> Self {
        match value {
            CliCategory::Male => Category::Male,
            CliCategory::WorkerMale => Category::WorkerMale,
            CliCategory::Female => Category::Female,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    birth_year: Option<i32>,
    birth_month: Option<u32>,
    category: Option<String>,
}

#[derive(Debug)]
struct RetirementRequest {
    birth: YearMonth,
    category: Category,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryOption {
    value: Category,
    label: &'static str,
    original_age: u32,
    target_age: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResponse {
    birth_years: Vec<i32>,
    months: Vec<u32>,
    categories: Vec<CategoryOption>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Calc(args) => {
            println!("{}", run_calc(&args)?);
            Ok(())
        }
        Command::Serve { port } => run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
    }
}

fn run_calc(args: &CalcArgs) -> Result<String, String> {
    let birth = YearMonth::new(args.birth_year, args.birth_month)
        .map_err(|e| format!("Invalid birth date: {e}"))?;
    let result = compute(birth, args.category.into());
    if args.json {
        serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to encode result: {e}"))
    } else {
        Ok(render_summary(&result))
    }
}

/// The four lines shown under the form after a calculation.
fn render_summary(result: &RetirementResult) -> String {
    format!(
        "原定退休年龄: {} 岁\n实际退休年龄: {} 岁\n延迟月数: {} 个月\n实际退休日期: {} 年{} 月",
        result.original_retirement_age,
        result.actual_retirement_age,
        result.delay_months,
        result.actual_retirement_date.year(),
        result.actual_retirement_date.month(),
    )
}

fn birth_year_options(current_year: i32) -> Vec<i32> {
    (0..BIRTH_YEAR_OPTIONS).map(|i| current_year - i).collect()
}

fn build_options(current_year: i32) -> OptionsResponse {
    OptionsResponse {
        birth_years: birth_year_options(current_year),
        months: (1..=12).collect(),
        categories: Category::ALL
            .into_iter()
            .map(|category| CategoryOption {
                value: category,
                label: category.label(),
                original_age: category.original_age(),
                target_age: category.target_age(),
            })
            .collect(),
    }
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/options", get(options_handler))
        .route(
            "/api/retirement",
            get(retirement_get_handler).post(retirement_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("Retirement calculator listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
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

async fn options_handler() -> Response {
    let current_year = chrono::Local::now().year();
    json_response(StatusCode::OK, build_options(current_year))
}

async fn retirement_get_handler(
    payload: Result<Query<RetirementPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => retirement_handler_impl(payload),
        Err(rejection) => bad_request(&rejection.body_text()),
    }
}

async fn retirement_post_handler(
    payload: Result<Json<RetirementPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => retirement_handler_impl(payload),
        Err(rejection) => bad_request(&rejection.body_text()),
    }
}

fn retirement_handler_impl(payload: RetirementPayload) -> Response {
    match retirement_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, compute(request.birth, request.category)),
        Err(msg) => bad_request(&msg),
    }
}

fn bad_request(msg: &str) -> Response {
    log::warn!("Rejected retirement request: {msg}");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn retirement_request_from_json(json: &str) -> Result<RetirementRequest, String> {
    let payload = serde_json::from_str::<RetirementPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    retirement_request_from_payload(payload)
}

fn retirement_request_from_payload(
    payload: RetirementPayload,
) -> Result<RetirementRequest, String> {
    let year = payload
        .birth_year
        .ok_or_else(|| "birthYear is required".to_string())?;
    let month = payload
        .birth_month
        .ok_or_else(|| "birthMonth is required".to_string())?;
    let birth = YearMonth::new(year, month).map_err(|e| e.to_string())?;

    let category = match payload.category.as_deref() {
        None | Some("") => Category::Male,
        Some(raw) => raw.parse::<Category>().map_err(|e| e.to_string())?,
    };

    Ok(RetirementRequest { birth, category })
}
