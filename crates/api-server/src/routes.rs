use crate::{ApiResponse, AppError, AppState};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use screener_core::{
    CalendarDoc, CompositePick, EtfFlowCommentary, EtfFlowRecord, FinalReport, InsiderMovesDoc,
    InstitutionalRecord, MacroAnalysisDoc, OptionsFlowDoc, PortfolioRiskReport, SectorHeatmapDoc,
    TickerSummary, VolumeAnalysisRecord,
};
use serde::Deserialize;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/volume", get(get_volume))
        .route("/api/institutional", get(get_institutional))
        .route("/api/etf-flows", get(get_etf_flows))
        .route("/api/etf-flows/commentary", get(get_etf_commentary))
        .route("/api/picks", get(get_picks))
        .route("/api/insider", get(get_insider))
        .route("/api/options", get(get_options))
        .route("/api/risk", get(get_risk))
        .route("/api/sectors", get(get_sectors))
        .route("/api/macro", get(get_macro))
        .route("/api/calendar", get(get_calendar))
        .route("/api/summaries", get(get_summaries))
        .route("/api/summaries/:ticker", get(get_summary))
        .route("/api/report", get(get_report))
}

fn available<T>(artifact: Option<T>, what: &str) -> Result<Json<ApiResponse<T>>, AppError> {
    match artifact {
        Some(data) => Ok(ApiResponse::ok(data)),
        None => Err(AppError::NotAvailable(format!("{} not generated yet", what))),
    }
}

async fn health() -> Json<ApiResponse<&'static str>> {
    ApiResponse::ok("ok")
}

async fn get_volume(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VolumeAnalysisRecord>>>, AppError> {
    available(state.store.load_volume()?, "volume analysis")
}

async fn get_institutional(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<InstitutionalRecord>>>, AppError> {
    available(state.store.load_institutional()?, "institutional analysis")
}

async fn get_etf_flows(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EtfFlowRecord>>>, AppError> {
    available(state.store.load_etf_flows()?, "etf flows")
}

async fn get_etf_commentary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EtfFlowCommentary>>, AppError> {
    available(state.store.load_etf_commentary()?, "etf flow commentary")
}

async fn get_picks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CompositePick>>>, AppError> {
    available(state.store.load_picks()?, "composite picks")
}

async fn get_insider(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InsiderMovesDoc>>, AppError> {
    available(state.store.load_insider_moves()?, "insider moves")
}

async fn get_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OptionsFlowDoc>>, AppError> {
    available(state.store.load_options_flow()?, "options flow")
}

async fn get_risk(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PortfolioRiskReport>>, AppError> {
    available(state.store.load_portfolio_risk()?, "portfolio risk")
}

async fn get_sectors(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SectorHeatmapDoc>>, AppError> {
    available(state.store.load_sector_heatmap()?, "sector heatmap")
}

#[derive(Debug, Deserialize)]
struct MacroParams {
    #[serde(default)]
    lang: Option<String>,
}

async fn get_macro(
    State(state): State<AppState>,
    Query(params): Query<MacroParams>,
) -> Result<Json<ApiResponse<MacroAnalysisDoc>>, AppError> {
    let lang = params.lang.as_deref().unwrap_or("ko");
    available(state.store.load_macro(lang)?, "macro analysis")
}

async fn get_calendar(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CalendarDoc>>, AppError> {
    available(state.store.load_calendar()?, "economic calendar")
}

async fn get_summaries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TickerSummary>>>, AppError> {
    let store = state.store.load_summaries()?;
    available(
        store.map(|s| s.summaries.into_values().collect()),
        "ai summaries",
    )
}

async fn get_summary(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<TickerSummary>>, AppError> {
    let ticker = ticker.to_uppercase();
    let summary = state
        .store
        .load_summaries()?
        .and_then(|mut s| s.summaries.remove(&ticker));
    available(summary, &format!("summary for {}", ticker))
}

async fn get_report(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FinalReport>>, AppError> {
    available(state.store.load_final_report()?, "final report")
}
