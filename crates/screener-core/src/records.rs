//! Persisted per-stage records. Each pipeline stage consumes the records of
//! the stage before it, so these types double as the stage contracts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the supply/demand (volume accumulation) table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeAnalysisRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub obv: f64,
    pub obv_change_20d: f64,
    pub ad_line: f64,
    pub ad_change_20d: f64,
    pub mfi: f64,
    pub vwap: f64,
    pub volume_surge: bool,
    pub volume_ratio_5_20: f64,
    pub supply_demand_score: f64,
    pub stage: String,
}

/// One row of the institutional/insider ownership table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionalRecord {
    pub ticker: String,
    pub institutional_ownership: Option<f64>,
    pub institutional_holders: Option<i64>,
    pub insider_buys: u32,
    pub insider_sells: u32,
    pub insider_signal: String,
    pub short_percent: Option<f64>,
    pub institutional_score: f64,
    pub stage: String,
}

/// One row of the ETF flow table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtfFlowRecord {
    pub ticker: String,
    pub name: String,
    pub category: String,
    pub date: NaiveDate,
    pub close: f64,
    pub obv_change_20d: f64,
    pub volume_ratio_5_20: f64,
    pub price_return_20d: f64,
    pub flow_score: f64,
    pub flow_direction: String,
}

/// AI commentary over the ETF flow table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtfFlowCommentary {
    pub generated_at: DateTime<Utc>,
    pub top_inflows: Vec<String>,
    pub top_outflows: Vec<String>,
    pub analysis: String,
}

/// One ranked row of the composite screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositePick {
    pub rank: u32,
    pub ticker: String,
    pub company_name: String,
    pub close: f64,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub size_bucket: String,
    pub supply_demand_score: f64,
    pub institutional_score: f64,
    pub technical_score: f64,
    pub fundamental_score: f64,
    pub analyst_score: f64,
    pub rs_score: f64,
    pub composite_score: f64,
    pub grade: String,
    pub accumulation_stage: String,
    pub institutional_stage: String,
    pub rsi: f64,
    pub pe_ratio: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub roe: Option<f64>,
    pub recommendation_key: Option<String>,
    pub target_upside_pct: f64,
    pub rs_20d: f64,
    pub rs_60d: f64,
}

/// Insider transaction after buy/sell classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    pub date: NaiveDate,
    pub insider: String,
    pub transaction_type: String,
    pub transaction: String,
    pub shares: Option<f64>,
    pub value: Option<f64>,
}

/// Per-ticker insider activity summary over the lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderActivityRecord {
    pub ticker: String,
    pub buy_count: u32,
    pub sell_count: u32,
    pub total_buy_value: f64,
    pub total_sell_value: f64,
    pub cluster_score: i32,
    pub has_cluster: bool,
    pub insider_score: f64,
    pub total_transactions: usize,
    /// Ten most recent transactions.
    pub transactions: Vec<ClassifiedTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderMovesDoc {
    pub generated_at: DateTime<Utc>,
    pub window_days: i64,
    pub tickers: Vec<InsiderActivityRecord>,
}

/// Per-ticker options flow snapshot for the nearest expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsFlowRecord {
    pub ticker: String,
    pub expiry: NaiveDate,
    pub call_volume: f64,
    pub put_volume: f64,
    pub put_call_ratio: f64,
    pub call_open_interest: f64,
    pub put_open_interest: f64,
    pub put_call_oi_ratio: f64,
    pub unusual_calls: u32,
    pub unusual_puts: u32,
    pub sentiment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsFlowDoc {
    pub generated_at: DateTime<Utc>,
    pub tickers: Vec<OptionsFlowRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub ticker_a: String,
    pub ticker_b: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerVolatility {
    pub ticker: String,
    pub volatility_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRiskReport {
    pub generated_at: DateTime<Utc>,
    pub tickers: Vec<String>,
    /// Annualized equal-weight portfolio volatility as a fraction.
    pub portfolio_volatility: f64,
    pub portfolio_volatility_pct: f64,
    pub risk_level: String,
    pub beta: f64,
    pub diversification_ratio: f64,
    pub individual_volatilities: Vec<TickerVolatility>,
    pub high_correlations: Vec<CorrelationPair>,
    /// Row/column order follows `tickers`.
    pub correlation_matrix: Vec<Vec<f64>>,
    pub warnings: Vec<String>,
}

/// One sector ETF cell of the heatmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub ticker: String,
    pub sector: String,
    pub color: String,
    pub close: f64,
    pub change_pct: f64,
    pub change_5d_pct: f64,
    pub weight: f64,
    pub heat_color: String,
}

/// One representative stock cell of the heatmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockHeatItem {
    pub ticker: String,
    pub sector: String,
    pub close: f64,
    pub change_pct: f64,
    pub weight: f64,
    pub heat_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorHeatmapDoc {
    pub generated_at: DateTime<Utc>,
    pub sectors: Vec<SectorPerformance>,
    pub stocks: Vec<StockHeatItem>,
}

/// One macro indicator snapshot with its 52-week range position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change_pct: f64,
    pub week52_high: f64,
    pub week52_low: f64,
    pub pct_from_high: f64,
    pub pct_from_low: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroAnalysisDoc {
    pub generated_at: DateTime<Utc>,
    pub language: String,
    pub indicators: Vec<MacroIndicator>,
    pub yield_spread_10y_2y: f64,
    pub curve_inverted: bool,
    pub fear_greed_index: i32,
    pub historical_patterns: Vec<String>,
    pub analysis: String,
}

/// One upcoming economic event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub date: NaiveDate,
    pub event: String,
    pub impact: String,
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub ai_analysis: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDoc {
    pub generated_at: DateTime<Utc>,
    pub week_start: NaiveDate,
    pub days_ahead: i64,
    pub total_events: usize,
    pub high_impact_count: usize,
    pub events: Vec<EconomicEvent>,
}

/// Bilingual AI summary for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub summary: String,
    pub summary_en: String,
    pub headlines: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Keyed by ticker so regeneration can upsert without disturbing the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStore {
    pub generated_at: Option<DateTime<Utc>>,
    pub summaries: BTreeMap<String, TickerSummary>,
}

/// One row of the final blended report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReportEntry {
    pub rank: u32,
    pub ticker: String,
    pub company_name: String,
    pub close: f64,
    pub quant_score: f64,
    pub ai_score: f64,
    pub ai_recommendation: String,
    pub final_score: f64,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub count: usize,
    pub avg_final_score: f64,
    pub avg_quant_score: f64,
    pub avg_ai_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub generated_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub summary: ReportSummary,
    pub picks: Vec<FinalReportEntry>,
}
