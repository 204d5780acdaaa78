//! One function per pipeline stage. Every stage reads its inputs from the
//! vendor or the data store, writes its output back to the store, and keeps
//! going past individual ticker failures.

use ai_insights::macro_analysis::{self, MACRO_NEWS_ITEMS, MACRO_NEWS_QUERY, MACRO_TICKERS};
use ai_insights::summaries::SummaryGenerator;
use ai_insights::{calendar, GeminiClient};
use chrono::Utc;
use composite_screener::SmartMoneyScreener;
use data_store::DataStore;
use etf_flows::{generate_commentary, EtfFlowAnalyzer, ETF_UNIVERSE};
use institutional_analysis::InstitutionalAnalyzer;
use market_data::MarketDataClient;
use market_pulse::insider::{self, DEFAULT_WATCHLIST, WINDOW_DAYS};
use market_pulse::options::{self, OPTIONS_WATCHLIST};
use market_pulse::portfolio_risk::{analyze_portfolio, PortfolioInput};
use market_pulse::sector_heatmap::{
    build_heatmap, sector_cell, stock_cell, SECTOR_ETFS, SECTOR_STOCKS,
};
use dashmap::DashMap;
use screener_core::{
    Bar, InsiderMovesDoc, MarketDataSource, OptionsFlowDoc, ScreenerError, SummaryStore,
    TextGenerator,
};
use std::sync::Arc;
use std::time::Duration;
use volume_analysis::VolumeAnalyzer;

/// Daily-bar history pulled for indicator stages.
const HISTORY_DAYS: i64 = 150;
/// Full year, for 52-week ranges and annualized volatility.
const YEAR_DAYS: i64 = 365;
/// Short tail for the heatmap's 1d/5d returns.
const HEATMAP_DAYS: i64 = 15;
/// Courtesy pause between sequential vendor calls.
const FETCH_PAUSE: Duration = Duration::from_millis(100);

const BENCHMARK: &str = "SPY";
/// Tickers carried into the insider/risk stages from the screen output.
const PULSE_TICKERS: usize = 10;

pub struct Context {
    pub store: DataStore,
    pub source: Arc<MarketDataClient>,
    pub generator: Arc<GeminiClient>,
    pub tickers: Vec<String>,
    /// Memo cache so a full run fetches each (symbol, window) once.
    pub bar_cache: DashMap<(String, i64), Vec<Bar>>,
}

async fn fetch_bars(ctx: &Context, symbol: &str, days: i64) -> Option<Vec<Bar>> {
    let key = (symbol.to_string(), days);
    if let Some(cached) = ctx.bar_cache.get(&key) {
        return Some(cached.clone());
    }

    let bars = match ctx.source.daily_bars(symbol, days).await {
        Ok(bars) => bars,
        Err(e) => {
            tracing::warn!(symbol, error = %e, "bar fetch failed");
            return None;
        }
    };
    tokio::time::sleep(FETCH_PAUSE).await;
    ctx.bar_cache.insert(key, bars.clone());
    Some(bars)
}

async fn benchmark_closes(ctx: &Context, days: i64) -> Vec<f64> {
    fetch_bars(ctx, BENCHMARK, days)
        .await
        .map(|bars| bars.iter().map(|b| b.close).collect())
        .unwrap_or_default()
}

/// Stage: volume/accumulation analysis over the screening universe.
pub async fn run_volume(ctx: &Context) -> Result<(), ScreenerError> {
    let analyzer = VolumeAnalyzer::new();
    let mut records = Vec::new();

    for ticker in &ctx.tickers {
        let Some(bars) = fetch_bars(ctx, ticker, HISTORY_DAYS).await else { continue };
        match analyzer.analyze(ticker, &bars) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(ticker = %ticker, error = %e, "volume analysis skipped"),
        }
    }

    if records.is_empty() {
        return Err(ScreenerError::InsufficientData(
            "no ticker produced a volume record".to_string(),
        ));
    }
    tracing::info!(rows = records.len(), "volume analysis complete");
    ctx.store.save_volume(&records)
}

/// Stage: institutional ownership and insider-signal scoring.
pub async fn run_institutional(ctx: &Context) -> Result<(), ScreenerError> {
    let analyzer = InstitutionalAnalyzer::new();
    let mut records = Vec::new();

    for ticker in &ctx.tickers {
        let info = match ctx.source.ticker_info(ticker).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "info fetch failed");
                continue;
            }
        };
        let transactions = ctx
            .source
            .insider_transactions(ticker)
            .await
            .unwrap_or_default();
        records.push(analyzer.analyze(ticker, &info, &transactions));
        tokio::time::sleep(FETCH_PAUSE).await;
    }

    if records.is_empty() {
        return Err(ScreenerError::InsufficientData(
            "no ticker produced an institutional record".to_string(),
        ));
    }
    tracing::info!(rows = records.len(), "institutional analysis complete");
    ctx.store.save_institutional(&records)
}

/// Stage: ETF flow proxies plus optional AI commentary.
pub async fn run_etf_flows(ctx: &Context) -> Result<(), ScreenerError> {
    let analyzer = EtfFlowAnalyzer::new();
    let mut records = Vec::new();

    for etf in ETF_UNIVERSE {
        let Some(bars) = fetch_bars(ctx, etf.ticker, HISTORY_DAYS).await else { continue };
        match analyzer.analyze(etf, &bars) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(ticker = etf.ticker, error = %e, "etf flow skipped"),
        }
    }

    if records.is_empty() {
        return Err(ScreenerError::InsufficientData(
            "no ETF produced a flow record".to_string(),
        ));
    }
    ctx.store.save_etf_flows(&records)?;

    let commentary = generate_commentary(ctx.generator.as_ref(), &records).await?;
    ctx.store.save_etf_commentary(&commentary)?;
    tracing::info!(rows = records.len(), "etf flow analysis complete");
    Ok(())
}

/// Stage: composite screen over the volume and institutional tables.
pub async fn run_screen(ctx: &Context) -> Result<(), ScreenerError> {
    let volume = ctx.store.load_volume()?.ok_or_else(|| {
        ScreenerError::InsufficientData("volume analysis has not run yet".to_string())
    })?;
    let institutional = ctx.store.load_institutional()?.ok_or_else(|| {
        ScreenerError::InsufficientData("institutional analysis has not run yet".to_string())
    })?;

    let benchmark = benchmark_closes(ctx, HISTORY_DAYS).await;
    let screener = SmartMoneyScreener::new(ctx.source.clone() as Arc<dyn MarketDataSource>);
    let picks = screener.run(&volume, &institutional, &benchmark).await?;

    tracing::info!(picks = picks.len(), "composite screen complete");
    ctx.store.save_picks(&picks)
}

/// Pulse ticker list: screen output first, fallback watchlist otherwise.
async fn pulse_tickers(ctx: &Context) -> Vec<String> {
    match ctx.store.load_picks() {
        Ok(Some(picks)) if !picks.is_empty() => picks
            .iter()
            .take(PULSE_TICKERS)
            .map(|p| p.ticker.clone())
            .collect(),
        _ => DEFAULT_WATCHLIST.iter().map(|t| t.to_string()).collect(),
    }
}

/// Stage: insider clusters, options flow, portfolio risk, sector heatmap.
pub async fn run_market_pulse(ctx: &Context) -> Result<(), ScreenerError> {
    let today = Utc::now().date_naive();
    let watchlist = pulse_tickers(ctx).await;

    // Insider cluster tracking.
    let mut insider_records = Vec::new();
    for ticker in &watchlist {
        let transactions = ctx
            .source
            .insider_transactions(ticker)
            .await
            .unwrap_or_default();
        if let Some(record) = insider::analyze_ticker(ticker, &transactions, today) {
            insider_records.push(record);
        }
        tokio::time::sleep(FETCH_PAUSE).await;
    }
    ctx.store.save_insider_moves(&InsiderMovesDoc {
        generated_at: Utc::now(),
        window_days: WINDOW_DAYS,
        tickers: insider_records,
    })?;

    // Options flow over the fixed watchlist.
    let mut option_records = Vec::new();
    for &ticker in OPTIONS_WATCHLIST {
        match ctx.source.options_chain(ticker).await {
            Ok(Some(chain)) => option_records.push(options::analyze_chain(&chain)),
            Ok(None) => tracing::debug!(ticker, "no options chain"),
            Err(e) => tracing::warn!(ticker, error = %e, "options fetch failed"),
        }
        tokio::time::sleep(FETCH_PAUSE).await;
    }
    ctx.store.save_options_flow(&OptionsFlowDoc {
        generated_at: Utc::now(),
        tickers: option_records,
    })?;

    // Portfolio risk over the pulse tickers.
    let mut legs = Vec::new();
    for ticker in &watchlist {
        if let Some(bars) = fetch_bars(ctx, ticker, YEAR_DAYS).await {
            legs.push(PortfolioInput {
                ticker: ticker.clone(),
                closes: bars.iter().map(|b| b.close).collect(),
            });
        }
    }
    let benchmark = benchmark_closes(ctx, YEAR_DAYS).await;
    match analyze_portfolio(&legs, &benchmark) {
        Ok(report) => ctx.store.save_portfolio_risk(&report)?,
        Err(e) => tracing::warn!(error = %e, "portfolio risk skipped"),
    }

    // Sector heatmap, both levels.
    let mut sectors = Vec::new();
    for &(ticker, sector, color) in SECTOR_ETFS {
        if let Some(bars) = fetch_bars(ctx, ticker, HEATMAP_DAYS).await {
            sectors.extend(sector_cell(ticker, sector, color, &bars));
        }
    }
    let mut stocks = Vec::new();
    for &(sector, members) in SECTOR_STOCKS {
        for &ticker in members {
            if let Some(bars) = fetch_bars(ctx, ticker, HEATMAP_DAYS).await {
                stocks.extend(stock_cell(ticker, sector, &bars));
            }
        }
    }
    ctx.store.save_sector_heatmap(&build_heatmap(sectors, stocks))?;

    tracing::info!("market pulse complete");
    Ok(())
}

/// Stage: bilingual AI summaries for the top picks.
pub async fn run_summaries(ctx: &Context, top: usize, refresh: bool) -> Result<(), ScreenerError> {
    let picks = ctx.store.load_picks()?.ok_or_else(|| {
        ScreenerError::InsufficientData("composite screen has not run yet".to_string())
    })?;
    let existing = ctx.store.load_summaries()?.unwrap_or_else(SummaryStore::default);

    let generator = SummaryGenerator::new(
        ctx.source.clone() as Arc<dyn MarketDataSource>,
        ctx.generator.clone() as Arc<dyn TextGenerator>,
    );
    let store = generator.run(&picks, existing, top, refresh).await;

    tracing::info!(summaries = store.summaries.len(), "summary generation complete");
    ctx.store.save_summaries(&store)
}

/// Stage: macro indicators plus bilingual strategy commentary.
pub async fn run_macro(ctx: &Context) -> Result<(), ScreenerError> {
    let mut indicators = Vec::new();
    for &(name, symbol) in MACRO_TICKERS {
        if let Some(bars) = fetch_bars(ctx, symbol, YEAR_DAYS).await {
            match macro_analysis::build_indicator(name, symbol, &bars) {
                Some(indicator) => indicators.push(indicator),
                None => tracing::warn!(name, symbol, "not enough history for indicator"),
            }
        }
    }
    if indicators.is_empty() {
        return Err(ScreenerError::InsufficientData(
            "no macro indicator could be built".to_string(),
        ));
    }

    let headlines = ctx
        .source
        .search_news(MACRO_NEWS_QUERY, MACRO_NEWS_ITEMS)
        .await
        .unwrap_or_default();

    for lang in ["ko", "en"] {
        let doc = macro_analysis::build_macro_doc(
            ctx.generator.as_ref(),
            indicators.clone(),
            &headlines,
            lang,
        )
        .await;
        ctx.store.save_macro(&doc)?;
    }

    tracing::info!(indicators = indicators.len(), "macro analysis complete");
    Ok(())
}

/// Stage: economic calendar with AI impact notes on high-impact events.
pub async fn run_calendar(ctx: &Context, days_ahead: i64) -> Result<(), ScreenerError> {
    let today = Utc::now().date_naive();
    let mut events = calendar::upcoming_events(today, days_ahead);
    calendar::enrich_with_ai(ctx.generator.as_ref(), &mut events).await;
    ctx.store
        .save_calendar(&calendar::build_calendar(today, days_ahead, events))
}

/// Stage: final quant/AI blended report.
pub async fn run_report(ctx: &Context, top: usize) -> Result<(), ScreenerError> {
    let picks = ctx.store.load_picks()?.ok_or_else(|| {
        ScreenerError::InsufficientData("composite screen has not run yet".to_string())
    })?;
    let summaries = ctx.store.load_summaries()?.unwrap_or_else(SummaryStore::default);

    let report = final_report::build_report(&picks, &summaries, top);
    tracing::info!(picks = report.picks.len(), "final report complete");
    ctx.store.save_final_report(&report)
}
