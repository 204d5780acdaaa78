use chrono::Utc;
use screener_core::{Bar, SectorHeatmapDoc, SectorPerformance, StockHeatItem};

/// The 11 S&P sector ETFs with their display colors.
pub const SECTOR_ETFS: &[(&str, &str, &str)] = &[
    ("XLK", "Technology", "#4A90A4"),
    ("XLF", "Financials", "#6B8E23"),
    ("XLV", "Healthcare", "#FF69B4"),
    ("XLE", "Energy", "#FF6347"),
    ("XLY", "Consumer Disc.", "#FFD700"),
    ("XLP", "Consumer Staples", "#98D8C8"),
    ("XLI", "Industrials", "#DDA0DD"),
    ("XLB", "Materials", "#F0E68C"),
    ("XLU", "Utilities", "#87CEEB"),
    ("XLRE", "Real Estate", "#CD853F"),
    ("XLC", "Comm. Services", "#9370DB"),
];

/// Representative stocks per sector for the detailed treemap.
pub const SECTOR_STOCKS: &[(&str, &[&str])] = &[
    ("Technology", &["AAPL", "MSFT", "NVDA", "AVGO", "ORCL", "CRM", "AMD", "ADBE"]),
    ("Financials", &["BRK-B", "JPM", "V", "MA", "BAC", "WFC", "GS", "MS"]),
    ("Healthcare", &["UNH", "JNJ", "LLY", "ABBV", "MRK", "TMO", "ABT", "DHR"]),
    ("Energy", &["XOM", "CVX", "SLB", "EOG", "COP", "MPC", "VLO", "PSX"]),
    ("Consumer Disc.", &["AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX", "LOW", "TJX"]),
    ("Consumer Staples", &["PG", "KO", "PEP", "COST", "WMT", "PM", "MO", "CL"]),
    ("Industrials", &["BA", "CAT", "GE", "HON", "UPS", "RTX", "DE", "LMT"]),
    ("Materials", &["LIN", "APD", "ECL", "SHW", "DD", "FCX", "NEM", "PPG"]),
    ("Utilities", &["NEE", "DUK", "SO", "AEP", "SRE", "EXC", "XEL", "WEC"]),
    ("Real Estate", &["PLD", "AMT", "EQIX", "PSA", "WELL", "SPG", "O", "DLR"]),
    ("Comm. Services", &["META", "GOOGL", "NFLX", "DIS", "CMCSA", "VZ", "T", "CHTR"]),
];

/// Heat color for a daily change percentage.
pub fn heat_color(change_pct: f64) -> &'static str {
    if change_pct >= 3.0 {
        "#00C853"
    } else if change_pct >= 1.0 {
        "#4CAF50"
    } else if change_pct >= 0.0 {
        "#81C784"
    } else if change_pct >= -1.0 {
        "#EF9A9A"
    } else if change_pct >= -3.0 {
        "#F44336"
    } else {
        "#B71C1C"
    }
}

fn change_over(bars: &[Bar], back: usize) -> f64 {
    if bars.len() <= back {
        return 0.0;
    }
    let base = bars[bars.len() - 1 - back].close;
    if base > 0.0 {
        (bars[bars.len() - 1].close / base - 1.0) * 100.0
    } else {
        0.0
    }
}

/// One sector ETF cell. Needs two bars for the daily change; the 5-day
/// return falls back to the daily change on shorter history.
pub fn sector_cell(ticker: &str, sector: &str, color: &str, bars: &[Bar]) -> Option<SectorPerformance> {
    if bars.len() < 2 {
        return None;
    }
    let last = &bars[bars.len() - 1];
    let change = change_over(bars, 1);
    let change_5d = if bars.len() >= 5 { change_over(bars, 4) } else { change };

    Some(SectorPerformance {
        ticker: ticker.to_string(),
        sector: sector.to_string(),
        color: color.to_string(),
        close: last.close,
        change_pct: change,
        change_5d_pct: change_5d,
        weight: last.close * last.volume,
        heat_color: heat_color(change).to_string(),
    })
}

/// One representative-stock cell.
pub fn stock_cell(ticker: &str, sector: &str, bars: &[Bar]) -> Option<StockHeatItem> {
    if bars.len() < 2 {
        return None;
    }
    let last = &bars[bars.len() - 1];
    let change = change_over(bars, 1);

    Some(StockHeatItem {
        ticker: ticker.to_string(),
        sector: sector.to_string(),
        close: last.close,
        change_pct: change,
        weight: last.close * last.volume,
        heat_color: heat_color(change).to_string(),
    })
}

/// Assemble the heatmap document, most active first on both levels.
pub fn build_heatmap(mut sectors: Vec<SectorPerformance>, mut stocks: Vec<StockHeatItem>) -> SectorHeatmapDoc {
    sectors.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    stocks.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    SectorHeatmapDoc { generated_at: Utc::now(), sectors, stocks }
}
