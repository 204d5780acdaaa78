use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub vwap: Option<f64>,
}

/// Sparse per-ticker info bag as vendors report it. Every field is optional;
/// scorers fall back to neutral when a field is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickerInfo {
    pub symbol: String,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub held_percent_institutions: Option<f64>,
    pub institutional_holders: Option<i64>,
    pub short_percent_of_float: Option<f64>,
    pub recommendation_key: Option<String>,
    pub target_mean_price: Option<f64>,
}

/// Raw insider transaction as reported, before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderTransaction {
    pub date: NaiveDate,
    pub insider: String,
    pub title: Option<String>,
    /// Free-form transaction description, e.g. "Sale", "Purchase at $12.30".
    pub transaction: String,
    pub shares: Option<f64>,
    pub value: Option<f64>,
}

/// Single option contract from a chain snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub strike: f64,
    pub last_price: Option<f64>,
    pub volume: f64,
    pub open_interest: f64,
    pub implied_volatility: Option<f64>,
}

/// Option chain for one expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsChain {
    pub symbol: String,
    pub expiry: NaiveDate,
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

/// News headline from a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
}
