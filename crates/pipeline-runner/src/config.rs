use std::path::PathBuf;

/// Default screening universe when `SCREENER_TICKERS` is unset. Liquid
/// large caps across sectors, small enough to stay inside free-tier quotas.
pub const DEFAULT_UNIVERSE: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "TSLA", "AVGO", "AMD", "CRM",
    "JPM", "V", "MA", "BAC", "GS", "UNH", "LLY", "JNJ", "ABBV", "MRK",
    "XOM", "CVX", "CAT", "HON", "GE", "COST", "WMT", "PG", "NFLX", "DIS",
];

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REQUESTS_PER_MINUTE: usize = 120;

/// Runtime configuration from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub market_api_key: String,
    pub google_api_key: String,
    pub tickers: Vec<String>,
    pub requests_per_minute: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
            .into();
        let market_api_key = std::env::var("MARKET_DATA_API_KEY").unwrap_or_default();
        let google_api_key = std::env::var("GOOGLE_API_KEY").unwrap_or_default();

        let tickers = std::env::var("SCREENER_TICKERS")
            .map(|raw| parse_tickers(&raw))
            .ok()
            .filter(|t: &Vec<String>| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIVERSE.iter().map(|t| t.to_string()).collect());

        let requests_per_minute = std::env::var("MARKET_DATA_RPM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUESTS_PER_MINUTE);

        Self { data_dir, market_api_key, google_api_key, tickers, requests_per_minute }
    }
}

fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}
