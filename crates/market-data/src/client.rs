use crate::news::NewsFeed;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use screener_core::{
    retry_with_backoff, Bar, InsiderTransaction, MarketDataSource, NewsHeadline, OptionContract,
    OptionsChain, RateLimiter, ScreenerError, TickerInfo,
};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.marketfeed.dev";
const RETRIES: u32 = 3;

/// HTTP market-data client. One rate limiter is shared with the news feed
/// so all vendor traffic counts against the same window.
pub struct MarketDataClient {
    base_url: String,
    api_key: String,
    client: Client,
    rate_limiter: RateLimiter,
    news: NewsFeed,
}

impl MarketDataClient {
    pub fn new(api_key: String, rate_limiter: RateLimiter) -> Self {
        let base_url = std::env::var("MARKET_DATA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        let news = NewsFeed::new(client.clone(), rate_limiter.clone());

        Self { base_url, api_key, client, rate_limiter, news }
    }

    /// Free-form news search, for queries that are not a single ticker.
    pub async fn search_news(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, ScreenerError> {
        self.news.search(query, limit).await
    }

    /// GET a path with rate limiting, backoff retry, and 429 handling.
    /// 401/403/404 are treated as "vendor has nothing" and return None.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<serde_json::Value>, ScreenerError> {
        let url = format!("{}{}", self.base_url, path);
        let url = &url;

        retry_with_backoff(RETRIES, Duration::from_secs(1), move || async move {
            self.rate_limiter.acquire().await;

            let response = self
                .client
                .get(url.as_str())
                .query(query)
                .query(&[("apiKey", self.api_key.as_str())])
                .send()
                .await
                .map_err(|e| ScreenerError::Api(e.to_string()))?;

            let status = response.status();
            match status.as_u16() {
                401 | 403 | 404 => {
                    tracing::debug!(%url, %status, "no data available");
                    Ok(None)
                }
                429 => Err(ScreenerError::Api("rate limited by vendor".to_string())),
                _ if status.is_success() => {
                    let value = response
                        .json::<serde_json::Value>()
                        .await
                        .map_err(|e| ScreenerError::Api(e.to_string()))?;
                    Ok(Some(value))
                }
                _ => Err(ScreenerError::Api(format!(
                    "HTTP {} from {}",
                    status,
                    url
                ))),
            }
        })
        .await
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    bars: Vec<RawBar>,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
    #[serde(default)]
    vw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    market_cap: Option<f64>,
    #[serde(default)]
    trailing_pe: Option<f64>,
    #[serde(default)]
    revenue_growth: Option<f64>,
    #[serde(default)]
    return_on_equity: Option<f64>,
    #[serde(default)]
    held_percent_institutions: Option<f64>,
    #[serde(default)]
    institutional_holders: Option<i64>,
    #[serde(default)]
    short_percent_of_float: Option<f64>,
    #[serde(default)]
    recommendation_key: Option<String>,
    #[serde(default)]
    target_mean_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct InsiderResponse {
    #[serde(default)]
    transactions: Vec<RawInsiderTransaction>,
}

#[derive(Debug, Deserialize)]
struct RawInsiderTransaction {
    date: NaiveDate,
    insider: String,
    #[serde(default)]
    title: Option<String>,
    transaction: String,
    #[serde(default)]
    shares: Option<f64>,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChainResponse {
    expiry: NaiveDate,
    #[serde(default)]
    calls: Vec<RawContract>,
    #[serde(default)]
    puts: Vec<RawContract>,
}

#[derive(Debug, Deserialize)]
struct RawContract {
    strike: f64,
    #[serde(default)]
    last_price: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    open_interest: Option<f64>,
    #[serde(default)]
    implied_volatility: Option<f64>,
}

impl RawContract {
    fn into_contract(self) -> OptionContract {
        OptionContract {
            strike: self.strike,
            last_price: self.last_price,
            volume: self.volume.unwrap_or(0.0),
            open_interest: self.open_interest.unwrap_or(0.0),
            implied_volatility: self.implied_volatility,
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, ScreenerError> {
    serde_json::from_value(value).map_err(|e| ScreenerError::Api(e.to_string()))
}

#[async_trait]
impl MarketDataSource for MarketDataClient {
    async fn daily_bars(&self, symbol: &str, days: i64) -> Result<Vec<Bar>, ScreenerError> {
        let path = format!("/v1/history/{}", symbol);
        let value = self.get_json(&path, &[("days", days.to_string())]).await?;

        let Some(value) = value else { return Ok(vec![]) };
        let history: HistoryResponse = parse(value)?;

        let mut bars: Vec<Bar> = history
            .bars
            .into_iter()
            .filter_map(|r| {
                DateTime::<Utc>::from_timestamp_millis(r.t).map(|timestamp| Bar {
                    timestamp,
                    open: r.o,
                    high: r.h,
                    low: r.l,
                    close: r.c,
                    volume: r.v,
                    vwap: r.vw,
                })
            })
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, ScreenerError> {
        let path = format!("/v1/info/{}", symbol);
        let value = self.get_json(&path, &[]).await?;

        let info: InfoResponse = match value {
            Some(value) => parse(value)?,
            None => InfoResponse::default(),
        };

        Ok(TickerInfo {
            symbol: symbol.to_string(),
            company_name: info.company_name,
            sector: info.sector,
            industry: info.industry,
            current_price: info.current_price,
            market_cap: info.market_cap,
            trailing_pe: info.trailing_pe,
            revenue_growth: info.revenue_growth,
            return_on_equity: info.return_on_equity,
            held_percent_institutions: info.held_percent_institutions,
            institutional_holders: info.institutional_holders,
            short_percent_of_float: info.short_percent_of_float,
            recommendation_key: info.recommendation_key,
            target_mean_price: info.target_mean_price,
        })
    }

    async fn insider_transactions(
        &self,
        symbol: &str,
    ) -> Result<Vec<InsiderTransaction>, ScreenerError> {
        let path = format!("/v1/insiders/{}", symbol);
        let value = self.get_json(&path, &[]).await?;

        let Some(value) = value else { return Ok(vec![]) };
        let response: InsiderResponse = parse(value)?;

        Ok(response
            .transactions
            .into_iter()
            .map(|r| InsiderTransaction {
                date: r.date,
                insider: r.insider,
                title: r.title,
                transaction: r.transaction,
                shares: r.shares,
                value: r.value,
            })
            .collect())
    }

    async fn options_chain(&self, symbol: &str) -> Result<Option<OptionsChain>, ScreenerError> {
        let path = format!("/v1/options/{}", symbol);
        let value = self.get_json(&path, &[("expiry", "nearest".to_string())]).await?;

        let Some(value) = value else { return Ok(None) };
        let chain: ChainResponse = parse(value)?;

        Ok(Some(OptionsChain {
            symbol: symbol.to_string(),
            expiry: chain.expiry,
            calls: chain.calls.into_iter().map(RawContract::into_contract).collect(),
            puts: chain.puts.into_iter().map(RawContract::into_contract).collect(),
        }))
    }

    async fn news_headlines(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, ScreenerError> {
        self.news.headlines(symbol, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_response_parses_and_sorts() {
        let value = serde_json::json!({
            "bars": [
                {"t": 1717200000000i64, "o": 11.0, "h": 12.0, "l": 10.5, "c": 11.5, "v": 2000.0},
                {"t": 1717100000000i64, "o": 10.0, "h": 11.0, "l": 9.5, "c": 10.5, "v": 1000.0}
            ]
        });
        let history: HistoryResponse = parse(value).unwrap();
        assert_eq!(history.bars.len(), 2);
    }

    #[test]
    fn info_response_tolerates_sparse_payload() {
        let value = serde_json::json!({"trailing_pe": 18.2});
        let info: InfoResponse = parse(value).unwrap();
        assert_eq!(info.trailing_pe, Some(18.2));
        assert!(info.market_cap.is_none());
        assert!(info.recommendation_key.is_none());
    }

    #[test]
    fn contract_defaults_missing_volume_to_zero() {
        let value = serde_json::json!({"strike": 100.0});
        let raw: RawContract = parse(value).unwrap();
        let contract = raw.into_contract();
        assert_eq!(contract.volume, 0.0);
        assert_eq!(contract.open_interest, 0.0);
    }
}
