use chrono::DateTime;
use reqwest::Client;
use screener_core::{NewsHeadline, RateLimiter, ScreenerError};

const NEWS_BASE_URL: &str = "https://news.google.com/rss/search";

/// Google News RSS headline fetcher.
pub struct NewsFeed {
    client: Client,
    rate_limiter: RateLimiter,
}

impl NewsFeed {
    pub fn new(client: Client, rate_limiter: RateLimiter) -> Self {
        Self { client, rate_limiter }
    }

    /// Latest headlines mentioning the symbol, newest first. Feed or parse
    /// failures return an empty list so callers can keep going.
    pub async fn headlines(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, ScreenerError> {
        self.search(&format!("{} stock", symbol), limit).await
    }

    /// Raw search over the feed, used for broad queries like macro news.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, ScreenerError> {
        self.rate_limiter.acquire().await;

        let response = self
            .client
            .get(NEWS_BASE_URL)
            .query(&[("q", query), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
            .send()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(query, status = %response.status(), "news feed unavailable");
            return Ok(vec![]);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScreenerError::Api(e.to_string()))?;

        let channel = match rss::Channel::read_from(&body[..]) {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!(query, error = %e, "unparseable news feed");
                return Ok(vec![]);
            }
        };

        Ok(channel
            .items()
            .iter()
            .take(limit)
            .map(|item| NewsHeadline {
                title: item.title().unwrap_or("").to_string(),
                link: item.link().map(|l| l.to_string()),
                published: item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|d| d.to_utc()),
            })
            .filter(|h| !h.title.is_empty())
            .collect())
    }
}
