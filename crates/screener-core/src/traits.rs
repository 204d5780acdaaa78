use crate::{Bar, InsiderTransaction, NewsHeadline, OptionsChain, ScreenerError, TickerInfo};
use async_trait::async_trait;

/// Source of market data for the pipeline. The production implementation
/// talks HTTP; tests substitute fixtures.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for roughly the last `days` calendar days, oldest first.
    async fn daily_bars(&self, symbol: &str, days: i64) -> Result<Vec<Bar>, ScreenerError>;

    /// Sparse fundamentals/ownership/analyst info bag.
    async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, ScreenerError>;

    /// Recent insider transactions, newest first. Empty when the vendor has
    /// nothing for the symbol.
    async fn insider_transactions(
        &self,
        symbol: &str,
    ) -> Result<Vec<InsiderTransaction>, ScreenerError>;

    /// Options chain for the nearest expiry, or `None` when no chain exists.
    async fn options_chain(&self, symbol: &str) -> Result<Option<OptionsChain>, ScreenerError>;

    /// Recent news headlines for the symbol, newest first.
    async fn news_headlines(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, ScreenerError>;
}

/// Text generation backend for summaries and macro commentary.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt. Implementations return `Err` only for
    /// transport faults; content-level failures (blocked, empty) surface as
    /// sentinel strings so downstream scoring stays total.
    async fn generate(&self, prompt: &str) -> Result<String, ScreenerError>;

    /// Whether a usable credential is configured.
    fn is_configured(&self) -> bool;
}
