use chrono::Utc;
use screener_core::{
    CompositePick, MarketDataSource, NewsHeadline, SummaryStore, TextGenerator, TickerSummary,
};
use std::sync::Arc;
use std::time::Duration;

const NEWS_ITEMS: usize = 3;
const GENERATION_PAUSE: Duration = Duration::from_millis(500);

/// Summary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Korean,
    English,
}

/// Generates bilingual investment summaries for the top screened picks.
pub struct SummaryGenerator {
    source: Arc<dyn MarketDataSource>,
    generator: Arc<dyn TextGenerator>,
}

fn score_info(pick: &CompositePick) -> String {
    let mut info = format!(
        "Composite Score: {:.1}/100, Grade: {}",
        pick.composite_score, pick.grade
    );
    if pick.close > 0.0 {
        info.push_str(&format!(", Current Price: ${:.2}", pick.close));
    }
    if pick.target_upside_pct != 0.0 {
        info.push_str(&format!(", Target Upside: {:.1}%", pick.target_upside_pct));
    }
    info
}

fn news_block(headlines: &[NewsHeadline]) -> String {
    if headlines.is_empty() {
        "No recent news available".to_string()
    } else {
        headlines
            .iter()
            .map(|h| format!("- {}", h.title))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Build the generation prompt for one pick.
pub fn build_prompt(pick: &CompositePick, headlines: &[NewsHeadline], lang: Language) -> String {
    let info = score_info(pick);
    let news = news_block(headlines);

    match lang {
        Language::Korean => format!(
            "종목: {}\n정보: {}\n최근 뉴스:\n{}\n\n위 정보를 바탕으로 3-4문장으로 투자 의견을 요약해주세요. 다음 항목을 포함해주세요:\n1. 수급/기술적 분석 요약\n2. 펀더멘털/가치 평가\n3. 투자 전략 및 권장사항\n\n이모지나 과도한 수식어는 사용하지 말고, 객관적이고 실용적인 내용으로 작성해주세요.",
            pick.ticker, info, news
        ),
        Language::English => format!(
            "Stock: {}\nInfo: {}\nRecent News:\n{}\n\nBased on the above information, provide a 3-4 sentence investment summary. Include:\n1. Supply/demand and technical analysis summary\n2. Fundamental/value assessment\n3. Investment strategy and recommendations\n\nBe objective and practical. Avoid emojis and excessive adjectives.",
            pick.ticker, info, news
        ),
    }
}

impl SummaryGenerator {
    pub fn new(source: Arc<dyn MarketDataSource>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { source, generator }
    }

    async fn generate_one(&self, pick: &CompositePick, headlines: &[NewsHeadline], lang: Language) -> String {
        match self.generator.generate(&build_prompt(pick, headlines, lang)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(ticker = %pick.ticker, error = %e, "summary generation failed");
                format!("Analysis Failed: {}", e)
            }
        }
    }

    /// Generate summaries for the top `top_n` picks by composite score.
    /// Existing entries are kept untouched unless `refresh` is set, so a
    /// rerun only fills the gaps.
    pub async fn run(
        &self,
        picks: &[CompositePick],
        mut store: SummaryStore,
        top_n: usize,
        refresh: bool,
    ) -> SummaryStore {
        let mut ranked: Vec<&CompositePick> = picks.iter().collect();
        ranked.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for pick in ranked.into_iter().take(top_n) {
            if !refresh && store.summaries.contains_key(&pick.ticker) {
                tracing::debug!(ticker = %pick.ticker, "summary exists, skipping");
                continue;
            }

            let headlines = self
                .source
                .news_headlines(&pick.ticker, NEWS_ITEMS)
                .await
                .unwrap_or_default();

            let summary_ko = self.generate_one(pick, &headlines, Language::Korean).await;
            tokio::time::sleep(GENERATION_PAUSE).await;
            let summary_en = self.generate_one(pick, &headlines, Language::English).await;
            tokio::time::sleep(GENERATION_PAUSE).await;

            tracing::info!(ticker = %pick.ticker, news = headlines.len(), "summary generated");

            store.summaries.insert(
                pick.ticker.clone(),
                TickerSummary {
                    ticker: pick.ticker.clone(),
                    summary: summary_ko,
                    summary_en,
                    headlines: headlines.into_iter().map(|h| h.title).collect(),
                    updated_at: Utc::now(),
                },
            );
        }

        store.generated_at = Some(Utc::now());
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use screener_core::{
        Bar, InsiderTransaction, OptionsChain, ScreenerError, TickerInfo,
    };

    struct FixtureSource;

    #[async_trait]
    impl MarketDataSource for FixtureSource {
        async fn daily_bars(&self, _: &str, _: i64) -> Result<Vec<Bar>, ScreenerError> {
            Ok(vec![])
        }
        async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, ScreenerError> {
            Ok(TickerInfo { symbol: symbol.to_string(), ..TickerInfo::default() })
        }
        async fn insider_transactions(
            &self,
            _: &str,
        ) -> Result<Vec<InsiderTransaction>, ScreenerError> {
            Ok(vec![])
        }
        async fn options_chain(&self, _: &str) -> Result<Option<OptionsChain>, ScreenerError> {
            Ok(None)
        }
        async fn news_headlines(
            &self,
            symbol: &str,
            _: usize,
        ) -> Result<Vec<NewsHeadline>, ScreenerError> {
            Ok(vec![NewsHeadline {
                title: format!("{} beats estimates", symbol),
                link: None,
                published: None,
            }])
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ScreenerError> {
            Ok(format!("generated:{}", prompt.len()))
        }
        fn is_configured(&self) -> bool {
            true
        }
    }

    fn pick(ticker: &str, score: f64) -> CompositePick {
        CompositePick {
            rank: 0,
            ticker: ticker.to_string(),
            company_name: ticker.to_string(),
            close: 150.0,
            sector: None,
            market_cap: None,
            size_bucket: "Large".to_string(),
            supply_demand_score: 60.0,
            institutional_score: 60.0,
            technical_score: 60.0,
            fundamental_score: 60.0,
            analyst_score: 60.0,
            rs_score: 60.0,
            composite_score: score,
            grade: "B급 (매수 고려)".to_string(),
            accumulation_stage: "Accumulation".to_string(),
            institutional_stage: "Neutral".to_string(),
            rsi: 55.0,
            pe_ratio: None,
            revenue_growth: None,
            roe: None,
            recommendation_key: None,
            target_upside_pct: 12.5,
            rs_20d: 2.0,
            rs_60d: 4.0,
        }
    }

    #[test]
    fn prompt_carries_scores_and_news() {
        let headlines = vec![NewsHeadline {
            title: "AAPL beats estimates".to_string(),
            link: None,
            published: None,
        }];
        let prompt = build_prompt(&pick("AAPL", 72.5), &headlines, Language::English);
        assert!(prompt.starts_with("Stock: AAPL"));
        assert!(prompt.contains("Composite Score: 72.5/100"));
        assert!(prompt.contains("Current Price: $150.00"));
        assert!(prompt.contains("Target Upside: 12.5%"));
        assert!(prompt.contains("- AAPL beats estimates"));
    }

    #[test]
    fn korean_prompt_covers_all_sections() {
        let prompt = build_prompt(&pick("NVDA", 81.0), &[], Language::Korean);
        assert!(prompt.starts_with("종목: NVDA"));
        assert!(prompt.contains("No recent news available"));
        assert!(prompt.contains("1. 수급/기술적 분석 요약"));
        assert!(prompt.contains("3. 투자 전략 및 권장사항"));
    }

    #[tokio::test]
    async fn run_fills_top_n_and_skips_existing() {
        let generator = SummaryGenerator::new(Arc::new(FixtureSource), Arc::new(EchoGenerator));
        let picks = vec![pick("AAA", 80.0), pick("BBB", 70.0), pick("CCC", 60.0)];

        let store = generator.run(&picks, SummaryStore::default(), 2, false).await;
        assert_eq!(store.summaries.len(), 2);
        assert!(store.summaries.contains_key("AAA"));
        assert!(store.summaries.contains_key("BBB"));
        assert!(!store.summaries.contains_key("CCC"));
        assert_eq!(store.summaries["AAA"].headlines, vec!["AAA beats estimates"]);

        // Rerun without refresh keeps existing entries as they are.
        let before = store.summaries["AAA"].updated_at;
        let store = generator.run(&picks, store, 2, false).await;
        assert_eq!(store.summaries["AAA"].updated_at, before);
    }
}
