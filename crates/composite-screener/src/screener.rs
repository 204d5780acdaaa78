use crate::analyst::{analyze_analyst, AnalystSnapshot};
use crate::fundamental::{analyze_fundamental, FundamentalSnapshot};
use crate::relative_strength::{analyze_relative_strength, RelativeStrength};
use crate::technical::{analyze_technical, TechnicalSnapshot};
use screener_core::{
    CompositePick, InstitutionalRecord, MarketDataSource, ScreenerError, TickerInfo,
    VolumeAnalysisRecord,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Supply/demand gate: only accumulation candidates are enriched.
const MIN_SUPPLY_DEMAND_SCORE: f64 = 50.0;

/// Courtesy pause between per-ticker vendor fetches.
const FETCH_PAUSE: Duration = Duration::from_millis(100);

const WEIGHT_SUPPLY_DEMAND: f64 = 0.25;
const WEIGHT_INSTITUTIONAL: f64 = 0.20;
const WEIGHT_TECHNICAL: f64 = 0.20;
const WEIGHT_FUNDAMENTAL: f64 = 0.15;
const WEIGHT_ANALYST: f64 = 0.10;
const WEIGHT_RELATIVE_STRENGTH: f64 = 0.10;

/// Multi-factor screener over the volume and institutional tables.
pub struct SmartMoneyScreener {
    source: Arc<dyn MarketDataSource>,
}

impl SmartMoneyScreener {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// Join the two input tables, keep accumulation candidates, enrich each
    /// with technical/fundamental/analyst/relative-strength reads, and rank
    /// by weighted composite. Per-ticker fetch failures degrade to neutral
    /// factor scores instead of dropping the candidate.
    pub async fn run(
        &self,
        volume: &[VolumeAnalysisRecord],
        institutional: &[InstitutionalRecord],
        benchmark_closes: &[f64],
    ) -> Result<Vec<CompositePick>, ScreenerError> {
        let by_ticker: HashMap<&str, &InstitutionalRecord> =
            institutional.iter().map(|r| (r.ticker.as_str(), r)).collect();

        let candidates: Vec<&VolumeAnalysisRecord> = volume
            .iter()
            .filter(|v| v.supply_demand_score >= MIN_SUPPLY_DEMAND_SCORE)
            .filter(|v| by_ticker.contains_key(v.ticker.as_str()))
            .collect();

        tracing::info!(
            total = volume.len(),
            candidates = candidates.len(),
            "pre-filtered accumulation candidates"
        );

        let mut picks = Vec::with_capacity(candidates.len());

        for vol in candidates {
            let inst = by_ticker[vol.ticker.as_str()];
            let pick = self.enrich(vol, inst, benchmark_closes).await;
            picks.push(pick);
            tokio::time::sleep(FETCH_PAUSE).await;
        }

        rank_picks(&mut picks);
        Ok(picks)
    }

    async fn enrich(
        &self,
        vol: &VolumeAnalysisRecord,
        inst: &InstitutionalRecord,
        benchmark_closes: &[f64],
    ) -> CompositePick {
        let ticker = vol.ticker.as_str();

        let closes: Vec<f64> = match self.source.daily_bars(ticker, 180).await {
            Ok(bars) => bars.iter().map(|b| b.close).collect(),
            Err(e) => {
                tracing::warn!(ticker, error = %e, "price history unavailable, scoring neutral");
                vec![]
            }
        };

        let info = match self.source.ticker_info(ticker).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "ticker info unavailable, scoring neutral");
                TickerInfo { symbol: ticker.to_string(), ..TickerInfo::default() }
            }
        };

        let tech = analyze_technical(&closes);
        let fund = analyze_fundamental(&info);
        let analyst = analyze_analyst(&info);
        let rs = analyze_relative_strength(&closes, benchmark_closes);

        build_pick(vol, inst, &tech, &fund, &analyst, &rs)
    }
}

fn build_pick(
    vol: &VolumeAnalysisRecord,
    inst: &InstitutionalRecord,
    tech: &TechnicalSnapshot,
    fund: &FundamentalSnapshot,
    analyst: &AnalystSnapshot,
    rs: &RelativeStrength,
) -> CompositePick {
    let composite = screener_core::round1(composite_score(
        vol.supply_demand_score,
        inst.institutional_score,
        tech.technical_score,
        fund.fundamental_score,
        analyst.analyst_score,
        rs.rs_score,
    ));

    let close = if analyst.current_price > 0.0 {
        analyst.current_price
    } else {
        vol.close
    };

    CompositePick {
        rank: 0, // assigned after sorting
        ticker: vol.ticker.clone(),
        company_name: analyst.company_name.clone(),
        close,
        sector: None,
        market_cap: fund.market_cap,
        size_bucket: fund.size_bucket.clone(),
        supply_demand_score: vol.supply_demand_score,
        institutional_score: inst.institutional_score,
        technical_score: tech.technical_score,
        fundamental_score: fund.fundamental_score,
        analyst_score: analyst.analyst_score,
        rs_score: rs.rs_score,
        composite_score: composite,
        grade: grade(composite).to_string(),
        accumulation_stage: vol.stage.clone(),
        institutional_stage: inst.stage.clone(),
        rsi: tech.rsi,
        pe_ratio: fund.pe_ratio,
        revenue_growth: fund.revenue_growth,
        roe: fund.roe,
        recommendation_key: analyst.recommendation.clone(),
        target_upside_pct: analyst.upside_pct,
        rs_20d: rs.rs_20d,
        rs_60d: rs.rs_60d,
    }
}

/// Weighted blend of the six factor scores.
pub fn composite_score(
    supply_demand: f64,
    institutional: f64,
    technical: f64,
    fundamental: f64,
    analyst: f64,
    relative_strength: f64,
) -> f64 {
    supply_demand * WEIGHT_SUPPLY_DEMAND
        + institutional * WEIGHT_INSTITUTIONAL
        + technical * WEIGHT_TECHNICAL
        + fundamental * WEIGHT_FUNDAMENTAL
        + analyst * WEIGHT_ANALYST
        + relative_strength * WEIGHT_RELATIVE_STRENGTH
}

/// Six-tier grade over the composite.
pub fn grade(composite: f64) -> &'static str {
    if composite >= 80.0 {
        "S급 (즉시 매수)"
    } else if composite >= 70.0 {
        "A급 (적극 매수)"
    } else if composite >= 60.0 {
        "B급 (매수 고려)"
    } else if composite >= 50.0 {
        "C급 (관망)"
    } else if composite >= 40.0 {
        "D급 (주의)"
    } else {
        "F급 (회피)"
    }
}

/// Sort by composite descending, ties by ticker ascending, then assign
/// 1-based ranks. The tiebreak keeps reruns byte-stable.
pub fn rank_picks(picks: &mut [CompositePick]) {
    picks.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    for (i, pick) in picks.iter_mut().enumerate() {
        pick.rank = (i + 1) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
    use screener_core::{Bar, InsiderTransaction, NewsHeadline, OptionsChain};

    struct FixtureSource {
        closes: Vec<f64>,
        info: TickerInfo,
    }

    #[async_trait]
    impl MarketDataSource for FixtureSource {
        async fn daily_bars(&self, _symbol: &str, _days: i64) -> Result<Vec<Bar>, ScreenerError> {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            Ok(self
                .closes
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    timestamp: start + ChronoDuration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000_000.0,
                    vwap: None,
                })
                .collect())
        }

        async fn ticker_info(&self, symbol: &str) -> Result<TickerInfo, ScreenerError> {
            Ok(TickerInfo { symbol: symbol.to_string(), ..self.info.clone() })
        }

        async fn insider_transactions(
            &self,
            _symbol: &str,
        ) -> Result<Vec<InsiderTransaction>, ScreenerError> {
            Ok(vec![])
        }

        async fn options_chain(&self, _symbol: &str) -> Result<Option<OptionsChain>, ScreenerError> {
            Ok(None)
        }

        async fn news_headlines(
            &self,
            _symbol: &str,
            _limit: usize,
        ) -> Result<Vec<NewsHeadline>, ScreenerError> {
            Ok(vec![])
        }
    }

    fn volume_record(ticker: &str, score: f64) -> VolumeAnalysisRecord {
        VolumeAnalysisRecord {
            ticker: ticker.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            close: 100.0,
            volume: 1_000_000.0,
            obv: 0.0,
            obv_change_20d: 0.0,
            ad_line: 0.0,
            ad_change_20d: 0.0,
            mfi: 50.0,
            vwap: 100.0,
            volume_surge: false,
            volume_ratio_5_20: 1.0,
            supply_demand_score: score,
            stage: "Accumulation".to_string(),
        }
    }

    fn inst_record(ticker: &str, score: f64) -> InstitutionalRecord {
        InstitutionalRecord {
            ticker: ticker.to_string(),
            institutional_ownership: Some(0.7),
            institutional_holders: Some(1200),
            insider_buys: 2,
            insider_sells: 1,
            insider_signal: "Buying".to_string(),
            short_percent: Some(0.02),
            institutional_score: score,
            stage: "Institutional Support".to_string(),
        }
    }

    #[test]
    fn composite_weights_sum_to_one() {
        let all_70 = composite_score(70.0, 70.0, 70.0, 70.0, 70.0, 70.0);
        assert!((all_70 - 70.0).abs() < 1e-9);
    }

    #[test]
    fn composite_blend_example() {
        let composite = composite_score(60.0, 70.0, 55.0, 65.0, 50.0, 45.0);
        assert!((composite - 59.25).abs() < 1e-9);
        assert_eq!(grade(screener_core::round1(composite)), "C급 (관망)");
    }

    #[test]
    fn grade_tiers() {
        assert_eq!(grade(85.0), "S급 (즉시 매수)");
        assert_eq!(grade(72.0), "A급 (적극 매수)");
        assert_eq!(grade(65.0), "B급 (매수 고려)");
        assert_eq!(grade(55.0), "C급 (관망)");
        assert_eq!(grade(45.0), "D급 (주의)");
        assert_eq!(grade(30.0), "F급 (회피)");
    }

    #[test]
    fn ranking_breaks_ties_alphabetically() {
        let mk = |ticker: &str, score: f64| {
            let vol = volume_record(ticker, 60.0);
            let inst = inst_record(ticker, 60.0);
            let mut pick = build_pick(
                &vol,
                &inst,
                &TechnicalSnapshot::neutral(),
                &analyze_fundamental(&TickerInfo::default()),
                &analyze_analyst(&TickerInfo {
                    symbol: ticker.to_string(),
                    ..TickerInfo::default()
                }),
                &RelativeStrength::neutral(),
            );
            pick.composite_score = score;
            pick
        };
        let mut picks = vec![mk("ZZZ", 70.0), mk("AAA", 70.0), mk("MMM", 80.0)];
        rank_picks(&mut picks);
        let order: Vec<&str> = picks.iter().map(|p| p.ticker.as_str()).collect();
        assert_eq!(order, vec!["MMM", "AAA", "ZZZ"]);
        assert_eq!(picks[0].rank, 1);
        assert_eq!(picks[2].rank, 3);
    }

    #[tokio::test]
    async fn run_filters_and_enriches() {
        let source = Arc::new(FixtureSource {
            closes: (0..120).map(|i| 100.0 + i as f64 * 0.5).collect(),
            info: TickerInfo {
                company_name: Some("Test Corp".to_string()),
                current_price: Some(160.0),
                target_mean_price: Some(200.0),
                trailing_pe: Some(14.0),
                revenue_growth: Some(0.25),
                return_on_equity: Some(0.22),
                market_cap: Some(50e9),
                recommendation_key: Some("buy".to_string()),
                ..TickerInfo::default()
            },
        });
        let screener = SmartMoneyScreener::new(source);

        let volume = vec![
            volume_record("GOOD", 72.0),
            volume_record("WEAK", 40.0),       // below the gate
            volume_record("ORPHAN", 80.0),     // no institutional row
        ];
        let institutional = vec![inst_record("GOOD", 65.0), inst_record("WEAK", 65.0)];
        let benchmark: Vec<f64> = (0..120).map(|i| 400.0 + i as f64 * 0.1).collect();

        let picks = screener.run(&volume, &institutional, &benchmark).await.unwrap();
        assert_eq!(picks.len(), 1);
        let pick = &picks[0];
        assert_eq!(pick.ticker, "GOOD");
        assert_eq!(pick.rank, 1);
        assert_eq!(pick.company_name, "Test Corp");
        assert_eq!(pick.size_bucket, "Large Cap");
        assert!(pick.composite_score > 60.0);
        assert_eq!(pick.target_upside_pct, 25.0);
    }
}
