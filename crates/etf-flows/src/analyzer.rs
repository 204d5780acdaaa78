use crate::universe::TrackedEtf;
use chrono::Utc;
use screener_core::{
    clamp_score, five_band_label, Bar, EtfFlowCommentary, EtfFlowRecord, ScreenerError,
    TextGenerator,
};
use volume_analysis::indicators::{change_pct, obv, volume_ratio};

const MIN_BARS: usize = 30;

const DIRECTIONS: [&str; 5] = [
    "Strong Inflow",
    "Inflow",
    "Neutral",
    "Outflow",
    "Strong Outflow",
];

/// Fund-flow proxy built from OBV trend, volume ratio, and price momentum.
pub struct EtfFlowAnalyzer;

impl EtfFlowAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, etf: &TrackedEtf, bars: &[Bar]) -> Result<EtfFlowRecord, ScreenerError> {
        if bars.len() < MIN_BARS {
            return Err(ScreenerError::InsufficientData(format!(
                "{}: {} bars, need {}",
                etf.ticker,
                bars.len(),
                MIN_BARS
            )));
        }

        let obv_series = obv(bars);
        let obv_change = change_pct(&obv_series, 20);

        let ratio = {
            let r = volume_ratio(bars, 5, 20);
            if r > 0.0 { r } else { 1.0 }
        };

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let price_return = change_pct(&closes, 20);

        let score = score_flow(obv_change, ratio, price_return);
        let direction = five_band_label(score, DIRECTIONS);
        let last = &bars[bars.len() - 1];

        tracing::debug!(ticker = etf.ticker, score, direction, "etf flow scored");

        Ok(EtfFlowRecord {
            ticker: etf.ticker.to_string(),
            name: etf.name.to_string(),
            category: etf.category.to_string(),
            date: last.timestamp.date_naive(),
            close: last.close,
            obv_change_20d: obv_change,
            volume_ratio_5_20: ratio,
            price_return_20d: price_return,
            flow_score: score,
            flow_direction: direction.to_string(),
        })
    }
}

impl Default for EtfFlowAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Flow score, base 50. Momentum only counts when OBV confirms it.
pub fn score_flow(obv_change: f64, vol_ratio: f64, price_return: f64) -> f64 {
    let mut score = 50.0;

    if obv_change > 10.0 {
        score += 20.0;
    } else if obv_change > 5.0 {
        score += 10.0;
    } else if obv_change < -10.0 {
        score -= 20.0;
    } else if obv_change < -5.0 {
        score -= 10.0;
    }

    if vol_ratio > 1.5 {
        score += 10.0;
    } else if vol_ratio > 1.2 {
        score += 5.0;
    } else if vol_ratio < 0.7 {
        score -= 5.0;
    }

    if price_return > 5.0 && obv_change > 0.0 {
        score += 10.0;
    } else if price_return < -5.0 && obv_change < 0.0 {
        score -= 10.0;
    }

    clamp_score(score)
}

/// Summarize the flow table and ask the generator for a market commentary.
pub async fn generate_commentary(
    generator: &dyn TextGenerator,
    records: &[EtfFlowRecord],
) -> Result<EtfFlowCommentary, ScreenerError> {
    let mut sorted: Vec<&EtfFlowRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.flow_score
            .partial_cmp(&a.flow_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    let describe = |r: &EtfFlowRecord| {
        format!(
            "- {} ({}): Score {:.1}, {}",
            r.ticker, r.name, r.flow_score, r.flow_direction
        )
    };
    let top_inflows: Vec<String> = sorted.iter().take(5).map(|r| describe(r)).collect();
    let top_outflows: Vec<String> = sorted.iter().rev().take(5).map(|r| describe(r)).collect();

    let prompt = format!(
        "다음은 주요 ETF의 자금 흐름 분석 결과입니다.\n\n\
         상위 유입 ETF (Top 5):\n{}\n\n\
         상위 유출 ETF (Top 5):\n{}\n\n\
         이 데이터를 바탕으로:\n\
         1. 시장 전체적인 자금 흐름 방향 분석\n\
         2. 섹터별 로테이션 패턴 파악\n\
         3. 투자자 심리 및 시장 전망\n\
         4. 구체적인 투자 전략 제안\n\n\
         위 4가지 관점에서 한국어로 분석 리포트를 작성해주세요. (3-4문장으로 간결하게)",
        top_inflows.join("\n"),
        top_outflows.join("\n"),
    );

    let analysis = generator.generate(&prompt).await?;

    Ok(EtfFlowCommentary {
        generated_at: Utc::now(),
        top_inflows,
        top_outflows,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn etf() -> TrackedEtf {
        TrackedEtf { ticker: "SPY", name: "SPDR S&P 500", category: "Broad Market" }
    }

    fn bars_with(closes: impl Fn(usize) -> f64, volumes: impl Fn(usize) -> f64, n: usize) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let close = closes(i);
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: volumes(i),
                    vwap: None,
                }
            })
            .collect()
    }

    #[test]
    fn strong_inflow_on_confirmed_rally() {
        let analyzer = EtfFlowAnalyzer::new();
        let bars = bars_with(|i| 400.0 + i as f64 * 2.0, |_| 50_000_000.0, 60);
        let record = analyzer.analyze(&etf(), &bars).unwrap();
        // Rising closes drive OBV up and price return above 5% with
        // confirmation, so the score clears the top band.
        assert!(record.flow_score >= 70.0);
        assert_eq!(record.flow_direction, "Strong Inflow");
    }

    #[test]
    fn strong_outflow_on_confirmed_selloff() {
        let analyzer = EtfFlowAnalyzer::new();
        let bars = bars_with(|i| 400.0 - i as f64 * 2.0, |_| 50_000_000.0, 60);
        let record = analyzer.analyze(&etf(), &bars).unwrap();
        assert!(record.flow_score < 30.0);
        assert_eq!(record.flow_direction, "Strong Outflow");
    }

    #[test]
    fn short_history_is_rejected() {
        let analyzer = EtfFlowAnalyzer::new();
        let bars = bars_with(|_| 400.0, |_| 1_000_000.0, 20);
        assert!(analyzer.analyze(&etf(), &bars).is_err());
    }

    #[test]
    fn momentum_needs_obv_confirmation() {
        // Price up 6% but OBV flat: no momentum bonus.
        assert_eq!(score_flow(0.0, 1.0, 6.0), 50.0);
        // Price up with OBV confirmation takes the bonus.
        assert_eq!(score_flow(1.0, 1.0, 6.0), 60.0);
    }

    struct FixedGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ScreenerError> {
            Ok("rotation into defensives".to_string())
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn commentary_ranks_flows_both_ways() {
        let mut records = Vec::new();
        for (i, ticker) in ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"].iter().enumerate() {
            records.push(EtfFlowRecord {
                ticker: ticker.to_string(),
                name: format!("{ticker} Fund"),
                category: "Sector".to_string(),
                date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                close: 100.0,
                obv_change_20d: 0.0,
                volume_ratio_5_20: 1.0,
                price_return_20d: 0.0,
                flow_score: 30.0 + i as f64 * 10.0,
                flow_direction: "Neutral".to_string(),
            });
        }
        let commentary = generate_commentary(&FixedGenerator, &records).await.unwrap();
        assert_eq!(commentary.top_inflows.len(), 5);
        assert!(commentary.top_inflows[0].contains("FFF"));
        assert!(commentary.top_outflows[0].contains("AAA"));
        assert_eq!(commentary.analysis, "rotation into defensives");
    }
}
