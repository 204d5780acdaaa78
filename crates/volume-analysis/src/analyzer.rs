use crate::indicators::{ad_line, change_pct, mfi, obv, sma, volume_ratio, vwap};
use screener_core::{clamp_score, five_band_label, Bar, ScreenerError, VolumeAnalysisRecord};

const MIN_BARS: usize = 30;
const MFI_PERIOD: usize = 14;
const SURGE_MULTIPLE: f64 = 2.0;

const STAGES: [&str; 5] = [
    "Strong Accumulation",
    "Accumulation",
    "Neutral",
    "Distribution",
    "Strong Distribution",
];

/// Supply/demand scorer over daily bars.
pub struct VolumeAnalyzer;

impl VolumeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score one ticker. Tickers with fewer than 30 bars are rejected and
    /// produce no row.
    pub fn analyze(&self, ticker: &str, bars: &[Bar]) -> Result<VolumeAnalysisRecord, ScreenerError> {
        if bars.len() < MIN_BARS {
            return Err(ScreenerError::InsufficientData(format!(
                "{}: {} bars, need {}",
                ticker,
                bars.len(),
                MIN_BARS
            )));
        }

        let obv_series = obv(bars);
        let ad_series = ad_line(bars);
        let mfi_series = mfi(bars, MFI_PERIOD);
        let vwap_series = vwap(bars);

        let obv_change = change_pct(&obv_series, 20);
        let ad_change = change_pct(&ad_series, 20);
        let mfi_last = mfi_series.last().copied().unwrap_or(50.0);
        let vwap_last = vwap_series.last().copied().unwrap_or(0.0);
        let ratio = volume_ratio(bars, 5, 20);

        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let vol_sma = sma(&volumes, 20);
        let last = &bars[bars.len() - 1];
        let surge = match vol_sma.last() {
            Some(&avg) => last.volume > SURGE_MULTIPLE * avg,
            None => false,
        };

        let score = score_supply_demand(obv_change, ad_change, ratio, mfi_last);
        let stage = five_band_label(score, STAGES);

        tracing::debug!(
            ticker,
            score,
            stage,
            obv_change,
            ad_change,
            "supply/demand scored"
        );

        Ok(VolumeAnalysisRecord {
            ticker: ticker.to_string(),
            date: last.timestamp.date_naive(),
            close: last.close,
            volume: last.volume,
            obv: *obv_series.last().unwrap_or(&0.0),
            obv_change_20d: obv_change,
            ad_line: *ad_series.last().unwrap_or(&0.0),
            ad_change_20d: ad_change,
            mfi: mfi_last,
            vwap: vwap_last,
            volume_surge: surge,
            volume_ratio_5_20: ratio,
            supply_demand_score: score,
            stage: stage.to_string(),
        })
    }
}

impl Default for VolumeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Banded additive score over the four volume signals, base 50.
pub fn score_supply_demand(obv_change: f64, ad_change: f64, vol_ratio: f64, mfi: f64) -> f64 {
    let mut score = 50.0;

    score += trend_adjustment(obv_change);
    score += trend_adjustment(ad_change);

    if vol_ratio > 1.5 {
        score += 10.0;
    } else if vol_ratio > 1.2 {
        score += 5.0;
    } else if vol_ratio < 0.7 {
        score -= 5.0;
    }

    if mfi > 70.0 {
        score += 5.0;
    } else if mfi < 30.0 {
        score -= 5.0;
    }

    clamp_score(score)
}

fn trend_adjustment(change: f64) -> f64 {
    if change > 10.0 {
        15.0
    } else if change > 5.0 {
        10.0
    } else if change < -10.0 {
        -15.0
    } else if change < -5.0 {
        -10.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn rising_bars(n: usize) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000_000.0 + (i as f64) * 50_000.0,
                    vwap: None,
                }
            })
            .collect()
    }

    #[test]
    fn rejects_short_history() {
        let analyzer = VolumeAnalyzer::new();
        let bars = rising_bars(29);
        assert!(matches!(
            analyzer.analyze("TEST", &bars),
            Err(ScreenerError::InsufficientData(_))
        ));
    }

    #[test]
    fn steady_accumulation_scores_high() {
        let analyzer = VolumeAnalyzer::new();
        let bars = rising_bars(60);
        let record = analyzer.analyze("TEST", &bars).unwrap();
        assert!(record.supply_demand_score >= 70.0);
        assert_eq!(record.stage, "Strong Accumulation");
        assert!(record.obv_change_20d > 10.0);
    }

    #[test]
    fn neutral_series_scores_base() {
        // Flat closes: OBV never moves, AD stays near zero, MFI flat.
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars: Vec<Bar> = (0..60)
            .map(|i| Bar {
                timestamp: start + Duration::days(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 1_000_000.0,
                vwap: None,
            })
            .collect();
        let analyzer = VolumeAnalyzer::new();
        let record = analyzer.analyze("TEST", &bars).unwrap();
        assert_eq!(record.obv_change_20d, 0.0);
        assert_eq!(record.stage, "Neutral");
        assert!(!record.volume_surge);
    }

    #[test]
    fn surge_flag_fires_on_volume_spike() {
        let mut bars = rising_bars(60);
        let last = bars.last().unwrap().clone();
        if let Some(b) = bars.last_mut() {
            b.volume = last.volume * 5.0;
        }
        let analyzer = VolumeAnalyzer::new();
        let record = analyzer.analyze("TEST", &bars).unwrap();
        assert!(record.volume_surge);
    }

    #[test]
    fn score_bands_are_additive() {
        // +15 (OBV) +15 (AD) +10 (ratio) +5 (MFI) on top of 50, clamped.
        assert_eq!(score_supply_demand(12.0, 12.0, 1.6, 75.0), 95.0);
        // -15 -15 -5 -5 = 10
        assert_eq!(score_supply_demand(-12.0, -12.0, 0.5, 25.0), 10.0);
        // mid-band values leave the base untouched
        assert_eq!(score_supply_demand(2.0, -2.0, 1.0, 50.0), 50.0);
    }
}
