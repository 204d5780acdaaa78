use screener_core::clamp_score;

const MIN_BARS: usize = 50;
const RSI_PERIOD: usize = 14;
const EPSILON: f64 = 0.0001;

#[derive(Debug, Clone)]
pub struct TechnicalSnapshot {
    pub rsi: f64,
    pub macd_histogram: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub ma_signal: String,
    pub cross_signal: String,
    pub technical_score: f64,
}

impl TechnicalSnapshot {
    /// Neutral snapshot for tickers with too little history.
    pub fn neutral() -> Self {
        Self {
            rsi: 50.0,
            macd_histogram: 0.0,
            ma20: 0.0,
            ma50: 0.0,
            ma200: 0.0,
            ma_signal: "Unknown".to_string(),
            cross_signal: "None".to_string(),
            technical_score: 50.0,
        }
    }
}

/// EMA with recursive smoothing seeded at the first value, full length.
fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if data.is_empty() {
        return vec![];
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);
    for i in 1..data.len() {
        let prev = result[i - 1];
        result.push(alpha * data[i] + (1.0 - alpha) * prev);
    }
    result
}

fn rolling_mean_last(data: &[f64], window: usize) -> Option<f64> {
    if data.len() < window || window == 0 {
        return None;
    }
    Some(data[data.len() - window..].iter().sum::<f64>() / window as f64)
}

fn rolling_mean_at(data: &[f64], window: usize, back: usize) -> Option<f64> {
    if data.len() < window + back {
        return None;
    }
    let end = data.len() - back;
    Some(data[end - window..end].iter().sum::<f64>() / window as f64)
}

/// RSI with plain rolling means of gains and losses; zero average loss
/// gets an epsilon denominator.
pub fn rsi_rolling(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() < period + 1 {
        return None;
    }
    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in closes.len() - period..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains += delta;
        } else {
            losses += -delta;
        }
    }
    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    let denom = if avg_loss == 0.0 { EPSILON } else { avg_loss };
    let rs = avg_gain / denom;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// MACD(12, 26, 9) histogram: last two values.
fn macd_histogram(closes: &[f64]) -> (f64, f64) {
    let ema12 = ema(closes, 12);
    let ema26 = ema(closes, 26);
    let macd: Vec<f64> = ema12.iter().zip(&ema26).map(|(f, s)| f - s).collect();
    let signal = ema(&macd, 9);
    let hist: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
    let current = hist.last().copied().unwrap_or(0.0);
    let prev = if hist.len() >= 2 { hist[hist.len() - 2] } else { 0.0 };
    (current, prev)
}

/// Full technical read over daily closes. Under 50 bars everything stays
/// neutral so thin tickers neither gain nor lose.
pub fn analyze_technical(closes: &[f64]) -> TechnicalSnapshot {
    if closes.len() < MIN_BARS {
        return TechnicalSnapshot::neutral();
    }

    let current_price = closes[closes.len() - 1];
    let rsi = rsi_rolling(closes, RSI_PERIOD).unwrap_or(50.0);
    let (hist, hist_prev) = macd_histogram(closes);

    let ma20 = rolling_mean_last(closes, 20).unwrap_or(current_price);
    let ma50 = rolling_mean_last(closes, 50).unwrap_or(ma20);
    let ma200 = rolling_mean_last(closes, 200).unwrap_or(ma50);

    let ma_signal = if current_price > ma20 && ma20 > ma50 {
        "Bullish"
    } else if current_price < ma20 && ma20 < ma50 {
        "Bearish"
    } else {
        "Neutral"
    };

    // Cross detection compares the 50/200 relationship now against five
    // sessions ago; without 200 bars both sides collapse and no cross fires.
    let (ma50_prev, ma200_prev) = if closes.len() >= 200 {
        (
            rolling_mean_at(closes, 50, 5).unwrap_or(ma50),
            rolling_mean_at(closes, 200, 5).unwrap_or(ma200),
        )
    } else {
        (ma50, ma200)
    };

    let cross_signal = if ma50 > ma200 && ma50_prev <= ma200_prev {
        "Golden Cross"
    } else if ma50 < ma200 && ma50_prev >= ma200_prev {
        "Death Cross"
    } else {
        "None"
    };

    let technical_score = score_technical(rsi, hist, hist_prev, ma_signal, cross_signal);

    TechnicalSnapshot {
        rsi,
        macd_histogram: hist,
        ma20,
        ma50,
        ma200,
        ma_signal: ma_signal.to_string(),
        cross_signal: cross_signal.to_string(),
        technical_score,
    }
}

/// Banded additive technical score, base 50.
pub fn score_technical(
    rsi: f64,
    macd_hist: f64,
    macd_hist_prev: f64,
    ma_signal: &str,
    cross_signal: &str,
) -> f64 {
    let mut score = 50.0;

    if (40.0..=60.0).contains(&rsi) {
        score += 10.0;
    } else if rsi < 30.0 {
        score += 15.0;
    } else if rsi > 70.0 {
        score -= 5.0;
    }

    if macd_hist > 0.0 && macd_hist_prev < 0.0 {
        score += 15.0;
    } else if macd_hist > 0.0 {
        score += 8.0;
    } else if macd_hist < 0.0 {
        score -= 5.0;
    }

    match ma_signal {
        "Bullish" => score += 15.0,
        "Bearish" => score -= 10.0,
        _ => {}
    }

    match cross_signal {
        "Golden Cross" => score += 10.0,
        "Death Cross" => score -= 15.0,
        _ => {}
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_history_is_neutral() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let snap = analyze_technical(&closes);
        assert_eq!(snap.technical_score, 50.0);
        assert_eq!(snap.rsi, 50.0);
        assert_eq!(snap.ma_signal, "Unknown");
    }

    #[test]
    fn rsi_saturates_on_straight_rise() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let rsi = rsi_rolling(&closes, 14).unwrap();
        assert!(rsi > 99.0);
    }

    #[test]
    fn rsi_mixed_series_is_midrange() {
        // Alternating +2/-1 moves: avg gain 1.0, avg loss ~0.5.
        let mut closes = vec![100.0];
        for i in 0..30 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let rsi = rsi_rolling(&closes, 14).unwrap();
        assert!(rsi > 50.0 && rsi < 90.0, "got {rsi}");
    }

    #[test]
    fn uptrend_scores_bullish_alignment() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + i as f64 * 0.5).collect();
        let snap = analyze_technical(&closes);
        assert_eq!(snap.ma_signal, "Bullish");
        assert!(snap.macd_histogram >= 0.0);
        assert!(snap.technical_score > 50.0);
    }

    #[test]
    fn downtrend_scores_bearish_alignment() {
        let closes: Vec<f64> = (0..120).map(|i| 200.0 - i as f64 * 0.5).collect();
        let snap = analyze_technical(&closes);
        assert_eq!(snap.ma_signal, "Bearish");
        assert!(snap.technical_score < 50.0);
    }

    #[test]
    fn crossover_bonus_beats_plain_positive() {
        let fresh = score_technical(50.0, 0.5, -0.2, "Neutral", "None");
        let steady = score_technical(50.0, 0.5, 0.2, "Neutral", "None");
        assert_eq!(fresh - steady, 7.0);
    }

    #[test]
    fn oversold_earns_more_than_neutral_zone() {
        let oversold = score_technical(25.0, 0.0, 0.0, "Neutral", "None");
        let mid = score_technical(50.0, 0.0, 0.0, "Neutral", "None");
        let overbought = score_technical(75.0, 0.0, 0.0, "Neutral", "None");
        assert_eq!(oversold, 65.0);
        assert_eq!(mid, 60.0);
        assert_eq!(overbought, 45.0);
    }
}
