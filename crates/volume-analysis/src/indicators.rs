use screener_core::Bar;

/// Denominator floor for degenerate bars and all-positive flow windows.
const EPSILON: f64 = 0.0001;

/// Simple Moving Average. Result is aligned to `data[period - 1..]`.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// On-Balance Volume. Starts at zero; adds volume on up closes, subtracts
/// it on down closes. Full length, aligned to `bars`.
pub fn obv(bars: &[Bar]) -> Vec<f64> {
    if bars.is_empty() {
        return vec![];
    }

    let mut result = Vec::with_capacity(bars.len());
    result.push(0.0);
    for i in 1..bars.len() {
        let prev = result[i - 1];
        let delta = if bars[i].close > bars[i - 1].close {
            bars[i].volume
        } else if bars[i].close < bars[i - 1].close {
            -bars[i].volume
        } else {
            0.0
        };
        result.push(prev + delta);
    }
    result
}

/// Accumulation/Distribution line. The close-location value uses an epsilon
/// denominator when high == low. Full length, aligned to `bars`.
pub fn ad_line(bars: &[Bar]) -> Vec<f64> {
    let mut result = Vec::with_capacity(bars.len());
    let mut cumulative = 0.0;
    for bar in bars {
        let range = bar.high - bar.low;
        let denom = if range == 0.0 { EPSILON } else { range };
        let clv = ((bar.close - bar.low) - (bar.high - bar.close)) / denom;
        cumulative += clv * bar.volume;
        result.push(cumulative);
    }
    result
}

/// Money Flow Index over `period` bars. Result is aligned to
/// `bars[period..]`; empty when fewer than `period + 1` bars.
pub fn mfi(bars: &[Bar], period: usize) -> Vec<f64> {
    if period == 0 || bars.len() < period + 1 {
        return vec![];
    }

    let typical: Vec<f64> = bars.iter().map(|b| (b.high + b.low + b.close) / 3.0).collect();

    // Signed money flow per bar, keyed off the typical-price direction.
    let mut positive = Vec::with_capacity(bars.len() - 1);
    let mut negative = Vec::with_capacity(bars.len() - 1);
    for i in 1..bars.len() {
        let flow = typical[i] * bars[i].volume;
        if typical[i] > typical[i - 1] {
            positive.push(flow);
            negative.push(0.0);
        } else if typical[i] < typical[i - 1] {
            positive.push(0.0);
            negative.push(flow);
        } else {
            positive.push(0.0);
            negative.push(0.0);
        }
    }

    let mut result = Vec::with_capacity(positive.len() + 1 - period);
    for i in period - 1..positive.len() {
        let pos: f64 = positive[i + 1 - period..=i].iter().sum();
        let neg: f64 = negative[i + 1 - period..=i].iter().sum();
        let ratio = pos / if neg == 0.0 { EPSILON } else { neg };
        result.push(100.0 - 100.0 / (1.0 + ratio));
    }
    result
}

/// Cumulative volume-weighted average price, aligned to `bars`.
pub fn vwap(bars: &[Bar]) -> Vec<f64> {
    let mut result = Vec::with_capacity(bars.len());
    let mut pv = 0.0;
    let mut vol = 0.0;
    for bar in bars {
        let typical = (bar.high + bar.low + bar.close) / 3.0;
        pv += typical * bar.volume;
        vol += bar.volume;
        result.push(if vol > 0.0 { pv / vol } else { typical });
    }
    result
}

/// Percent change of the last value against the value `lookback` entries
/// earlier. Zero base yields zero change; too-short series yields zero.
pub fn change_pct(series: &[f64], lookback: usize) -> f64 {
    if series.len() <= lookback {
        return 0.0;
    }
    let last = series[series.len() - 1];
    let base = series[series.len() - 1 - lookback];
    if base == 0.0 {
        0.0
    } else {
        (last - base) / base.abs() * 100.0
    }
}

/// Ratio of the mean volume over the last `short` bars to the mean over the
/// last `long` bars.
pub fn volume_ratio(bars: &[Bar], short: usize, long: usize) -> f64 {
    if bars.len() < long || short == 0 || long == 0 {
        return 0.0;
    }
    let short_avg: f64 =
        bars[bars.len() - short..].iter().map(|b| b.volume).sum::<f64>() / short as f64;
    let long_avg: f64 =
        bars[bars.len() - long..].iter().map(|b| b.volume).sum::<f64>() / long as f64;
    if long_avg > 0.0 {
        short_avg / long_avg
    } else {
        0.0
    }
}
