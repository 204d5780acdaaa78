use screener_core::clamp_score;

#[derive(Debug, Clone)]
pub struct RelativeStrength {
    pub rs_20d: f64,
    pub rs_60d: f64,
    pub rs_score: f64,
}

impl RelativeStrength {
    pub fn neutral() -> Self {
        Self { rs_20d: 0.0, rs_60d: 0.0, rs_score: 50.0 }
    }
}

const SHORT_WINDOW: usize = 20;
const LONG_WINDOW: usize = 60;

fn trailing_return(closes: &[f64], lookback: usize) -> f64 {
    let base = closes[closes.len() - 1 - lookback];
    if base == 0.0 {
        0.0
    } else {
        (closes[closes.len() - 1] / base - 1.0) * 100.0
    }
}

/// Spread of trailing returns over one shared lookback. Both legs cover the
/// same number of bars, so differing fetch depths never manufacture spread.
/// A leg too short for the lookback zeroes the spread for that window.
fn window_spread(stock_closes: &[f64], bench_closes: &[f64], lookback: usize) -> f64 {
    if stock_closes.len() <= lookback || bench_closes.len() <= lookback {
        return 0.0;
    }
    trailing_return(stock_closes, lookback) - trailing_return(bench_closes, lookback)
}

/// Return spread vs the benchmark over trailing 20- and 60-bar windows.
/// Either side too short goes neutral.
pub fn analyze_relative_strength(stock_closes: &[f64], bench_closes: &[f64]) -> RelativeStrength {
    if stock_closes.len() < 20 || bench_closes.len() < 20 {
        return RelativeStrength::neutral();
    }

    let rs_20d = window_spread(stock_closes, bench_closes, SHORT_WINDOW);
    let rs_60d = window_spread(stock_closes, bench_closes, LONG_WINDOW);

    RelativeStrength {
        rs_20d,
        rs_60d,
        rs_score: score_relative_strength(rs_20d, rs_60d),
    }
}

/// Banded additive score over the two spreads, base 50.
pub fn score_relative_strength(rs_20d: f64, rs_60d: f64) -> f64 {
    let mut score = 50.0;

    if rs_20d > 10.0 {
        score += 25.0;
    } else if rs_20d > 5.0 {
        score += 15.0;
    } else if rs_20d > 0.0 {
        score += 8.0;
    } else if rs_20d < -10.0 {
        score -= 20.0;
    } else if rs_20d < -5.0 {
        score -= 10.0;
    }

    if rs_60d > 15.0 {
        score += 15.0;
    } else if rs_60d > 5.0 {
        score += 8.0;
    } else if rs_60d < -15.0 {
        score -= 15.0;
    }

    clamp_score(score)
}
