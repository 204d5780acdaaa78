use screener_core::{clamp_score, TickerInfo};

#[derive(Debug, Clone)]
pub struct FundamentalSnapshot {
    pub pe_ratio: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub roe: Option<f64>,
    pub market_cap: Option<f64>,
    pub size_bucket: String,
    pub fundamental_score: f64,
}

pub fn analyze_fundamental(info: &TickerInfo) -> FundamentalSnapshot {
    FundamentalSnapshot {
        pe_ratio: info.trailing_pe,
        revenue_growth: info.revenue_growth,
        roe: info.return_on_equity,
        market_cap: info.market_cap,
        size_bucket: size_bucket(info.market_cap).to_string(),
        fundamental_score: score_fundamental(
            info.trailing_pe,
            info.revenue_growth,
            info.return_on_equity,
        ),
    }
}

/// Valuation/growth/profitability score, base 50. Missing fields leave the
/// base untouched.
pub fn score_fundamental(
    pe_ratio: Option<f64>,
    revenue_growth: Option<f64>,
    roe: Option<f64>,
) -> f64 {
    let mut score = 50.0;

    if let Some(pe) = pe_ratio {
        if pe > 0.0 && pe < 15.0 {
            score += 15.0;
        } else if (15.0..25.0).contains(&pe) {
            score += 10.0;
        } else if pe > 40.0 {
            score -= 10.0;
        } else if pe < 0.0 {
            score -= 15.0;
        }
    }

    if let Some(growth) = revenue_growth {
        if growth > 0.2 {
            score += 15.0;
        } else if growth > 0.1 {
            score += 10.0;
        } else if growth > 0.0 {
            score += 5.0;
        } else if growth < 0.0 {
            score -= 10.0;
        }
    }

    if let Some(roe) = roe {
        if roe > 0.2 {
            score += 10.0;
        } else if roe > 0.1 {
            score += 5.0;
        } else if roe < 0.0 {
            score -= 10.0;
        }
    }

    clamp_score(score)
}

/// Market-cap size bucket. Informational only, never scored.
pub fn size_bucket(market_cap: Option<f64>) -> &'static str {
    match market_cap {
        Some(cap) if cap > 200e9 => "Mega Cap",
        Some(cap) if cap > 10e9 => "Large Cap",
        Some(cap) if cap > 2e9 => "Mid Cap",
        Some(cap) if cap > 300e6 => "Small Cap",
        Some(_) => "Micro Cap",
        None => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheap_growing_profitable_scores_max_bands() {
        // +15 (PE) +15 (growth) +10 (ROE)
        assert_eq!(score_fundamental(Some(12.0), Some(0.25), Some(0.25)), 90.0);
    }

    #[test]
    fn negative_earnings_and_shrinking_revenue_punished() {
        // -15 (negative PE) -10 (negative growth) -10 (negative ROE)
        assert_eq!(score_fundamental(Some(-5.0), Some(-0.1), Some(-0.05)), 15.0);
    }

    #[test]
    fn missing_fields_stay_neutral() {
        assert_eq!(score_fundamental(None, None, None), 50.0);
    }

    #[test]
    fn pe_band_edges() {
        assert_eq!(score_fundamental(Some(15.0), None, None), 60.0);
        assert_eq!(score_fundamental(Some(14.99), None, None), 65.0);
        assert_eq!(score_fundamental(Some(25.0), None, None), 50.0);
        assert_eq!(score_fundamental(Some(41.0), None, None), 40.0);
    }

    #[test]
    fn size_buckets() {
        assert_eq!(size_bucket(Some(250e9)), "Mega Cap");
        assert_eq!(size_bucket(Some(50e9)), "Large Cap");
        assert_eq!(size_bucket(Some(5e9)), "Mid Cap");
        assert_eq!(size_bucket(Some(500e6)), "Small Cap");
        assert_eq!(size_bucket(Some(100e6)), "Micro Cap");
        assert_eq!(size_bucket(None), "Unknown");
    }
}
