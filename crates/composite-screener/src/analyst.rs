use screener_core::{clamp_score, TickerInfo};

#[derive(Debug, Clone)]
pub struct AnalystSnapshot {
    pub company_name: String,
    pub current_price: f64,
    pub target_price: Option<f64>,
    pub upside_pct: f64,
    pub recommendation: Option<String>,
    pub analyst_score: f64,
}

pub fn analyze_analyst(info: &TickerInfo) -> AnalystSnapshot {
    let current_price = info.current_price.unwrap_or(0.0);
    let upside = upside_pct(info.current_price, info.target_mean_price);

    AnalystSnapshot {
        company_name: info
            .company_name
            .clone()
            .unwrap_or_else(|| info.symbol.clone()),
        current_price,
        target_price: info.target_mean_price,
        upside_pct: upside,
        recommendation: info.recommendation_key.clone(),
        analyst_score: score_analyst(info.recommendation_key.as_deref(), upside),
    }
}

/// Upside is defined only when both prices are positive.
pub fn upside_pct(current: Option<f64>, target: Option<f64>) -> f64 {
    match (current, target) {
        (Some(c), Some(t)) if c > 0.0 && t > 0.0 => (t / c - 1.0) * 100.0,
        _ => 0.0,
    }
}

fn recommendation_bonus(key: &str) -> f64 {
    match key {
        "strongBuy" => 25.0,
        "buy" => 20.0,
        "hold" => 0.0,
        "sell" => -15.0,
        "strongSell" => -25.0,
        _ => 0.0,
    }
}

/// Consensus + target-upside score, base 50.
pub fn score_analyst(recommendation: Option<&str>, upside: f64) -> f64 {
    let mut score = 50.0;

    if let Some(key) = recommendation {
        score += recommendation_bonus(key);
    }

    if upside > 30.0 {
        score += 20.0;
    } else if upside > 20.0 {
        score += 15.0;
    } else if upside > 10.0 {
        score += 10.0;
    } else if upside > 0.0 {
        score += 5.0;
    } else if upside < -10.0 {
        score -= 15.0;
    }

    clamp_score(score)
}
