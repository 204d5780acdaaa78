use crate::classify::{classify_transaction, TransactionType};
use screener_core::{
    clamp_score, five_band_label, InsiderTransaction, InstitutionalRecord, TickerInfo,
};

const STAGES: [&str; 5] = [
    "Strong Institutional Support",
    "Institutional Support",
    "Neutral",
    "Institutional Concern",
    "Strong Institutional Selling",
];

/// Ownership / insider-trend / short-interest scorer. Always produces a
/// record; missing vendor fields score neutral.
pub struct InstitutionalAnalyzer;

impl InstitutionalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(
        &self,
        ticker: &str,
        info: &TickerInfo,
        transactions: &[InsiderTransaction],
    ) -> InstitutionalRecord {
        let (buys, sells) = count_insider_activity(transactions);
        let signal = insider_signal(transactions.is_empty(), buys, sells);

        let score = score_institutional(
            info.held_percent_institutions,
            buys,
            sells,
            info.short_percent_of_float,
        );
        let stage = five_band_label(score, STAGES);

        tracing::debug!(ticker, score, stage, buys, sells, "institutional scored");

        InstitutionalRecord {
            ticker: ticker.to_string(),
            institutional_ownership: info.held_percent_institutions,
            institutional_holders: info.institutional_holders,
            insider_buys: buys,
            insider_sells: sells,
            insider_signal: signal.to_string(),
            short_percent: info.short_percent_of_float,
            institutional_score: score,
            stage: stage.to_string(),
        }
    }
}

impl Default for InstitutionalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Count classified buys and sells across the transaction list.
pub fn count_insider_activity(transactions: &[InsiderTransaction]) -> (u32, u32) {
    let mut buys = 0;
    let mut sells = 0;
    for tx in transactions {
        match classify_transaction(&tx.transaction) {
            TransactionType::Buy => buys += 1,
            TransactionType::Sell => sells += 1,
            TransactionType::Unknown => {}
        }
    }
    (buys, sells)
}

fn insider_signal(no_data: bool, buys: u32, sells: u32) -> &'static str {
    if no_data {
        "Unknown"
    } else if buys > sells {
        "Buying"
    } else if sells > buys {
        "Selling"
    } else {
        "Neutral"
    }
}

/// Banded additive score, base 50. Short-interest bands are mutually
/// exclusive with the heavy penalty checked first.
pub fn score_institutional(
    inst_ownership: Option<f64>,
    insider_buys: u32,
    insider_sells: u32,
    short_percent: Option<f64>,
) -> f64 {
    let mut score = 50.0;

    if let Some(pct) = inst_ownership {
        if pct > 0.8 {
            score += 15.0;
        } else if pct > 0.6 {
            score += 10.0;
        } else if pct < 0.3 {
            score -= 10.0;
        }
    }

    if insider_buys > insider_sells {
        score += 15.0;
    } else if insider_sells > insider_buys {
        score -= 10.0;
    }

    if let Some(short) = short_percent {
        if short < 0.03 {
            score += 5.0;
        } else if short > 0.2 {
            score -= 20.0;
        } else if short > 0.1 {
            score -= 10.0;
        }
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(transaction: &str) -> InsiderTransaction {
        InsiderTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            insider: "Test Person".to_string(),
            title: None,
            transaction: transaction.to_string(),
            shares: Some(1000.0),
            value: Some(50_000.0),
        }
    }

    fn info(inst: Option<f64>, short: Option<f64>) -> TickerInfo {
        TickerInfo {
            symbol: "TEST".to_string(),
            held_percent_institutions: inst,
            short_percent_of_float: short,
            ..TickerInfo::default()
        }
    }

    #[test]
    fn missing_data_scores_neutral() {
        let analyzer = InstitutionalAnalyzer::new();
        let record = analyzer.analyze("TEST", &info(None, None), &[]);
        assert_eq!(record.institutional_score, 50.0);
        assert_eq!(record.stage, "Neutral");
        assert_eq!(record.insider_signal, "Unknown");
        assert_eq!(record.insider_buys, 0);
        assert_eq!(record.insider_sells, 0);
    }

    #[test]
    fn heavy_ownership_and_buying_scores_high() {
        let analyzer = InstitutionalAnalyzer::new();
        let txs = vec![tx("Purchase"), tx("Buy"), tx("Sale")];
        let record = analyzer.analyze("TEST", &info(Some(0.85), Some(0.02)), &txs);
        // 50 + 15 (ownership) + 15 (net buying) + 5 (low short) = 85
        assert_eq!(record.institutional_score, 85.0);
        assert_eq!(record.stage, "Strong Institutional Support");
        assert_eq!(record.insider_signal, "Buying");
    }

    #[test]
    fn short_squeeze_risk_dominates() {
        // >20% short takes the -20 band, not the -10 band.
        assert_eq!(score_institutional(None, 0, 0, Some(0.25)), 30.0);
        assert_eq!(score_institutional(None, 0, 0, Some(0.15)), 40.0);
    }

    #[test]
    fn selling_pressure_lowers_stage() {
        let analyzer = InstitutionalAnalyzer::new();
        let txs = vec![tx("Sale"), tx("Sell"), tx("Sale")];
        let record = analyzer.analyze("TEST", &info(Some(0.2), Some(0.22)), &txs);
        // 50 - 10 (low ownership) - 10 (net selling) - 20 (short) = 10
        assert_eq!(record.institutional_score, 10.0);
        assert_eq!(record.stage, "Strong Institutional Selling");
        assert_eq!(record.insider_signal, "Selling");
    }

    #[test]
    fn balanced_activity_is_neutral_signal() {
        let analyzer = InstitutionalAnalyzer::new();
        let txs = vec![tx("Buy"), tx("Sale")];
        let record = analyzer.analyze("TEST", &info(None, None), &txs);
        assert_eq!(record.insider_signal, "Neutral");
        assert_eq!(record.institutional_score, 50.0);
    }
}
