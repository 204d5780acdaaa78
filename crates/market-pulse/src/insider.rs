use chrono::{Duration, NaiveDate};
use institutional_analysis::{classify_transaction_extended, TransactionType};
use screener_core::{clamp_score, ClassifiedTransaction, InsiderActivityRecord, InsiderTransaction};

/// Lookback window for cluster detection.
pub const WINDOW_DAYS: i64 = 180;

/// Cluster threshold on the cluster score.
const CLUSTER_THRESHOLD: i32 = 40;

/// Most recent transactions carried in the output record.
const KEEP_TRANSACTIONS: usize = 10;

/// Fallback watchlist when no screen output exists yet.
pub const DEFAULT_WATCHLIST: &[&str] = &[
    "AAPL", "NVDA", "TSLA", "MSFT", "AMZN", "META", "GOOGL", "AMD", "NFLX", "INTC",
];

#[derive(Debug, Clone, Default)]
pub struct ClusterAnalysis {
    pub buy_count: u32,
    pub sell_count: u32,
    pub total_buy_value: f64,
    pub total_sell_value: f64,
    pub cluster_score: i32,
    pub has_cluster: bool,
}

/// Classify and window-filter raw transactions, newest first.
pub fn prepare_transactions(
    raw: &[InsiderTransaction],
    today: NaiveDate,
) -> Vec<ClassifiedTransaction> {
    let cutoff = today - Duration::days(WINDOW_DAYS);
    let mut out: Vec<ClassifiedTransaction> = raw
        .iter()
        .filter(|tx| tx.date >= cutoff)
        .map(|tx| ClassifiedTransaction {
            date: tx.date,
            insider: tx.insider.clone(),
            transaction_type: classify_transaction_extended(&tx.transaction).as_str().to_string(),
            transaction: tx.transaction.clone(),
            shares: tx.shares,
            value: tx.value,
        })
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

/// Cluster buying: several buys in the window with meaningful value and a
/// one-sided buy/sell balance.
pub fn detect_cluster(transactions: &[ClassifiedTransaction]) -> ClusterAnalysis {
    let mut analysis = ClusterAnalysis::default();

    for tx in transactions {
        match tx.transaction_type.as_str() {
            t if t == TransactionType::Buy.as_str() => {
                analysis.buy_count += 1;
                analysis.total_buy_value += tx.value.unwrap_or(0.0);
            }
            t if t == TransactionType::Sell.as_str() => {
                analysis.sell_count += 1;
                analysis.total_sell_value += tx.value.unwrap_or(0.0);
            }
            _ => {}
        }
    }

    let mut score = 0;
    if analysis.buy_count >= 3 {
        score += 30;
    } else if analysis.buy_count >= 2 {
        score += 15;
    }

    if analysis.total_buy_value > 1_000_000.0 {
        score += 30;
    } else if analysis.total_buy_value > 500_000.0 {
        score += 15;
    } else if analysis.total_buy_value > 100_000.0 {
        score += 10;
    }

    if analysis.buy_count > 0 && analysis.sell_count == 0 {
        score += 20;
    } else if analysis.buy_count > analysis.sell_count * 2 {
        score += 10;
    }

    analysis.cluster_score = score;
    analysis.has_cluster = score >= CLUSTER_THRESHOLD;
    analysis
}

/// Insider score on the shared 0..100 scale, base 50.
pub fn insider_score(analysis: &ClusterAnalysis) -> f64 {
    let mut score = 50.0;

    if analysis.has_cluster {
        score += 30.0;
    } else if analysis.cluster_score >= 30 {
        score += 15.0;
    }

    if analysis.buy_count > analysis.sell_count * 2 {
        score += 15.0;
    } else if analysis.sell_count > analysis.buy_count * 2 {
        score -= 15.0;
    }

    if analysis.total_buy_value > 1_000_000.0 {
        score += 10.0;
    }

    clamp_score(score)
}

/// Full per-ticker record, or `None` when the window holds no activity.
pub fn analyze_ticker(
    ticker: &str,
    raw: &[InsiderTransaction],
    today: NaiveDate,
) -> Option<InsiderActivityRecord> {
    let transactions = prepare_transactions(raw, today);
    if transactions.is_empty() {
        return None;
    }

    let analysis = detect_cluster(&transactions);
    let score = insider_score(&analysis);

    tracing::debug!(
        ticker,
        buys = analysis.buy_count,
        sells = analysis.sell_count,
        cluster = analysis.has_cluster,
        score,
        "insider activity scored"
    );

    let total = transactions.len();
    Some(InsiderActivityRecord {
        ticker: ticker.to_string(),
        buy_count: analysis.buy_count,
        sell_count: analysis.sell_count,
        total_buy_value: analysis.total_buy_value,
        total_sell_value: analysis.total_sell_value,
        cluster_score: analysis.cluster_score,
        has_cluster: analysis.has_cluster,
        insider_score: score,
        total_transactions: total,
        transactions: transactions.into_iter().take(KEEP_TRANSACTIONS).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn tx(days_ago: i64, transaction: &str, value: f64) -> InsiderTransaction {
        InsiderTransaction {
            date: today() - Duration::days(days_ago),
            insider: "Officer".to_string(),
            title: Some("CFO".to_string()),
            transaction: transaction.to_string(),
            shares: Some(1000.0),
            value: Some(value),
        }
    }

    #[test]
    fn old_transactions_fall_outside_window() {
        let raw = vec![tx(10, "Purchase", 200_000.0), tx(200, "Purchase", 900_000.0)];
        let prepared = prepare_transactions(&raw, today());
        assert_eq!(prepared.len(), 1);
    }

    #[test]
    fn pure_cluster_buying_detected() {
        let raw = vec![
            tx(5, "Purchase", 600_000.0),
            tx(10, "Buy", 300_000.0),
            tx(20, "Acquisition (Non Open Market)", 400_000.0),
        ];
        let prepared = prepare_transactions(&raw, today());
        let analysis = detect_cluster(&prepared);
        // 30 (3 buys) + 30 (>1M) + 20 (no sells) = 80
        assert_eq!(analysis.cluster_score, 80);
        assert!(analysis.has_cluster);
        assert_eq!(analysis.buy_count, 3);
    }

    #[test]
    fn mixed_activity_below_threshold() {
        let raw = vec![tx(5, "Purchase", 50_000.0), tx(10, "Sale", 500_000.0)];
        let prepared = prepare_transactions(&raw, today());
        let analysis = detect_cluster(&prepared);
        assert!(!analysis.has_cluster);
        assert_eq!(analysis.cluster_score, 0);
    }

    #[test]
    fn insider_score_tops_out_with_cluster_and_value() {
        let analysis = ClusterAnalysis {
            buy_count: 4,
            sell_count: 0,
            total_buy_value: 2_000_000.0,
            total_sell_value: 0.0,
            cluster_score: 80,
            has_cluster: true,
        };
        // 50 + 30 + 15 + 10 = 100 (clamped edge)
        assert_eq!(insider_score(&analysis), 100.0);
    }

    #[test]
    fn heavy_selling_drags_score_down() {
        let analysis = ClusterAnalysis {
            buy_count: 1,
            sell_count: 5,
            total_buy_value: 10_000.0,
            total_sell_value: 3_000_000.0,
            cluster_score: 10,
            has_cluster: false,
        };
        assert_eq!(insider_score(&analysis), 35.0);
    }

    #[test]
    fn quiet_ticker_yields_no_record() {
        assert!(analyze_ticker("QUIET", &[], today()).is_none());
    }

    #[test]
    fn record_keeps_ten_most_recent() {
        let raw: Vec<InsiderTransaction> =
            (0..15).map(|i| tx(i, "Purchase", 10_000.0)).collect();
        let record = analyze_ticker("BUSY", &raw, today()).unwrap();
        assert_eq!(record.total_transactions, 15);
        assert_eq!(record.transactions.len(), 10);
        assert!(record.transactions[0].date >= record.transactions[9].date);
    }
}
