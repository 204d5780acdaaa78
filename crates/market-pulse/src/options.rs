use screener_core::{OptionContract, OptionsChain, OptionsFlowRecord};

/// Default watchlist of actively optioned names.
pub const OPTIONS_WATCHLIST: &[&str] = &[
    "AAPL", "NVDA", "TSLA", "MSFT", "AMZN", "META", "GOOGL", "SPY", "QQQ", "AMD", "NFLX", "INTC",
    "PYPL", "CRM", "ORCL",
];

/// Contracts trading above this multiple of the side's mean volume count as
/// unusual.
const UNUSUAL_MULTIPLE: f64 = 3.0;

fn total_volume(contracts: &[OptionContract]) -> f64 {
    contracts.iter().map(|c| c.volume).sum()
}

fn total_open_interest(contracts: &[OptionContract]) -> f64 {
    contracts.iter().map(|c| c.open_interest).sum()
}

fn unusual_count(contracts: &[OptionContract]) -> u32 {
    if contracts.is_empty() {
        return 0;
    }
    let mean = total_volume(contracts) / contracts.len() as f64;
    if mean <= 0.0 {
        return 0;
    }
    contracts.iter().filter(|c| c.volume > mean * UNUSUAL_MULTIPLE).count() as u32
}

/// Put/call sentiment label. High ratios read bearish, low ratios bullish.
pub fn sentiment_label(pc_ratio: f64) -> &'static str {
    if pc_ratio > 1.2 {
        "Bearish"
    } else if pc_ratio > 0.8 {
        "Neutral-Bearish"
    } else if pc_ratio < 0.6 {
        "Bullish"
    } else if pc_ratio < 0.8 {
        "Neutral-Bullish"
    } else {
        "Neutral"
    }
}

/// Summarize one nearest-expiry chain into a flow record.
pub fn analyze_chain(chain: &OptionsChain) -> OptionsFlowRecord {
    let call_volume = total_volume(&chain.calls);
    let put_volume = total_volume(&chain.puts);
    let call_oi = total_open_interest(&chain.calls);
    let put_oi = total_open_interest(&chain.puts);

    let pc_ratio = if call_volume > 0.0 { put_volume / call_volume } else { 0.0 };
    let pc_oi_ratio = if call_oi > 0.0 { put_oi / call_oi } else { 0.0 };

    OptionsFlowRecord {
        ticker: chain.symbol.clone(),
        expiry: chain.expiry,
        call_volume,
        put_volume,
        put_call_ratio: pc_ratio,
        call_open_interest: call_oi,
        put_open_interest: put_oi,
        put_call_oi_ratio: pc_oi_ratio,
        unusual_calls: unusual_count(&chain.calls),
        unusual_puts: unusual_count(&chain.puts),
        sentiment: sentiment_label(pc_ratio).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn contract(volume: f64, oi: f64) -> OptionContract {
        OptionContract {
            strike: 100.0,
            last_price: Some(2.5),
            volume,
            open_interest: oi,
            implied_volatility: Some(0.35),
        }
    }

    fn chain(calls: Vec<OptionContract>, puts: Vec<OptionContract>) -> OptionsChain {
        OptionsChain {
            symbol: "TEST".to_string(),
            expiry: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            calls,
            puts,
        }
    }

    #[test]
    fn sentiment_bands() {
        assert_eq!(sentiment_label(1.5), "Bearish");
        assert_eq!(sentiment_label(1.0), "Neutral-Bearish");
        assert_eq!(sentiment_label(0.8), "Neutral");
        assert_eq!(sentiment_label(0.7), "Neutral-Bullish");
        assert_eq!(sentiment_label(0.4), "Bullish");
    }

    #[test]
    fn put_heavy_chain_reads_bearish() {
        let record = analyze_chain(&chain(
            vec![contract(100.0, 500.0)],
            vec![contract(200.0, 800.0)],
        ));
        assert!((record.put_call_ratio - 2.0).abs() < 1e-9);
        assert_eq!(record.sentiment, "Bearish");
        assert!((record.put_call_oi_ratio - 1.6).abs() < 1e-9);
    }

    #[test]
    fn zero_call_volume_avoids_division() {
        let record = analyze_chain(&chain(vec![], vec![contract(50.0, 100.0)]));
        assert_eq!(record.put_call_ratio, 0.0);
        assert_eq!(record.sentiment, "Bullish");
    }

    #[test]
    fn unusual_contracts_exceed_three_times_mean() {
        // Mean volume is (10+10+10+130)/4 = 40; only 130 > 120.
        let calls = vec![
            contract(10.0, 0.0),
            contract(10.0, 0.0),
            contract(10.0, 0.0),
            contract(130.0, 0.0),
        ];
        let record = analyze_chain(&chain(calls, vec![]));
        assert_eq!(record.unusual_calls, 1);
        assert_eq!(record.unusual_puts, 0);
    }
}
