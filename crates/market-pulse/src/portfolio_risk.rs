use chrono::Utc;
use screener_core::{CorrelationPair, PortfolioRiskReport, ScreenerError, TickerVolatility};

const TRADING_DAYS: f64 = 252.0;
const HIGH_CORRELATION: f64 = 0.8;

/// One portfolio leg: ticker plus its daily close series, oldest first.
pub struct PortfolioInput {
    pub ticker: String,
    pub closes: Vec<f64>,
}

fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        data.iter().sum::<f64>() / data.len() as f64
    }
}

/// Sample covariance (n - 1 denominator).
fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let ma = mean(&a[..n]);
    let mb = mean(&b[..n]);
    let sum: f64 = a[..n].iter().zip(&b[..n]).map(|(x, y)| (x - ma) * (y - mb)).sum();
    sum / (n as f64 - 1.0)
}

fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let cov = covariance(a, b);
    let denom = (covariance(a, a) * covariance(b, b)).sqrt();
    if denom > 0.0 {
        cov / denom
    } else {
        0.0
    }
}

/// Annualized volatility ladder.
pub fn risk_level(portfolio_vol: f64) -> &'static str {
    if portfolio_vol > 0.30 {
        "Very High"
    } else if portfolio_vol > 0.25 {
        "High"
    } else if portfolio_vol > 0.20 {
        "Medium-High"
    } else if portfolio_vol > 0.15 {
        "Medium"
    } else if portfolio_vol > 0.10 {
        "Low-Medium"
    } else {
        "Low"
    }
}

/// Equal-weight portfolio risk over the supplied legs. Series are aligned
/// by truncating every leg to the shortest tail.
pub fn analyze_portfolio(
    inputs: &[PortfolioInput],
    benchmark_closes: &[f64],
) -> Result<PortfolioRiskReport, ScreenerError> {
    let usable: Vec<&PortfolioInput> = inputs.iter().filter(|i| i.closes.len() >= 3).collect();
    if usable.len() < 2 {
        return Err(ScreenerError::InsufficientData(
            "need at least 2 tickers with history for portfolio analysis".to_string(),
        ));
    }

    let min_len = usable.iter().map(|i| i.closes.len()).min().unwrap_or(0);
    let tickers: Vec<String> = usable.iter().map(|i| i.ticker.clone()).collect();
    let returns: Vec<Vec<f64>> = usable
        .iter()
        .map(|i| daily_returns(&i.closes[i.closes.len() - min_len..]))
        .collect();

    let n = tickers.len();

    // Correlation matrix and high-correlation pairs.
    let mut corr_matrix = vec![vec![0.0; n]; n];
    let mut high_correlations = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let c = if i == j { 1.0 } else { correlation(&returns[i], &returns[j]) };
            corr_matrix[i][j] = c;
            if j > i && c > HIGH_CORRELATION {
                high_correlations.push(CorrelationPair {
                    ticker_a: tickers[i].clone(),
                    ticker_b: tickers[j].clone(),
                    correlation: c,
                });
            }
        }
    }

    // Equal-weight annualized portfolio variance: w' C w with C = cov * 252.
    let weight = 1.0 / n as f64;
    let mut portfolio_var = 0.0;
    for i in 0..n {
        for j in 0..n {
            portfolio_var += weight * weight * covariance(&returns[i], &returns[j]) * TRADING_DAYS;
        }
    }
    let portfolio_vol = portfolio_var.max(0.0).sqrt();

    let individual_volatilities: Vec<TickerVolatility> = tickers
        .iter()
        .zip(&returns)
        .map(|(ticker, r)| TickerVolatility {
            ticker: ticker.clone(),
            volatility_pct: (covariance(r, r) * TRADING_DAYS).sqrt() * 100.0,
        })
        .collect();

    let avg_individual_vol = mean(
        &individual_volatilities
            .iter()
            .map(|v| v.volatility_pct / 100.0)
            .collect::<Vec<f64>>(),
    );
    let diversification_ratio = if portfolio_vol > 0.0 {
        avg_individual_vol / portfolio_vol
    } else {
        1.0
    };

    // Portfolio beta vs the benchmark over the aligned tail.
    let beta = {
        let bench_returns = daily_returns(benchmark_closes);
        let len = bench_returns.len().min(returns[0].len());
        if len < 2 {
            1.0
        } else {
            let portfolio_returns: Vec<f64> = (0..len)
                .map(|t| mean(&returns.iter().map(|r| r[r.len() - len + t]).collect::<Vec<f64>>()))
                .collect();
            let bench_tail = &bench_returns[bench_returns.len() - len..];
            let bench_var = covariance(bench_tail, bench_tail);
            if bench_var > 0.0 {
                covariance(&portfolio_returns, bench_tail) / bench_var
            } else {
                1.0
            }
        }
    };

    let mut warnings = Vec::new();
    if high_correlations.len() > n / 2 {
        warnings.push("High concentration risk: Many stocks are highly correlated".to_string());
    }
    if diversification_ratio < 1.2 {
        warnings.push(
            "Low diversification: Portfolio volatility close to individual stock volatility"
                .to_string(),
        );
    }
    if portfolio_vol > 0.30 {
        warnings.push("Very high portfolio volatility: Consider reducing risk".to_string());
    }

    tracing::info!(
        vol_pct = portfolio_vol * 100.0,
        beta,
        diversification_ratio,
        "portfolio risk computed"
    );

    Ok(PortfolioRiskReport {
        generated_at: Utc::now(),
        tickers,
        portfolio_volatility: portfolio_vol,
        portfolio_volatility_pct: portfolio_vol * 100.0,
        risk_level: risk_level(portfolio_vol).to_string(),
        beta,
        diversification_ratio,
        individual_volatilities,
        high_correlations,
        correlation_matrix: corr_matrix,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ticker: &str, closes: Vec<f64>) -> PortfolioInput {
        PortfolioInput { ticker: ticker.to_string(), closes }
    }

    fn noisy_series(seed: u64, n: usize) -> Vec<f64> {
        // Deterministic pseudo-random walk.
        let mut state = seed;
        let mut price = 100.0;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let step = ((state >> 33) % 200) as f64 / 100.0 - 1.0;
            price *= 1.0 + step * 0.01;
            out.push(price);
        }
        out
    }

    #[test]
    fn requires_two_legs() {
        let result = analyze_portfolio(&[input("ONLY", noisy_series(1, 50))], &[]);
        assert!(matches!(result, Err(ScreenerError::InsufficientData(_))));
    }

    #[test]
    fn identical_legs_correlate_fully() {
        let series = noisy_series(7, 60);
        let report = analyze_portfolio(
            &[input("A", series.clone()), input("B", series.clone())],
            &series,
        )
        .unwrap();
        assert_eq!(report.high_correlations.len(), 1);
        assert!((report.high_correlations[0].correlation - 1.0).abs() < 1e-9);
        // No diversification benefit from a cloned leg.
        assert!((report.diversification_ratio - 1.0).abs() < 1e-9);
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn independent_legs_diversify() {
        let report = analyze_portfolio(
            &[
                input("A", noisy_series(3, 120)),
                input("B", noisy_series(11, 120)),
                input("C", noisy_series(29, 120)),
            ],
            &noisy_series(5, 120),
        )
        .unwrap();
        assert!(report.high_correlations.is_empty());
        assert!(report.diversification_ratio > 1.0);
        assert_eq!(report.correlation_matrix.len(), 3);
        assert!((report.correlation_matrix[0][0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn risk_ladder() {
        assert_eq!(risk_level(0.35), "Very High");
        assert_eq!(risk_level(0.27), "High");
        assert_eq!(risk_level(0.22), "Medium-High");
        assert_eq!(risk_level(0.17), "Medium");
        assert_eq!(risk_level(0.12), "Low-Medium");
        assert_eq!(risk_level(0.05), "Low");
    }

    #[test]
    fn beta_of_benchmark_clone_is_one() {
        let bench = noisy_series(17, 100);
        let report = analyze_portfolio(
            &[input("A", bench.clone()), input("B", bench.clone())],
            &bench,
        )
        .unwrap();
        assert!((report.beta - 1.0).abs() < 1e-6);
    }
}
