use chrono::Utc;
use screener_core::{Bar, MacroAnalysisDoc, MacroIndicator, NewsHeadline, TextGenerator};

/// Macro indicators tracked: display name and vendor symbol.
pub const MACRO_TICKERS: &[(&str, &str)] = &[
    ("VIX", "^VIX"),
    ("DXY", "DX-Y.NYB"),
    ("2Y_Yield", "^IRX"),
    ("10Y_Yield", "^TNX"),
    ("GOLD", "GC=F"),
    ("OIL", "CL=F"),
    ("BTC", "BTC-USD"),
    ("SPY", "SPY"),
    ("QQQ", "QQQ"),
];

/// News query feeding the macro prompts.
pub const MACRO_NEWS_QUERY: &str = "Federal Reserve Economy US Market";
pub const MACRO_NEWS_ITEMS: usize = 5;

/// Placeholder until a real sentiment feed is wired in.
pub const FEAR_GREED_PLACEHOLDER: i32 = 65;

pub const YIELD_INVERSION_WARNING: &str = "Yield curve inverted - recession signal";

/// Past regimes quoted in the prompt for context.
pub fn historical_patterns() -> Vec<String> {
    vec![
        "Fed Pivot Signal (2023): VIX declining, Yields peaking".to_string(),
        "Yield Curve Inversion: 2Y > 10Y Yield".to_string(),
    ]
}

/// One indicator snapshot from a year of daily bars: last close, one-day
/// change, and position inside the 52-week range.
pub fn build_indicator(name: &str, symbol: &str, bars: &[Bar]) -> Option<MacroIndicator> {
    if bars.len() < 2 {
        return None;
    }
    let price = bars[bars.len() - 1].close;
    let prev = bars[bars.len() - 2].close;
    let change_pct = if prev > 0.0 { (price / prev - 1.0) * 100.0 } else { 0.0 };

    let week52_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let week52_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let pct_from_high = if week52_high > 0.0 { (price / week52_high - 1.0) * 100.0 } else { 0.0 };
    let pct_from_low = if week52_low > 0.0 { (price / week52_low - 1.0) * 100.0 } else { 0.0 };

    Some(MacroIndicator {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price,
        change_pct,
        week52_high,
        week52_low,
        pct_from_high,
        pct_from_low,
    })
}

fn find_value(indicators: &[MacroIndicator], name: &str) -> Option<f64> {
    indicators.iter().find(|i| i.name == name).map(|i| i.price)
}

/// 10Y minus 2Y yield spread, when both legs were collected.
pub fn yield_spread(indicators: &[MacroIndicator]) -> Option<f64> {
    let long = find_value(indicators, "10Y_Yield")?;
    let short = find_value(indicators, "2Y_Yield")?;
    Some(long - short)
}

/// Macro strategy prompt in the requested language.
pub fn build_prompt(
    indicators: &[MacroIndicator],
    spread: Option<f64>,
    fear_greed: i32,
    headlines: &[NewsHeadline],
    patterns: &[String],
    lang: &str,
) -> String {
    let mut metric_lines: Vec<String> = indicators
        .iter()
        .map(|i| format!("- {}: {:.2} (change: {:+.2}%)", i.name, i.price, i.change_pct))
        .collect();
    if let Some(spread) = spread {
        metric_lines.push(format!("- YieldSpread: {:.2} (change: +0.00%)", spread));
    }
    metric_lines.push(format!("- FearGreed: {} (change: +0.00%)", fear_greed));
    let metrics = metric_lines.join("\n");

    let news = headlines
        .iter()
        .take(MACRO_NEWS_ITEMS)
        .map(|h| format!("- {}", h.title))
        .collect::<Vec<String>>()
        .join("\n");

    let pattern_text = patterns
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<String>>()
        .join("\n");

    if lang == "en" {
        format!(
            "Analyze current macro market conditions and provide investment strategy recommendations.\n\nCurrent Macro Indicators:\n{}\n\nRecent News Headlines:\n{}\n\nHistorical Patterns:\n{}\n\nPlease provide:\n1. Market Summary (current conditions)\n2. Key Opportunities (sectors/assets to focus on)\n3. Major Risks (what to watch out for)\n4. Specific Investment Strategy (actionable recommendations)\n\nBe concise and data-driven. Focus on actionable insights.",
            metrics, news, pattern_text
        )
    } else {
        format!(
            "현재 거시경제 시장 상황을 분석하고 투자 전략을 제안해주세요.\n\n현재 거시 지표:\n{}\n\n최근 뉴스 헤드라인:\n{}\n\n역사적 패턴:\n{}\n\n다음 항목을 포함해주세요:\n1. 시장 요약 (현재 상황)\n2. 주요 기회 (집중해야 할 섹터/자산)\n3. 주요 리스크 (주의해야 할 사항)\n4. 구체적 투자 전략 (실행 가능한 권장사항)\n\n간결하고 데이터 기반으로 작성해주세요. 실행 가능한 인사이트에 집중해주세요.",
            metrics, news, pattern_text
        )
    }
}

/// Assemble the macro document for one language, generating commentary
/// through the configured backend.
pub async fn build_macro_doc(
    generator: &dyn TextGenerator,
    indicators: Vec<MacroIndicator>,
    headlines: &[NewsHeadline],
    lang: &str,
) -> MacroAnalysisDoc {
    let spread = yield_spread(&indicators);
    let inverted = spread.map(|s| s < 0.0).unwrap_or(false);
    if inverted {
        tracing::warn!("{}", YIELD_INVERSION_WARNING);
    }

    let patterns = historical_patterns();
    let prompt = build_prompt(
        &indicators,
        spread,
        FEAR_GREED_PLACEHOLDER,
        headlines,
        &patterns,
        lang,
    );

    let analysis = match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(lang, error = %e, "macro analysis generation failed");
            format!("Error: {}", e)
        }
    };

    MacroAnalysisDoc {
        generated_at: Utc::now(),
        language: lang.to_string(),
        indicators,
        yield_spread_10y_2y: spread.unwrap_or(0.0),
        curve_inverted: inverted,
        fear_greed_index: FEAR_GREED_PLACEHOLDER,
        historical_patterns: patterns,
        analysis,
    }
}
