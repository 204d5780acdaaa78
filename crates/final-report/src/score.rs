//! Keyword scoring of AI summary text. Crude by design: the summary only
//! nudges the quant score, it never drives the ranking on its own.

const STRONG_BUY_KEYWORDS: &[&str] = &["strong buy", "적극 매수", "aggressive", "high conviction"];
const BUY_KEYWORDS: &[&str] = &["buy", "매수", "purchase", "acquisition"];
const SELL_KEYWORDS: &[&str] = &["sell", "매도", "avoid", "caution", "risk"];

const POSITIVE_WORDS: &[&str] =
    &["opportunity", "growth", "upside", "potential", "기회", "성장", "상승", "잠재력"];
const NEGATIVE_WORDS: &[&str] =
    &["risk", "concern", "decline", "downside", "리스크", "우려", "하락", "약세"];

const MIN_AI_SCORE: i32 = -20;
const MAX_AI_SCORE: i32 = 25;

fn is_sentinel(summary: &str) -> bool {
    summary.is_empty()
        || summary == "API Key Missing"
        || summary == "No content generated"
        || summary == "Content blocked by safety filters"
        || summary.starts_with("Analysis Failed")
}

/// Bonus score and recommendation label from one summary. Sentinel strings
/// from the generation layer read as no signal.
pub fn ai_score_from_summary(summary: &str) -> (i32, &'static str) {
    if is_sentinel(summary) {
        return (0, "Hold");
    }

    let lower = summary.to_lowercase();

    let (mut score, rec) = if STRONG_BUY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (20, "Strong Buy")
    } else if BUY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (10, "Buy")
    } else if SELL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (-10, "Sell")
    } else {
        (0, "Hold")
    };

    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    if positive > negative {
        score += 5;
    } else if negative > positive {
        score -= 5;
    }

    (score.clamp(MIN_AI_SCORE, MAX_AI_SCORE), rec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_read_as_hold() {
        assert_eq!(ai_score_from_summary(""), (0, "Hold"));
        assert_eq!(ai_score_from_summary("API Key Missing"), (0, "Hold"));
        assert_eq!(ai_score_from_summary("Analysis Failed: timeout"), (0, "Hold"));
        assert_eq!(ai_score_from_summary("No content generated"), (0, "Hold"));
        assert_eq!(
            ai_score_from_summary("Content blocked by safety filters"),
            (0, "Hold")
        );
    }

    #[test]
    fn strong_buy_outranks_plain_buy() {
        let (score, rec) = ai_score_from_summary("Strong buy on continued momentum.");
        assert_eq!(rec, "Strong Buy");
        assert_eq!(score, 20);
    }

    #[test]
    fn conviction_with_tailwinds_hits_the_cap() {
        let (score, rec) =
            ai_score_from_summary("High conviction opportunity with strong growth ahead.");
        assert_eq!(rec, "Strong Buy");
        assert_eq!(score, 25);
    }

    #[test]
    fn korean_buy_language_scores() {
        let (score, rec) = ai_score_from_summary("현재 가격에서 매수를 권장합니다. 상승 잠재력이 큽니다.");
        assert_eq!(rec, "Buy");
        assert_eq!(score, 15);
    }

    #[test]
    fn bearish_text_drags_below_zero() {
        let (score, rec) = ai_score_from_summary("Caution: risk of further decline outweighs upside.");
        assert_eq!(rec, "Sell");
        // -10 sell signal, negatives (risk, decline) outnumber positives (upside)
        assert_eq!(score, -15);
    }

    #[test]
    fn neutral_text_holds() {
        let (score, rec) = ai_score_from_summary("The company reported quarterly earnings in line.");
        assert_eq!(rec, "Hold");
        assert_eq!(score, 0);
    }
}
