use crate::score::ai_score_from_summary;
use chrono::Utc;
use screener_core::{
    round1, CompositePick, FinalReport, FinalReportEntry, ReportSummary, SummaryStore,
};

/// Quant weight of the blend. The AI side contributes at most 20 points.
const QUANT_WEIGHT: f64 = 0.8;

/// AI bonus rescaled to the 20% slot. Positive bonuses span 0..25 and
/// negative ones 0..-20, so each side is normalized by its own range.
fn ai_weighted(ai_score: i32) -> f64 {
    let ai = ai_score as f64;
    if ai > 0.0 {
        ai / 25.0 * 20.0
    } else {
        ai / 20.0 * 20.0
    }
}

fn blend(quant_score: f64, ai_score: i32) -> f64 {
    (quant_score * QUANT_WEIGHT + ai_weighted(ai_score)).clamp(0.0, 100.0)
}

/// Blend every pick with its summary sentiment, keep the top `top_n`, and
/// re-rank by final score.
pub fn build_report(
    picks: &[CompositePick],
    summaries: &SummaryStore,
    top_n: usize,
) -> FinalReport {
    let mut entries: Vec<FinalReportEntry> = picks
        .iter()
        .map(|pick| {
            let summary = summaries
                .summaries
                .get(&pick.ticker)
                .map(|s| s.summary.as_str())
                .unwrap_or("");
            let (ai_score, ai_recommendation) = ai_score_from_summary(summary);

            FinalReportEntry {
                rank: 0,
                ticker: pick.ticker.clone(),
                company_name: pick.company_name.clone(),
                close: pick.close,
                quant_score: round1(pick.composite_score),
                ai_score: ai_score as f64,
                ai_recommendation: ai_recommendation.to_string(),
                final_score: round1(blend(pick.composite_score, ai_score)),
                grade: pick.grade.clone(),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    entries.truncate(top_n);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as u32 + 1;
    }

    let count = entries.len();
    let avg = |f: fn(&FinalReportEntry) -> f64| {
        if count == 0 {
            0.0
        } else {
            round1(entries.iter().map(f).sum::<f64>() / count as f64)
        }
    };

    let summary = ReportSummary {
        count,
        avg_final_score: avg(|e| e.final_score),
        avg_quant_score: avg(|e| e.quant_score),
        avg_ai_score: avg(|e| e.ai_score),
    };

    tracing::info!(
        candidates = picks.len(),
        picks = count,
        avg_final = summary.avg_final_score,
        "final report assembled"
    );

    FinalReport {
        generated_at: Utc::now(),
        total_candidates: picks.len(),
        summary,
        picks: entries,
    }
}
