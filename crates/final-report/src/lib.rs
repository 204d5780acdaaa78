//! Final report stage: blends the quantitative composite score with a
//! lightweight sentiment read of the AI summaries into one ranked list.

pub mod report;
pub mod score;

pub use report::build_report;
pub use score::ai_score_from_summary;
