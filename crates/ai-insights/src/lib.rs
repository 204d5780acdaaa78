//! AI-assisted layers of the pipeline: per-ticker investment summaries,
//! macro market commentary, and the economic calendar.

pub mod calendar;
pub mod generator;
pub mod macro_analysis;
pub mod summaries;

pub use generator::GeminiClient;
