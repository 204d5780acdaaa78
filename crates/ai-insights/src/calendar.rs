use chrono::{Duration, NaiveDate, Utc};
use screener_core::{CalendarDoc, EconomicEvent, TextGenerator};
use std::collections::HashSet;

/// Recurring US events seeded into every calendar window. Dates are
/// estimates spread over the window, not the official schedule.
pub const MAJOR_EVENTS: &[(&str, &str, &str)] = &[
    (
        "FOMC Interest Rate Decision",
        "High",
        "Federal Reserve interest rate decision and policy statement",
    ),
    (
        "Non-Farm Payrolls (NFP)",
        "High",
        "US employment report - key labor market indicator",
    ),
    (
        "CPI (Consumer Price Index)",
        "High",
        "Inflation data - key indicator for Fed policy",
    ),
    ("GDP Release", "High", "Gross Domestic Product growth data"),
    (
        "PCE Price Index",
        "Medium",
        "Personal Consumption Expenditures - Fed's preferred inflation measure",
    ),
];

const ESTIMATED_DATE_NOTE: &str = "Estimated date - verify actual schedule";

const HIGH_IMPACT_KEYWORDS: &[&str] = &[
    "fomc",
    "fed",
    "interest rate",
    "nfp",
    "non-farm payroll",
    "cpi",
    "gdp",
    "unemployment",
    "inflation",
];

const MEDIUM_IMPACT_KEYWORDS: &[&str] = &[
    "retail sales",
    "pmi",
    "consumer confidence",
    "housing",
    "pce",
    "durable goods",
    "trade balance",
];

/// Impact level from the event name.
pub fn determine_impact(event_name: &str) -> &'static str {
    let lower = event_name.to_lowercase();
    if HIGH_IMPACT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        "High"
    } else if MEDIUM_IMPACT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        "Medium"
    } else {
        "Low"
    }
}

/// Upcoming events for the window, spread evenly starting tomorrow, with
/// duplicate (event, date) pairs removed.
pub fn upcoming_events(today: NaiveDate, days_ahead: i64) -> Vec<EconomicEvent> {
    let mut events = Vec::new();
    let n = MAJOR_EVENTS.len() as i64;
    if n == 0 || days_ahead <= 0 {
        return events;
    }

    let spacing = (days_ahead / n).max(1);
    for (idx, (event, impact, description)) in MAJOR_EVENTS.iter().enumerate() {
        let event_day = (idx as i64 * spacing + 1).min(days_ahead);
        events.push(EconomicEvent {
            date: today + Duration::days(event_day),
            event: event.to_string(),
            impact: impact.to_string(),
            description: description.to_string(),
            source: "Manual".to_string(),
            note: Some(ESTIMATED_DATE_NOTE.to_string()),
            ai_analysis: None,
        });
    }

    let mut seen = HashSet::new();
    events.retain(|e| seen.insert((e.event.clone(), e.date)));
    events
}

fn impact_prompt(event: &EconomicEvent) -> String {
    format!(
        "Explain the potential market impact of this economic event in 2-3 sentences:\nEvent: {}\nDescription: {}\n\nFocus on:\n1. How this event typically affects stock markets\n2. Key indicators to watch\n3. Potential market reaction\n\nBe concise and practical.",
        event.event, event.description
    )
}

/// Attach AI analysis to high-impact events. A missing credential leaves
/// the events untouched.
pub async fn enrich_with_ai(generator: &dyn TextGenerator, events: &mut [EconomicEvent]) {
    if !generator.is_configured() {
        tracing::warn!("no generation credential configured, skipping calendar enrichment");
        return;
    }

    for event in events.iter_mut().filter(|e| e.impact == "High") {
        match generator.generate(&impact_prompt(event)).await {
            Ok(text) => event.ai_analysis = Some(text),
            Err(e) => {
                tracing::debug!(event = %event.event, error = %e, "calendar enrichment failed");
                event.ai_analysis = Some(format!("Analysis failed: {}", e));
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }
}

/// Wrap events into the persisted document.
pub fn build_calendar(today: NaiveDate, days_ahead: i64, events: Vec<EconomicEvent>) -> CalendarDoc {
    let high_impact_count = events.iter().filter(|e| e.impact == "High").count();
    tracing::info!(
        total = events.len(),
        high_impact = high_impact_count,
        "economic calendar assembled"
    );
    CalendarDoc {
        generated_at: Utc::now(),
        week_start: today,
        days_ahead,
        total_events: events.len(),
        high_impact_count,
        events,
    }
}
