use chrono::{DateTime, Utc};
use markdown_merge_ops::ConsolidateOutcome;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    outcome: &'a ConsolidateOutcome,
    averages: Averages,
}

#[derive(Serialize)]
struct Averages {
    sources_per_target: Option<f64>,
    chars_per_source: Option<f64>,
}

/// Pretty JSON report stamped with the current time.
pub fn render_json(outcome: &ConsolidateOutcome) -> serde_json::Result<String> {
    render_json_at(outcome, Utc::now())
}

pub fn render_json_at(
    outcome: &ConsolidateOutcome,
    generated_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    let report = JsonReport {
        generated_at,
        outcome,
        averages: Averages {
            sources_per_target: outcome.summary.average_sources_per_target(),
            chars_per_source: outcome.summary.average_chars_per_source(),
        },
    };
    serde_json::to_string_pretty(&report)
}
