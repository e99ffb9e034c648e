//! Turns whatever the model wrote into a fully populated [`AnalysisResult`].
//!
//! All field defaults live here.

use serde_json::Value;

use crate::{models::analysis::AnalysisResult, utils::truncate_chars};

pub const DEFAULT_SENTIMENT: &str = "neutral";
pub const DEFAULT_TONE: &str = "Not specified";
pub const FALLBACK_TONE: &str = "mixed";
pub const SUMMARY_DEFAULT_CHARS: usize = 200;
pub const FALLBACK_SUMMARY_CHARS: usize = 500;

/// Parses the model's text reply. Never fails: unparseable content yields
/// [`fallback_analysis`].
pub fn parse_model_text(raw: &str) -> AnalysisResult {
    let body = strip_code_fence(raw);
    match serde_json::from_str::<Value>(body) {
        Ok(value) if value.is_object() => normalize_analysis(&value, raw),
        _ => fallback_analysis(raw),
    }
}

/// Fills every missing or mistyped field of `value` with its default.
pub fn normalize_analysis(value: &Value, raw: &str) -> AnalysisResult {
    let sentiment = string_field(value, "sentiment").unwrap_or(DEFAULT_SENTIMENT);
    let themes = match value.get("themes") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    let tone = string_field(value, "tone").unwrap_or(DEFAULT_TONE);
    let summary = string_field(value, "summary")
        .unwrap_or_else(|| truncate_chars(raw, SUMMARY_DEFAULT_CHARS));

    AnalysisResult {
        sentiment: sentiment.to_string(),
        themes,
        tone: tone.to_string(),
        summary: summary.to_string(),
    }
}

/// Degraded result used when the model did not return JSON.
pub fn fallback_analysis(raw: &str) -> AnalysisResult {
    AnalysisResult {
        sentiment: DEFAULT_SENTIMENT.to_string(),
        themes: Vec::new(),
        tone: FALLBACK_TONE.to_string(),
        summary: truncate_chars(raw, FALLBACK_SUMMARY_CHARS).to_string(),
    }
}

/// Removes a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) whether a newline or a
    // space follows it.
    let rest = rest
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_start();
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
