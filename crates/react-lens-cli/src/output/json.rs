//! JSON output for programmatic integration

use react_lens_ai::{FixSuggestion, GenerationUsage};
use react_lens_core::ScanResult;
use serde::Serialize;

use super::SuggestionEntry;

const FORMAT_VERSION: &str = "1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub react_lens_version: &'static str,
    #[serde(flatten)]
    pub result: &'a ScanResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<JsonSuggestion<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSuggestion<'a> {
    pub rule: &'a str,
    pub file_path: &'a str,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'a FixSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<GenerationUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

#[derive(Serialize)]
pub struct JsonError {
    pub code: &'static str,
    pub message: String,
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format(result: &ScanResult, suggestions: &[SuggestionEntry<'_>]) -> String {
        let report = JsonReport {
            version: FORMAT_VERSION,
            react_lens_version: env!("CARGO_PKG_VERSION"),
            result,
            suggestions: suggestions.iter().map(to_json_suggestion).collect(),
        };

        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }
}

fn to_json_suggestion<'a>(entry: &'a SuggestionEntry<'_>) -> JsonSuggestion<'a> {
    let diag = entry.diagnostic;
    let mut json = JsonSuggestion {
        rule: &diag.rule,
        file_path: &diag.file_path,
        line: diag.line,
        suggestion: None,
        usage: None,
        model: None,
        error: None,
    };

    match &entry.outcome {
        Ok(output) => {
            json.suggestion = Some(&output.suggestion);
            json.usage = Some(output.usage);
            json.model = Some(&output.model);
        }
        Err(err) => {
            json.error = Some(JsonError {
                code: err.code(),
                message: err.to_string(),
            });
        }
    }

    json
}
