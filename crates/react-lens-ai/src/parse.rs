//! Recovery of structured fix suggestions from free-form model output

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const FALLBACK_EXPLANATION: &str =
    "The model response was not valid JSON. Returned as raw fixed code text.";

/// First fenced block anywhere in the text; the closing fence starts a line.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n(.*?)\r?\n[ \t]*```")
        .expect("Invalid regex pattern")
});

/// A fenced block spanning the whole value.
static WHOLE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+.-]*[ \t]*\r?\n(.*?)\r?\n?[ \t]*```\z")
        .expect("Invalid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    pub explanation: String,
    pub fixed_code: String,
}

/// Turns model output into a suggestion. Never fails: unrecognizable output
/// becomes a fallback suggestion carrying the raw text as code.
pub fn parse_fix_suggestion(text: &str) -> FixSuggestion {
    let trimmed = text.trim();

    let structured = structured(trimmed)
        .or_else(|| first_fenced_block(trimmed).and_then(structured))
        .or_else(|| brace_slice(trimmed).and_then(structured));

    match structured {
        Some((explanation, fixed_code)) => FixSuggestion {
            explanation: explanation.trim().to_string(),
            fixed_code: normalize_code(&fixed_code),
        },
        None => FixSuggestion {
            explanation: FALLBACK_EXPLANATION.to_string(),
            fixed_code: normalize_code(text),
        },
    }
}

/// Strips surrounding whitespace, a whole-value fence and a leading `json`
/// line so only bare code remains.
pub fn normalize_code(code: &str) -> String {
    let trimmed = code.trim();
    let unwrapped = WHOLE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let without_tag = unwrapped
        .strip_prefix("json")
        .and_then(|rest| rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")))
        .unwrap_or(unwrapped);

    without_tag.trim().to_string()
}

fn structured(candidate: &str) -> Option<(String, String)> {
    let value: serde_json::Value = serde_json::from_str(candidate.trim()).ok()?;
    let explanation = non_empty_str(&value, "explanation")?;
    let fixed_code = non_empty_str(&value, "fixedCode")?;
    Some((explanation, fixed_code))
}

fn non_empty_str(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_object() {
        let suggestion =
            parse_fix_suggestion(r#"  {"explanation": " Add alt. ", "fixedCode": "<img alt=\"\" />"}  "#);

        assert_eq!(suggestion.explanation, "Add alt.");
        assert_eq!(suggestion.fixed_code, "<img alt=\"\" />");
    }

    #[test]
    fn fenced_json_with_fenced_code() {
        let text = "```json\n{\"explanation\":\"e\",\"fixedCode\":\"```js\\nconst x=1;\\n```\"}\n```";

        let suggestion = parse_fix_suggestion(text);

        assert_eq!(suggestion.explanation, "e");
        assert_eq!(suggestion.fixed_code, "const x=1;");
    }

    #[test]
    fn json_surrounded_by_prose() {
        let text = "Sure! Here it is: {\"explanation\": \"Use a constant\", \"fixedCode\": \"const LABEL = 'x';\"} Hope that helps.";

        let suggestion = parse_fix_suggestion(text);

        assert_eq!(suggestion.explanation, "Use a constant");
        assert_eq!(suggestion.fixed_code, "const LABEL = 'x';");
    }

    #[test]
    fn missing_field_falls_back() {
        let text = r#"{"explanation": "only this"}"#;

        let suggestion = parse_fix_suggestion(text);

        assert_eq!(suggestion.explanation, FALLBACK_EXPLANATION);
        assert_eq!(suggestion.fixed_code, text);
    }

    #[test]
    fn empty_field_falls_back() {
        let suggestion = parse_fix_suggestion(r#"{"explanation": "", "fixedCode": "x"}"#);

        assert_eq!(suggestion.explanation, FALLBACK_EXPLANATION);
    }

    #[test]
    fn non_string_field_falls_back() {
        let suggestion = parse_fix_suggestion(r#"{"explanation": "e", "fixedCode": 3}"#);

        assert_eq!(suggestion.explanation, FALLBACK_EXPLANATION);
    }

    #[test]
    fn raw_fenced_code_falls_back_to_bare_code() {
        let suggestion = parse_fix_suggestion("```tsx\nexport const A = () => <a href=\"/\">x</a>;\n```");

        assert_eq!(suggestion.explanation, FALLBACK_EXPLANATION);
        assert_eq!(
            suggestion.fixed_code,
            "export const A = () => <a href=\"/\">x</a>;"
        );
    }

    #[test]
    fn normalize_drops_json_tag_line() {
        assert_eq!(normalize_code("json\nconst a = 1;"), "const a = 1;");
        assert_eq!(normalize_code("  json\r\n{}\n"), "{}");
    }

    #[test]
    fn normalize_keeps_other_spellings_of_json() {
        assert_eq!(normalize_code("JSON\nconst a = 1;"), "JSON\nconst a = 1;");
        assert_eq!(normalize_code("json  \n{}"), "json  \n{}");
    }

    #[test]
    fn normalize_leaves_plain_code() {
        assert_eq!(normalize_code("\n  const a = 1;\n"), "const a = 1;");
        assert_eq!(normalize_code("jsonify(data);"), "jsonify(data);");
    }

    #[test]
    fn normalize_unwraps_fence_without_language() {
        assert_eq!(normalize_code("```\nlet y = 2;\n```"), "let y = 2;");
    }

    #[test]
    fn suggestion_serializes_camel_case() {
        let json = serde_json::to_value(FixSuggestion {
            explanation: "e".into(),
            fixed_code: "c".into(),
        })
        .unwrap();

        assert_eq!(json["fixedCode"], "c");
    }
}
