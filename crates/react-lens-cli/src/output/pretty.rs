//! Pretty formatter for human-readable terminal output

use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use react_lens_core::{Category, Diagnostic, ScanResult, Severity};

use super::SuggestionEntry;

pub struct PrettyFormatter {
    verbose: bool,
    cwd: Option<PathBuf>,
}

impl PrettyFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, cwd: None }
    }

    /// Locations are shown relative to `cwd` when they lie under it.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn format(&self, result: &ScanResult) -> String {
        let mut lines = vec![
            "React Lens Health Report".bold().to_string(),
            format!("Score: {}/100", colorize_score(result.score)),
            format!(
                "Breakdown: a11y {}/100 | best-practices {}/100 | bundle {}/100",
                result.breakdown.accessibility,
                result.breakdown.best_practices,
                result.breakdown.bundle
            ),
        ];

        if result.diagnostics.is_empty() {
            lines.push("No diagnostics found.".green().to_string());
            return lines.join("\n") + "\n";
        }

        for (category, entries) in group_by_category(&result.diagnostics) {
            lines.push(String::new());
            lines.push(category.as_str().bold().to_string());
            for diag in entries {
                lines.push(self.format_diagnostic(diag));
            }
        }

        lines.join("\n") + "\n"
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let location = if self.verbose {
            format!(" ({}:{})", self.display_path(&diag.file_path), diag.line)
        } else {
            String::new()
        };

        format!(
            "- {} {}{}: {}",
            colorize_severity(diag.severity),
            diag.rule.cyan(),
            location,
            diag.message
        )
    }

    pub fn format_suggestions(&self, entries: &[SuggestionEntry<'_>]) -> String {
        let mut lines = vec![String::new(), "AI Suggestions".bold().to_string()];

        for entry in entries {
            let diag = entry.diagnostic;
            lines.push(String::new());
            lines.push(format!(
                "{} ({}:{})",
                diag.rule.cyan(),
                self.display_path(&diag.file_path),
                diag.line
            ));
            match &entry.outcome {
                Ok(output) => {
                    lines.push(format!("Explanation: {}", output.suggestion.explanation));
                    lines.push("Fixed code:".to_string());
                    lines.push(output.suggestion.fixed_code.clone());
                    lines.push(
                        format!("model {} · {} tokens", output.model, output.usage.total_tokens)
                            .dimmed()
                            .to_string(),
                    );
                }
                Err(err) => {
                    lines.push(format!("{} {} [{}]", "error:".red().bold(), err, err.code()));
                }
            }
        }

        lines.join("\n") + "\n"
    }

    fn display_path(&self, path: &str) -> String {
        self.cwd
            .as_deref()
            .and_then(|cwd| Path::new(path).strip_prefix(cwd).ok())
            .map(|relative| relative.to_string_lossy().into_owned())
            .filter(|relative| !relative.is_empty())
            .unwrap_or_else(|| path.to_string())
    }
}

fn colorize_score(score: u32) -> ColoredString {
    let text = score.to_string();
    if score > 80 {
        text.bright_green()
    } else if score >= 50 {
        text.bright_yellow()
    } else {
        text.bright_red()
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red(),
        Severity::Warn => "warn".yellow(),
    }
}

/// Groups in first-appearance order, which for a sorted result is category
/// order.
fn group_by_category(diagnostics: &[Diagnostic]) -> Vec<(Category, Vec<&Diagnostic>)> {
    let mut groups: Vec<(Category, Vec<&Diagnostic>)> = Vec::new();
    for diag in diagnostics {
        match groups.iter_mut().find(|(category, _)| *category == diag.category) {
            Some((_, entries)) => entries.push(diag),
            None => groups.push((diag.category, vec![diag])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use react_lens_ai::{FixOutput, FixSuggestion, GenerationUsage, RemediationError};
    use react_lens_core::ScoreBreakdown;

    fn plain() {
        colored::control::set_override(false);
    }

    fn diag(category: Category, rule: &str, severity: Severity, path: &str, line: usize) -> Diagnostic {
        Diagnostic::new(category, rule, severity, path, line, format!("{} message", rule))
    }

    fn result(diagnostics: Vec<Diagnostic>) -> ScanResult {
        ScanResult {
            score: 93,
            breakdown: ScoreBreakdown {
                accessibility: 97,
                best_practices: 98,
                bundle: 98,
            },
            diagnostics,
        }
    }

    #[test]
    fn header_lists_score_and_breakdown() {
        plain();
        let output = PrettyFormatter::new(false).format(&result(vec![]));

        assert!(output.contains("React Lens Health Report"));
        assert!(output.contains("Score: 93/100"));
        assert!(output.contains("Breakdown: a11y 97/100 | best-practices 98/100 | bundle 98/100"));
        assert!(output.contains("No diagnostics found."));
    }

    #[test]
    fn diagnostics_are_grouped_by_category() {
        plain();
        let output = PrettyFormatter::new(false).format(&result(vec![
            diag(Category::Accessibility, "no-img-without-alt", Severity::Error, "/p/a.tsx", 3),
            diag(Category::Bundle, "no-unused-imports", Severity::Warn, "/p/a.tsx", 1),
            diag(Category::Bundle, "no-full-library-import", Severity::Warn, "/p/b.tsx", 2),
        ]));

        let a11y = output.find("\naccessibility\n").unwrap();
        let bundle = output.find("\nbundle\n").unwrap();
        assert!(a11y < bundle);
        assert!(output.contains("- error no-img-without-alt: no-img-without-alt message"));
        assert!(output.contains("- warn no-unused-imports: no-unused-imports message"));
        assert!(!output.contains("best-practices\n"));
    }

    #[test]
    fn verbose_adds_relative_location() {
        plain();
        let formatter = PrettyFormatter::new(true).with_cwd("/project");

        let output = formatter.format(&result(vec![diag(
            Category::BestPractices,
            "no-console-log",
            Severity::Warn,
            "/project/src/App.tsx",
            7,
        )]));

        assert!(output.contains("- warn no-console-log (src/App.tsx:7): no-console-log message"));
    }

    #[test]
    fn paths_outside_cwd_stay_absolute() {
        let formatter = PrettyFormatter::new(true).with_cwd("/project");

        assert_eq!(formatter.display_path("/elsewhere/a.tsx"), "/elsewhere/a.tsx");
    }

    #[test]
    fn score_color_thresholds() {
        plain();
        assert_eq!(colorize_score(81).to_string(), "81");
        assert_eq!(colorize_score(50).to_string(), "50");
        assert_eq!(colorize_score(0).to_string(), "0");
    }

    #[test]
    fn suggestions_show_fix_or_error() {
        plain();
        let first = diag(Category::Accessibility, "no-img-without-alt", Severity::Error, "a.tsx", 2);
        let second = diag(Category::BestPractices, "no-console-log", Severity::Warn, "b.tsx", 5);
        let entries = vec![
            SuggestionEntry {
                diagnostic: &first,
                outcome: Ok(FixOutput {
                    suggestion: FixSuggestion {
                        explanation: "Add alt text.".into(),
                        fixed_code: "<img alt=\"Logo\" />".into(),
                    },
                    usage: GenerationUsage {
                        prompt_tokens: 1,
                        completion_tokens: 2,
                        total_tokens: 3,
                    },
                    model: "gemini-1.5-flash".into(),
                }),
            },
            SuggestionEntry {
                diagnostic: &second,
                outcome: Err(RemediationError::SafetyBlocked),
            },
        ];

        let output = PrettyFormatter::new(false).format_suggestions(&entries);

        assert!(output.contains("AI Suggestions"));
        assert!(output.contains("no-img-without-alt (a.tsx:2)"));
        assert!(output.contains("Explanation: Add alt text.\nFixed code:\n<img alt=\"Logo\" />"));
        assert!(output.contains("model gemini-1.5-flash · 3 tokens"));
        assert!(output.contains("error: Gemini blocked this request due to safety policies. [SAFETY_BLOCKED]"));
    }
}
