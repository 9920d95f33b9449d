//! Health score from diagnostics.

use crate::diagnostic::{Category, Diagnostic, ScoreBreakdown, Severity};

pub const ERROR_PENALTY: u32 = 3;
pub const WARN_PENALTY: u32 = 1;
const MAX_SCORE: u32 = 100;

fn penalty(severity: Severity) -> u32 {
    match severity {
        Severity::Error => ERROR_PENALTY,
        Severity::Warn => WARN_PENALTY,
    }
}

fn score_of<'a>(diagnostics: impl Iterator<Item = &'a Diagnostic>) -> u32 {
    let total: u32 = diagnostics
        .map(|d| penalty(d.severity))
        .fold(0, u32::saturating_add);
    MAX_SCORE.saturating_sub(total)
}

/// Returns the overall score and a per-category breakdown, each floored at 0.
pub fn compute_score(diagnostics: &[Diagnostic]) -> (u32, ScoreBreakdown) {
    let category_score =
        |category: Category| score_of(diagnostics.iter().filter(|d| d.category == category));

    let breakdown = ScoreBreakdown {
        accessibility: category_score(Category::Accessibility),
        best_practices: category_score(Category::BestPractices),
        bundle: category_score(Category::Bundle),
    };

    (score_of(diagnostics.iter()), breakdown)
}
