//! Scan command - scores a codebase and optionally asks for AI fixes

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use react_lens_ai::{GenerationOptions, GenerationTransport, RemediationClient};
use react_lens_core::config::load_config_or_default_with_warnings;
use react_lens_core::{Category, Diagnostic, ScanOptions, ScanResult, Scanner};
use tracing::{info, warn};

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use crate::output::{OutputFormat, SuggestionEntry};

const MISSING_SNIPPET: &str = "Snippet unavailable. Provide a generic fix pattern.";

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// File or directory to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Scan one category: a11y | best-practices | bundle
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Show file and line for each diagnostic
    #[arg(short, long)]
    pub verbose: bool,

    /// Print only the score
    #[arg(long)]
    pub score: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Fetch AI fix suggestions using the Google Gemini API
    #[arg(long)]
    pub fix: bool,

    /// Maximum number of diagnostics to request fixes for
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub fix_limit: usize,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ScanArgs {
    pub fn run(&self) -> Result<()> {
        super::configure_colors(self.no_color);

        let category = self.parse_category()?;
        let config_result = load_config_or_default_with_warnings(&self.path);
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        let config = config_result.config;

        let options = ScanOptions::new(&self.path)
            .category(category)
            .include_snippets(self.fix);
        let result = Scanner::with_config(&config)
            .scan(&options)
            .with_context(|| format!("Failed to scan {}", self.path.display()))?;
        info!(
            diagnostics = result.diagnostics.len(),
            score = result.score,
            "scan complete"
        );

        let suggestions = if self.fix && !result.diagnostics.is_empty() {
            let client = RemediationClient::from_env()?.with_config(&config.ai);
            if client.is_configured() {
                collect_suggestions(&client, &result.diagnostics, self.fix_limit)
            } else {
                eprintln!("GOOGLE_API_KEY not set. Skipping AI suggestions.");
                Vec::new()
            }
        } else {
            Vec::new()
        };

        print!("{}", self.render(&result, &suggestions));
        Ok(())
    }

    /// Stdout for one run. `--score` replaces the report with the bare score
    /// but still lists the suggestions.
    fn render(&self, result: &ScanResult, suggestions: &[SuggestionEntry<'_>]) -> String {
        if self.format == OutputFormat::Json && !self.score {
            return format!("{}\n", JsonFormatter::format(result, suggestions));
        }

        let mut formatter = PrettyFormatter::new(self.verbose);
        if let Ok(cwd) = std::env::current_dir() {
            formatter = formatter.with_cwd(cwd);
        }
        let mut out = if self.score {
            format!("{}\n", result.score)
        } else {
            formatter.format(result)
        };
        if !suggestions.is_empty() {
            out.push_str(&formatter.format_suggestions(suggestions));
        }
        out
    }

    fn parse_category(&self) -> Result<Option<Category>> {
        match self.category.as_deref() {
            Some(raw) => raw
                .parse::<Category>()
                .map(Some)
                .map_err(|_| anyhow::anyhow!("Invalid category: {}", raw)),
            None => Ok(None),
        }
    }
}

/// Requests fixes one at a time for the first `limit` diagnostics. Credential
/// and quota failures end the batch; other failures are recorded and skipped.
pub fn collect_suggestions<'a, T: GenerationTransport>(
    client: &RemediationClient<T>,
    diagnostics: &'a [Diagnostic],
    limit: usize,
) -> Vec<SuggestionEntry<'a>> {
    let options = GenerationOptions::default();
    let mut entries = Vec::new();

    for diagnostic in diagnostics.iter().take(limit) {
        let code = diagnostic.snippet.as_deref().unwrap_or(MISSING_SNIPPET);
        let outcome = client.fix(diagnostic, code, &options);
        let stop = matches!(&outcome, Err(err) if err.is_fatal());
        if let Err(err) = &outcome {
            warn!(rule = %diagnostic.rule, code = err.code(), error = %err, "fix request failed");
        }

        entries.push(SuggestionEntry {
            diagnostic,
            outcome,
        });
        if stop {
            break;
        }
    }

    entries
}
