//! Explain command - provides detailed explanation of a rule

use clap::Args;
use colored::Colorize;
use react_lens_core::config::load_config_or_default_with_warnings;
use react_lens_core::rules::all_rules;
use react_lens_core::{Config, RuleMetadata, Severity, find_rule};
use std::env;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[arg(
        value_name = "RULE_ID",
        help = "Rule ID to explain (e.g., \"no-img-without-alt\")"
    )]
    pub rule_id: String,
}

impl ExplainArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let cwd = env::current_dir()?;
        let config = load_config_or_default_with_warnings(&cwd).config;

        match find_rule(&self.rule_id) {
            Some(metadata) => {
                print!("{}", describe(&metadata, &config));
                Ok(())
            }
            None => {
                eprintln!(
                    "{} Unknown rule '{}'",
                    "error:".red().bold(),
                    self.rule_id
                );
                eprintln!();
                eprintln!("Available rules:");
                for rule in all_rules() {
                    eprintln!("  {} ({})", rule.id, rule.category);
                }

                std::process::exit(1);
            }
        }
    }
}

fn describe(metadata: &RuleMetadata, config: &Config) -> String {
    let mut lines = vec![
        String::new(),
        format!("Rule {}", metadata.id).bold().to_string(),
        String::new(),
        format!("  {}: {}", "Description".cyan(), metadata.description),
        format!("  {}: {}", "Category".cyan(), metadata.category),
        format!(
            "  {}: {}",
            "Severity".cyan(),
            format_severity(effective_severity(metadata, config))
        ),
    ];

    if let Some(examples) = metadata.examples {
        lines.push(String::new());
        lines.push(format!("  {}:", "Examples".cyan()));
        for line in examples.lines() {
            lines.push(format!("    {}", line));
        }
    }

    let status = if is_disabled(metadata, config) {
        "disabled".red()
    } else {
        "enabled".green()
    };
    lines.push(String::new());
    lines.push(format!("  {}: {}", "Status".cyan(), status));
    lines.push(String::new());

    lines.join("\n")
}

fn is_disabled(metadata: &RuleMetadata, config: &Config) -> bool {
    config.rules.disabled.iter().any(|id| id == metadata.id)
}

fn effective_severity(metadata: &RuleMetadata, config: &Config) -> Severity {
    config
        .rules
        .severity
        .get(metadata.id)
        .map(|value| (*value).into())
        .unwrap_or(metadata.severity)
}

fn format_severity(severity: Severity) -> String {
    match severity {
        Severity::Error => "error".red().to_string(),
        Severity::Warn => "warn".yellow().to_string(),
    }
}
