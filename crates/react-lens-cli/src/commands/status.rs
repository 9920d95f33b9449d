//! Status command - reports whether AI suggestions are available

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use react_lens_ai::{AiStatus, RemediationClient};
use react_lens_core::config::load_config_or_default;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(&self) -> Result<()> {
        let config = load_config_or_default(&std::env::current_dir()?);
        let status = RemediationClient::from_env()?
            .with_config(&config.ai)
            .status();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            print!("{}", describe(&status));
        }
        Ok(())
    }
}

fn describe(status: &AiStatus) -> String {
    let configured = if status.configured {
        "yes".green()
    } else {
        "no (set GOOGLE_API_KEY)".red()
    };

    format!(
        "{}: {}\n{}: {}\n{}: {}\n",
        "Provider".cyan(),
        status.provider,
        "Default model".cyan(),
        status.default_model,
        "Configured".cyan(),
        configured
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_unconfigured_status() {
        colored::control::set_override(false);
        let status = AiStatus {
            configured: false,
            provider: "google-gemini",
            default_model: "gemini-1.5-flash-latest".into(),
        };

        let text = describe(&status);

        assert_eq!(
            text,
            "Provider: google-gemini\nDefault model: gemini-1.5-flash-latest\nConfigured: no (set GOOGLE_API_KEY)\n"
        );
    }
}
