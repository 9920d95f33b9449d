//! Fix command - free-form generation through the remediation client

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use react_lens_ai::{Generation, GenerationOptions, RemediationClient};
use react_lens_core::config::load_config_or_default;

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Prompt text sent to the model
    #[arg(long)]
    pub prompt: String,

    /// Optional system instruction
    #[arg(long)]
    pub system: Option<String>,

    /// Sampling temperature (default 0.1)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum output tokens (default 1200)
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,
}

impl FixArgs {
    pub fn run(&self) -> Result<()> {
        let config = load_config_or_default(&std::env::current_dir()?);
        let client = RemediationClient::from_env()?.with_config(&config.ai);

        let generation = client
            .fix_prompt(&self.prompt, &self.options())
            .map_err(|err| anyhow::anyhow!("[{}] {}", err.code(), err))?;

        println!("{}", generation.text);
        println!("{}", usage_line(&generation).dimmed());
        Ok(())
    }

    fn options(&self) -> GenerationOptions {
        GenerationOptions {
            system_instruction: self.system.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn usage_line(generation: &Generation) -> String {
    format!(
        "model {} · prompt {} · completion {} · total {} tokens",
        generation.model,
        generation.usage.prompt_tokens,
        generation.usage.completion_tokens,
        generation.usage.total_tokens
    )
}
