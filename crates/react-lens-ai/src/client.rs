//! Remediation client
//!
//! Walks the model candidate list in order. A candidate the service does not
//! know is skipped; any other failure ends the call and is classified into a
//! [`RemediationError`].

use react_lens_core::Diagnostic;
use react_lens_core::config::AiConfig;
use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::error::{RemediationError, TransportError};
use crate::parse::{FixSuggestion, parse_fix_suggestion};
use crate::prompt::build_fix_prompt;
use crate::transport::{GeminiTransport, GenerationRequest, GenerationTransport, GenerationUsage};

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const PROVIDER: &str = "google-gemini";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 1200;
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-1.5-flash-latest",
    "models/gemini-1.5-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
];
const NO_MODEL_MESSAGE: &str = "No compatible Gemini model found.";

/// Per-call overrides of the client's generation defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub text: String,
    pub usage: GenerationUsage,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutput {
    pub suggestion: FixSuggestion,
    pub usage: GenerationUsage,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStatus {
    pub configured: bool,
    pub provider: &'static str,
    pub default_model: String,
}

pub struct RemediationClient<T: GenerationTransport = GeminiTransport> {
    transport: T,
    api_key: Option<String>,
    models: Vec<String>,
    temperature: f32,
    max_tokens: u32,
}

impl RemediationClient<GeminiTransport> {
    /// Gemini client keyed by `GOOGLE_API_KEY`. A missing key is reported
    /// when a call is made, not here.
    pub fn from_env() -> Result<Self, RemediationError> {
        let transport =
            GeminiTransport::new().map_err(|e| RemediationError::Upstream(e.to_string()))?;
        Ok(Self::new(transport, read_api_key()))
    }
}

impl<T: GenerationTransport> RemediationClient<T> {
    pub fn new(transport: T, api_key: Option<String>) -> Self {
        Self {
            transport,
            api_key,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Replaces the candidate list; an empty list keeps the current one.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.models = models;
        }
        self
    }

    pub fn with_config(mut self, config: &AiConfig) -> Self {
        if let Some(models) = &config.models {
            self = self.with_models(models.clone());
        }
        if let Some(temperature) = config.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = config.max_tokens {
            self.max_tokens = max_tokens;
        }
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn status(&self) -> AiStatus {
        AiStatus {
            configured: self.is_configured(),
            provider: PROVIDER,
            default_model: self.models.first().cloned().unwrap_or_default(),
        }
    }

    /// Free-form generation.
    pub fn fix_prompt(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, RemediationError> {
        let api_key = self.api_key().ok_or(RemediationError::MissingApiKey)?;
        let mut last_unsupported: Option<TransportError> = None;

        for model in &self.models {
            let request = GenerationRequest {
                model,
                prompt,
                system_instruction: options.system_instruction.as_deref(),
                temperature: options.temperature.unwrap_or(self.temperature),
                max_output_tokens: options.max_tokens.unwrap_or(self.max_tokens),
                api_key,
            };
            let _span = debug_span!("generate", model = %model).entered();
            debug!("attempting generation");

            match self.transport.generate(&request) {
                Ok(response) if response.text.is_empty() => {
                    return Err(RemediationError::EmptyResponse);
                }
                Ok(response) => {
                    return Ok(Generation {
                        text: response.text,
                        usage: response.usage,
                        model: model.clone(),
                    });
                }
                Err(err) if err.is_model_unsupported() => {
                    warn!(model = %model, error = %err, "model unavailable, trying next candidate");
                    last_unsupported = Some(err);
                }
                Err(err) => return Err(RemediationError::classify(&err.0)),
            }
        }

        Err(RemediationError::Upstream(
            last_unsupported
                .map(|err| err.0)
                .unwrap_or_else(|| NO_MODEL_MESSAGE.to_string()),
        ))
    }

    /// Asks for a fix of `code` addressing `diagnostic`.
    pub fn fix(
        &self,
        diagnostic: &Diagnostic,
        code: &str,
        options: &GenerationOptions,
    ) -> Result<FixOutput, RemediationError> {
        let prompt = build_fix_prompt(diagnostic, code);
        let generation = self.fix_prompt(&prompt, options)?;

        Ok(FixOutput {
            suggestion: parse_fix_suggestion(&generation.text),
            usage: generation.usage,
            model: generation.model,
        })
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

fn read_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|s| !s.is_empty())
}
