//! AI-generated fix suggestions for React Lens diagnostics
//!
//! [`RemediationClient`] sends a diagnostic and the offending code to a Gemini
//! model, falling back through a list of model candidates, and recovers a
//! [`FixSuggestion`] from whatever text comes back.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod transport;

pub use client::{
    AiStatus, FixOutput, Generation, GenerationOptions, RemediationClient, API_KEY_ENV,
    DEFAULT_MODELS,
};
pub use error::{RemediationError, TransportError};
pub use parse::{FixSuggestion, parse_fix_suggestion};
pub use transport::{
    GeminiTransport, GenerationRequest, GenerationResponse, GenerationTransport, GenerationUsage,
};
