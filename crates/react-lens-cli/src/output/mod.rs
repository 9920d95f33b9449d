//! Report rendering

pub mod json;
pub mod pretty;

use clap::ValueEnum;
use react_lens_ai::{FixOutput, RemediationError};
use react_lens_core::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Outcome of asking for a fix for one diagnostic.
#[derive(Debug)]
pub struct SuggestionEntry<'a> {
    pub diagnostic: &'a Diagnostic,
    pub outcome: Result<FixOutput, RemediationError>,
}
