//! React Lens core analysis engine
//!
//! Parses JSX-capable JavaScript/TypeScript files with SWC, runs the
//! accessibility, best-practice and bundle rule modules over them, and turns
//! the resulting diagnostics into a health score.

pub mod config;
pub mod diagnostic;
pub mod discovery;
pub mod parser;
pub mod rules;
pub mod scanner;
pub mod score;
pub mod share;
pub mod visitor;

pub use config::{Config, ConfigError, ConfigResult};
pub use diagnostic::{Category, Diagnostic, FileContext, ScanResult, ScoreBreakdown, Severity};
pub use rules::{AnalysisError, Analyzer, RuleMetadata, RuleModule, find_rule};
pub use scanner::{ScanError, ScanOptions, Scanner};
pub use score::compute_score;
pub use share::{InMemoryShareStore, ShareStore, SharedResult, new_share_id};
