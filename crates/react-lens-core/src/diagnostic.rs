//! Diagnostic data model shared by the rule modules, the scanner and the
//! remediation client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Accessibility,
    BestPractices,
    Bundle,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Accessibility,
        Category::BestPractices,
        Category::Bundle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Accessibility => "accessibility",
            Category::BestPractices => "best-practices",
            Category::Bundle => "bundle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid category '{0}'. Valid values: a11y, best-practices, bundle")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a11y" | "accessibility" => Ok(Category::Accessibility),
            "best" | "best-practices" | "practices" => Ok(Category::BestPractices),
            "bundle" | "performance" => Ok(Category::Bundle),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding produced by a rule module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: Category,
    pub rule: String,
    pub severity: Severity,
    pub file_path: String,
    pub line: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Diagnostic {
    pub fn new(
        category: Category,
        rule: impl Into<String>,
        severity: Severity,
        file_path: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            rule: rule.into(),
            severity,
            file_path: file_path.into(),
            line: line.max(1),
            message: message.into(),
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn without_snippet(mut self) -> Self {
        self.snippet = None;
        self
    }
}

/// A single source file handed to a rule module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub file_path: String,
    pub content: String,
}

impl FileContext {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub accessibility: u32,
    #[serde(rename = "best-practices")]
    pub best_practices: u32,
    pub bundle: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Accessibility => self.accessibility,
            Category::BestPractices => self.best_practices,
            Category::Bundle => self.bundle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub diagnostics: Vec<Diagnostic>,
}
