//! Scan orchestration: runs rule modules over a file set and scores the result.
//!
//! Every (file, module) pair is isolated. A module that fails on a file,
//! by returning an error or by panicking, turns into one `parse-failure`
//! diagnostic and the scan carries on.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info_span, warn};

use crate::config::Config;
use crate::diagnostic::{Category, Diagnostic, FileContext, ScanResult, Severity};
use crate::discovery::{FileDiscovery, WalkDirDiscovery};
use crate::rules::{AnalysisError, Analyzer, RuleModule, RuleSettings};
use crate::score::compute_score;

pub const PARSE_FAILURE_RULE: &str = "parse-failure";
const FAILURE_SNIPPET_LINES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub category: Option<Category>,
    pub include_snippets: bool,
}

impl ScanOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            category: None,
            include_snippets: false,
        }
    }

    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn include_snippets(mut self, include: bool) -> Self {
        self.include_snippets = include;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("Failed to list files under '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct Scanner<A: Analyzer = RuleModule> {
    analyzers: Vec<A>,
    discovery: Box<dyn FileDiscovery>,
    settings: RuleSettings,
}

impl Scanner<RuleModule> {
    pub fn new() -> Self {
        Self::with_analyzers(RuleModule::ALL.to_vec())
    }

    /// Applies rule settings and extra ignored directories from `config`.
    pub fn with_config(config: &Config) -> Self {
        Self::new()
            .with_discovery(WalkDirDiscovery::new().with_ignored_dirs(config.ignore.clone()))
            .with_settings(RuleSettings::from_config(&config.rules))
    }
}

impl Default for Scanner<RuleModule> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Analyzer> Scanner<A> {
    /// Analyzers run in the order given.
    pub fn with_analyzers(analyzers: Vec<A>) -> Self {
        Self {
            analyzers,
            discovery: Box::new(WalkDirDiscovery::new()),
            settings: RuleSettings::new(),
        }
    }

    pub fn with_discovery(mut self, discovery: impl FileDiscovery + 'static) -> Self {
        self.discovery = Box::new(discovery);
        self
    }

    pub fn with_settings(mut self, settings: RuleSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn scan(&self, options: &ScanOptions) -> Result<ScanResult, ScanError> {
        let _span = info_span!("scan", root = %options.root.display()).entered();
        if !options.root.exists() {
            return Err(ScanError::PathNotFound(options.root.clone()));
        }

        let files = self
            .discovery
            .discover(&options.root)
            .map_err(|source| ScanError::Io {
                path: options.root.clone(),
                source,
            })?;
        debug!(root = %options.root.display(), files = files.len(), "discovered files");

        let selected: Vec<&A> = self
            .analyzers
            .iter()
            .filter(|a| options.category.is_none_or(|c| a.category() == c))
            .collect();

        let diagnostics: Vec<Diagnostic> = files
            .par_iter()
            .map(|path| self.scan_file(path, &selected, options.include_snippets))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        Ok(finish(diagnostics))
    }

    /// Runs every analyzer over one in-memory source, ignoring any category
    /// filter. Snippets are kept.
    pub fn scan_snippet(&self, code: &str, virtual_path: &str) -> ScanResult {
        let file = FileContext::new(virtual_path, code);
        let mut diagnostics = Vec::new();

        for analyzer in &self.analyzers {
            match run_isolated(analyzer, &file) {
                Ok(found) => diagnostics.extend(self.settings.apply(found)),
                Err(err) => {
                    warn!(category = %analyzer.category(), error = %err, "snippet analysis failed");
                    diagnostics.push(Diagnostic::new(
                        Category::BestPractices,
                        PARSE_FAILURE_RULE,
                        Severity::Warn,
                        virtual_path,
                        1,
                        format!(
                            "Failed to analyze snippet for {}: {}",
                            analyzer.category(),
                            err
                        ),
                    ));
                }
            }
        }

        finish(diagnostics)
    }

    fn scan_file(&self, path: &Path, analyzers: &[&A], include_snippets: bool) -> Vec<Diagnostic> {
        let file_path = path.to_string_lossy().into_owned();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(file = %file_path, error = %err, "skipping unreadable file");
                return Vec::new();
            }
        };
        debug!(file = %file_path, "scanning file");

        let file = FileContext::new(file_path, content);
        let mut diagnostics = Vec::new();

        for analyzer in analyzers {
            match run_isolated(*analyzer, &file) {
                Ok(found) => diagnostics.extend(self.settings.apply(found)),
                Err(err) => {
                    warn!(
                        file = %file.file_path,
                        category = %analyzer.category(),
                        error = %err,
                        "rule module failed"
                    );
                    diagnostics.push(failure_diagnostic(&file, analyzer.category(), &err));
                }
            }
        }

        if include_snippets {
            diagnostics
        } else {
            diagnostics.into_iter().map(Diagnostic::without_snippet).collect()
        }
    }
}

fn run_isolated<A: Analyzer + ?Sized>(
    analyzer: &A,
    file: &FileContext,
) -> Result<Vec<Diagnostic>, AnalysisError> {
    match catch_unwind(AssertUnwindSafe(|| analyzer.run(file))) {
        Ok(result) => result,
        Err(payload) => Err(AnalysisError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}

fn failure_diagnostic(file: &FileContext, category: Category, err: &AnalysisError) -> Diagnostic {
    let snippet = file
        .content
        .split('\n')
        .take(FAILURE_SNIPPET_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    Diagnostic::new(
        Category::BestPractices,
        PARSE_FAILURE_RULE,
        Severity::Warn,
        file.file_path.clone(),
        1,
        format!("Failed to analyze file for {}: {}", category, err),
    )
    .with_snippet(snippet)
}

/// Orders by (category, file path, line); ties keep emission order.
fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then_with(|| a.file_path.cmp(&b.file_path))
            .then_with(|| a.line.cmp(&b.line))
    });
}

fn finish(mut diagnostics: Vec<Diagnostic>) -> ScanResult {
    sort_diagnostics(&mut diagnostics);
    let (score, breakdown) = compute_score(&diagnostics);
    ScanResult {
        score,
        breakdown,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RulesConfig, SeverityValue};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    struct FailingAnalyzer {
        category: Category,
        fail_on: &'static str,
        panic: bool,
    }

    impl Analyzer for FailingAnalyzer {
        fn category(&self) -> Category {
            self.category
        }

        fn run(&self, file: &FileContext) -> Result<Vec<Diagnostic>, AnalysisError> {
            if file.file_path.ends_with(self.fail_on) {
                if self.panic {
                    panic!("analyzer exploded");
                }
                return Err(AnalysisError::Panicked("boom".to_string()));
            }
            Ok(vec![Diagnostic::new(
                self.category,
                "fake-rule",
                Severity::Warn,
                file.file_path.clone(),
                1,
                "fake",
            )])
        }
    }

    #[test]
    fn scan_reports_diagnostics_sorted() {
        let dir = project(&[
            ("b.tsx", "export const B = () => <img src=\"b.png\" />;\nconsole.log(1);\n"),
            ("a.tsx", "console.log(1);\nexport const A = () => <img src=\"a.png\" />;\n"),
        ]);

        let result = Scanner::new().scan(&ScanOptions::new(dir.path())).unwrap();

        let summary: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| {
                let name = Path::new(&d.file_path).file_name().unwrap().to_string_lossy().into_owned();
                (d.category, name, d.line)
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (Category::Accessibility, "a.tsx".to_string(), 2),
                (Category::Accessibility, "b.tsx".to_string(), 1),
                (Category::BestPractices, "a.tsx".to_string(), 1),
                (Category::BestPractices, "b.tsx".to_string(), 2),
            ]
        );
        assert_eq!(result.score, 100 - 3 - 3 - 1 - 1);
        assert_eq!(result.breakdown.accessibility, 94);
        assert_eq!(result.breakdown.best_practices, 98);
        assert_eq!(result.breakdown.bundle, 100);
    }

    #[test]
    fn scan_strips_snippets_unless_requested() {
        let dir = project(&[("App.jsx", "const A = () => <img />;\n")]);
        let scanner = Scanner::new();

        let without = scanner.scan(&ScanOptions::new(dir.path())).unwrap();
        let with = scanner
            .scan(&ScanOptions::new(dir.path()).include_snippets(true))
            .unwrap();

        assert!(without.diagnostics.iter().all(|d| d.snippet.is_none()));
        assert!(with.diagnostics.iter().all(|d| d.snippet.is_some()));
    }

    #[test]
    fn category_filter_limits_modules() {
        let dir = project(&[(
            "App.jsx",
            "import _ from 'lodash';\nconsole.log(_);\nconst A = () => <img />;\n",
        )]);

        let result = Scanner::new()
            .scan(&ScanOptions::new(dir.path()).category(Some(Category::Bundle)))
            .unwrap();

        assert!(!result.diagnostics.is_empty());
        assert!(result.diagnostics.iter().all(|d| d.category == Category::Bundle));
        assert_eq!(result.breakdown.accessibility, 100);
    }

    #[test]
    fn parse_failure_becomes_diagnostic_per_module() {
        let dir = project(&[
            ("broken.tsx", "const x = <div>;\nline two\nline three\nline four\n"),
            ("ok.tsx", "console.log('fine');\n"),
        ]);

        let result = Scanner::new()
            .scan(&ScanOptions::new(dir.path()).include_snippets(true))
            .unwrap();

        let failures: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.rule == PARSE_FAILURE_RULE)
            .collect();
        assert_eq!(failures.len(), 3);
        for failure in &failures {
            assert_eq!(failure.category, Category::BestPractices);
            assert_eq!(failure.severity, Severity::Warn);
            assert_eq!(failure.line, 1);
            assert!(failure.file_path.ends_with("broken.tsx"));
            assert_eq!(
                failure.snippet.as_deref(),
                Some("const x = <div>;\nline two\nline three")
            );
        }
        assert!(failures[0].message.starts_with("Failed to analyze file for accessibility: "));
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.rule == "no-console-log" && d.file_path.ends_with("ok.tsx"))
        );
    }

    #[test]
    fn failing_module_is_isolated_per_file() {
        let dir = project(&[("f.tsx", "const a = 1;\n"), ("g.tsx", "const b = 2;\n")]);
        let analyzers: Vec<Box<dyn Analyzer>> = vec![
            Box::new(FailingAnalyzer {
                category: Category::Accessibility,
                fail_on: "f.tsx",
                panic: false,
            }),
            Box::new(FailingAnalyzer {
                category: Category::Bundle,
                fail_on: "never",
                panic: false,
            }),
        ];

        let result = Scanner::with_analyzers(analyzers)
            .scan(&ScanOptions::new(dir.path()))
            .unwrap();

        let failures: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.rule == PARSE_FAILURE_RULE)
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].file_path.ends_with("f.tsx"));
        assert_eq!(
            failures[0].message,
            "Failed to analyze file for accessibility: rule module panicked: boom"
        );

        let bundle = result
            .diagnostics
            .iter()
            .filter(|d| d.category == Category::Bundle)
            .count();
        let accessibility = result
            .diagnostics
            .iter()
            .filter(|d| d.category == Category::Accessibility)
            .count();
        assert_eq!(bundle, 2);
        assert_eq!(accessibility, 1);
    }

    #[test]
    fn panicking_module_is_caught() {
        let dir = project(&[("f.tsx", "const a = 1;\n")]);
        let scanner = Scanner::with_analyzers(vec![FailingAnalyzer {
            category: Category::Bundle,
            fail_on: "f.tsx",
            panic: true,
        }]);

        let result = scanner.scan(&ScanOptions::new(dir.path())).unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].message,
            "Failed to analyze file for bundle: rule module panicked: analyzer exploded"
        );
    }

    #[test]
    fn scanning_twice_is_identical() {
        let dir = project(&[
            ("src/a.tsx", "const A = () => <button />;\n"),
            ("src/b.jsx", "console.log('x');\n"),
            ("src/nested/c.ts", "const s = ['x', 'x', 'x'];\n"),
        ]);
        let scanner = Scanner::new();
        let options = ScanOptions::new(dir.path()).include_snippets(true);

        assert_eq!(scanner.scan(&options).unwrap(), scanner.scan(&options).unwrap());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = Scanner::new().scan(&ScanOptions::new(&missing)).unwrap_err();

        assert!(matches!(err, ScanError::PathNotFound(path) if path == missing));
    }

    #[test]
    fn config_disables_rules_and_overrides_severity() {
        let dir = project(&[(
            "App.jsx",
            "console.log(1);\nconst A = () => <img />;\nconst s = ['k', 'k', 'k'];\n",
        )]);
        let mut rules = RulesConfig {
            disabled: vec!["no-console-log".to_string()],
            ..Default::default()
        };
        rules
            .severity
            .insert("no-hardcoded-strings".to_string(), SeverityValue::Error);
        let config = Config {
            rules,
            ..Default::default()
        };

        let result = Scanner::with_config(&config)
            .scan(&ScanOptions::new(dir.path()))
            .unwrap();

        assert!(result.diagnostics.iter().all(|d| d.rule != "no-console-log"));
        let strings = result
            .diagnostics
            .iter()
            .find(|d| d.rule == "no-hardcoded-strings")
            .unwrap();
        assert_eq!(strings.severity, Severity::Error);
        assert_eq!(result.breakdown.bundle, 97);
    }

    #[test]
    fn config_ignore_skips_directories() {
        let dir = project(&[
            ("generated/api.tsx", "console.log(1);\n"),
            ("src/App.tsx", "export const n = 1;\n"),
        ]);
        let config = Config {
            ignore: vec!["generated".to_string()],
            ..Default::default()
        };

        let result = Scanner::with_config(&config)
            .scan(&ScanOptions::new(dir.path()))
            .unwrap();

        assert!(result.diagnostics.is_empty());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn scan_snippet_runs_every_module() {
        let result = Scanner::new().scan_snippet(
            "console.log('x');\nexport const A = () => <img src=\"x.png\" />;\n",
            "snippet.tsx",
        );

        let rules: Vec<_> = result.diagnostics.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, vec!["no-img-without-alt", "no-console-log"]);
        assert!(result.diagnostics.iter().all(|d| d.file_path == "snippet.tsx"));
        assert!(result.diagnostics.iter().all(|d| d.snippet.is_some()));
        assert_eq!(result.score, 96);
    }

    #[test]
    fn scan_snippet_reports_parse_failures() {
        let result = Scanner::new().scan_snippet("const = ;", "snippet.tsx");

        assert_eq!(result.diagnostics.len(), 3);
        assert!(result.diagnostics.iter().all(|d| d.rule == PARSE_FAILURE_RULE));
        assert!(
            result.diagnostics[0]
                .message
                .starts_with("Failed to analyze snippet for accessibility: ")
        );
        assert_eq!(result.score, 97);
    }
}
