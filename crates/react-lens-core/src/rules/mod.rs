//! Rule system for code analysis
//!
//! Rules are grouped into three modules, one per [`Category`]. A module parses
//! the file once and walks the tree once, handing each node to every rule in
//! registration order, so diagnostics come out in document order. Rules that
//! need the whole file report after the walk.

pub mod accessibility;
pub mod best_practices;
pub mod bundle;
pub mod helpers;

use std::collections::{HashMap, HashSet};

use swc_ecma_ast::{
    CallExpr, ExportDefaultDecl, FnDecl, ImportDecl, JSXElement, OptCall, VarDeclarator,
};

use crate::config::RulesConfig;
use crate::diagnostic::{Category, Diagnostic, FileContext, Severity};
use crate::parser::{ParseError, ParsedFile};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub examples: Option<&'static str>,
}

/// A node handed to the rules of a module during its walk.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    JsxElement(&'a JSXElement),
    Call(&'a CallExpr),
    OptCall(&'a OptCall),
    FnDecl(&'a FnDecl),
    ExportDefaultDecl(&'a ExportDefaultDecl),
    VarDeclarator(&'a VarDeclarator),
    ImportDecl(&'a ImportDecl),
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Called for every node of the walk, in document order.
    fn check_node(&self, _node: Node<'_>, _ctx: &VisitorContext) -> Option<Diagnostic> {
        None
    }

    /// Called once after the walk.
    fn check_file(&self, _ctx: &VisitorContext) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Dispatches each visited node to every rule, collecting in visit order.
struct RuleDispatcher<'r> {
    rules: &'r [Box<dyn Rule>],
    diagnostics: Vec<Diagnostic>,
}

impl RuleDispatcher<'_> {
    fn dispatch(&mut self, node: Node<'_>, ctx: &VisitorContext) {
        for rule in self.rules {
            if let Some(diagnostic) = rule.check_node(node, ctx) {
                self.diagnostics.push(diagnostic);
            }
        }
    }
}

impl AstVisitor for RuleDispatcher<'_> {
    fn visit_jsx_element(&mut self, node: &JSXElement, ctx: &VisitorContext) {
        self.dispatch(Node::JsxElement(node), ctx);
    }

    fn visit_call_expr(&mut self, node: &CallExpr, ctx: &VisitorContext) {
        self.dispatch(Node::Call(node), ctx);
    }

    fn visit_opt_call(&mut self, node: &OptCall, ctx: &VisitorContext) {
        self.dispatch(Node::OptCall(node), ctx);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl, ctx: &VisitorContext) {
        self.dispatch(Node::FnDecl(node), ctx);
    }

    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl, ctx: &VisitorContext) {
        self.dispatch(Node::ExportDefaultDecl(node), ctx);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator, ctx: &VisitorContext) {
        self.dispatch(Node::VarDeclarator(node), ctx);
    }

    fn visit_import_decl(&mut self, node: &ImportDecl, ctx: &VisitorContext) {
        self.dispatch(Node::ImportDecl(node), ctx);
    }
}

/// Runs `rules` over one parsed file: a single walk, then the whole-file checks.
pub fn run_rules(rules: &[Box<dyn Rule>], file: &ParsedFile) -> Vec<Diagnostic> {
    let ctx = VisitorContext::new(file);
    let mut dispatcher = RuleDispatcher {
        rules,
        diagnostics: Vec::new(),
    };
    walk_ast(file.module(), &mut dispatcher, &ctx);

    let mut diagnostics = dispatcher.diagnostics;
    for rule in rules {
        diagnostics.extend(rule.check_file(&ctx));
    }
    diagnostics
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("rule module panicked: {0}")]
    Panicked(String),
}

/// Something that turns one file into diagnostics of a single category.
pub trait Analyzer: Send + Sync {
    fn category(&self) -> Category;
    fn run(&self, file: &FileContext) -> Result<Vec<Diagnostic>, AnalysisError>;
}

impl<T: Analyzer + ?Sized> Analyzer for Box<T> {
    fn category(&self) -> Category {
        (**self).category()
    }

    fn run(&self, file: &FileContext) -> Result<Vec<Diagnostic>, AnalysisError> {
        (**self).run(file)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleModule {
    Accessibility,
    BestPractices,
    Bundle,
}

impl RuleModule {
    /// Registration order, which is also the order modules run in.
    pub const ALL: [RuleModule; 3] = [
        RuleModule::Accessibility,
        RuleModule::BestPractices,
        RuleModule::Bundle,
    ];

    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Accessibility => RuleModule::Accessibility,
            Category::BestPractices => RuleModule::BestPractices,
            Category::Bundle => RuleModule::Bundle,
        }
    }

    fn rule_set(&self) -> Vec<Box<dyn Rule>> {
        match self {
            RuleModule::Accessibility => accessibility::rules(),
            RuleModule::BestPractices => best_practices::rules(),
            RuleModule::Bundle => bundle::rules(),
        }
    }

    pub fn rules(&self) -> Vec<RuleMetadata> {
        self.rule_set()
            .iter()
            .map(|rule| rule.metadata().clone())
            .collect()
    }
}

impl Analyzer for RuleModule {
    fn category(&self) -> Category {
        match self {
            RuleModule::Accessibility => Category::Accessibility,
            RuleModule::BestPractices => Category::BestPractices,
            RuleModule::Bundle => Category::Bundle,
        }
    }

    fn run(&self, file: &FileContext) -> Result<Vec<Diagnostic>, AnalysisError> {
        let parsed = ParsedFile::parse(&file.file_path, &file.content)?;

        Ok(run_rules(&self.rule_set(), &parsed))
    }
}

pub fn all_rules() -> Vec<RuleMetadata> {
    RuleModule::ALL.iter().flat_map(|m| m.rules()).collect()
}

pub fn find_rule(id: &str) -> Option<RuleMetadata> {
    all_rules().into_iter().find(|rule| rule.id == id)
}

/// Per-rule configuration applied to module output: disabled rule ids are
/// dropped and severity overrides replace the rule's default.
#[derive(Debug, Clone, Default)]
pub struct RuleSettings {
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
}

impl RuleSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        let mut settings = Self::new();
        settings.configure(config);
        settings
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.disabled_rules.clear();
        self.severity_overrides.clear();

        for rule_id in &config.disabled {
            self.disabled_rules.insert(rule_id.clone());
        }

        for (rule_id, severity_value) in &config.severity {
            self.severity_overrides
                .insert(rule_id.clone(), (*severity_value).into());
        }
    }

    pub fn is_rule_disabled(&self, id: &str) -> bool {
        self.disabled_rules.contains(id)
    }

    pub fn severity_override(&self, id: &str) -> Option<Severity> {
        self.severity_overrides.get(id).copied()
    }

    pub fn apply(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        diagnostics
            .into_iter()
            .filter(|diag| !self.is_rule_disabled(&diag.rule))
            .map(|diag| match self.severity_override(&diag.rule) {
                Some(severity) => diag.with_severity(severity),
                None => diag,
            })
            .collect()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        description: $desc,
                        category: $crate::diagnostic::Category::$cat,
                        severity: $crate::diagnostic::Severity::$sev,
                        examples: declare_rule!(@examples $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@examples $examples:literal) => { Some($examples) };
    (@examples) => { None };
}
