//! Bundle rules: whole-library imports, imports nobody uses and string
//! literals that should live in one constant.

use std::collections::HashMap;

use swc_common::Spanned;
use swc_ecma_ast::{Ident, IdentName, ImportDecl, ImportSpecifier, Str};

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::rules::helpers::report;
use crate::rules::{Node, Rule, RuleMetadata};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

const FULL_IMPORT_LIBS: &[&str] = &["lodash", "moment", "ramda"];
const MAX_TRACKED_STRING_CHARS: usize = 80;
const REPEATED_STRING_THRESHOLD: usize = 3;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoFullLibraryImport::new()),
        Box::new(NoUnusedImports::new()),
        Box::new(NoHardcodedStrings::new()),
    ]
}

declare_rule!(
    NoFullLibraryImport,
    id = "no-full-library-import",
    description = "Disallow importing all of lodash, moment or ramda",
    category = Bundle,
    severity = Warn,
    examples = "// Bad\nimport _ from 'lodash';\nimport * as R from 'ramda';\n\n// Good\nimport debounce from 'lodash/debounce';\nimport { map } from 'ramda';"
);

impl Rule for NoFullLibraryImport {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        let Node::ImportDecl(import) = node else {
            return None;
        };
        let source = import.src.value.to_string();
        if !FULL_IMPORT_LIBS.contains(&source.as_str()) {
            return None;
        }

        let has_namespace = import
            .specifiers
            .iter()
            .any(|s| matches!(s, ImportSpecifier::Namespace(_)));
        let default_only = !import.specifiers.is_empty()
            && import
                .specifiers
                .iter()
                .all(|s| matches!(s, ImportSpecifier::Default(_)));

        (has_namespace || default_only).then(|| {
            report(
                &self.metadata,
                ctx,
                ctx.line_of(import.span),
                format!(
                    "Avoid full import from '{}'. Prefer named or path imports.",
                    source
                ),
            )
        })
    }
}

declare_rule!(
    NoUnusedImports,
    id = "no-unused-imports",
    description = "Flag imported names that never appear again in the file",
    category = Bundle,
    severity = Warn,
    examples = "// Bad\nimport { format } from 'date-fns';\nexport const App = () => <p>Hi</p>;\n\n// Good\nexport const App = () => <p>Hi</p>;"
);

impl Rule for NoUnusedImports {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_file(&self, ctx: &VisitorContext) -> Vec<Diagnostic> {
        let mut visitor = ImportUsageVisitor::default();
        walk_ast(ctx.file().module(), &mut visitor, ctx);

        visitor
            .imports
            .iter()
            .filter(|(name, _)| visitor.occurrences.get(name).copied().unwrap_or(0) <= 1)
            .map(|(name, line)| {
                report(
                    &self.metadata,
                    ctx,
                    *line,
                    format!("Imported symbol '{}' appears unused.", name),
                )
            })
            .collect()
    }
}

/// Name-based usage: every identifier spelling counts, whatever it binds to.
#[derive(Default)]
struct ImportUsageVisitor {
    imports: Vec<(String, usize)>,
    occurrences: HashMap<String, usize>,
}

impl ImportUsageVisitor {
    fn record_import(&mut self, local: &Ident, line: usize) {
        let name = local.sym.to_string();
        match self.imports.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = line,
            None => self.imports.push((name, line)),
        }
    }

    fn record_occurrence(&mut self, name: &str) {
        *self.occurrences.entry(name.to_string()).or_default() += 1;
    }
}

impl AstVisitor for ImportUsageVisitor {
    fn visit_import_decl(&mut self, node: &ImportDecl, ctx: &VisitorContext) {
        for specifier in &node.specifiers {
            let local = match specifier {
                ImportSpecifier::Named(named) => &named.local,
                ImportSpecifier::Default(default) => &default.local,
                ImportSpecifier::Namespace(namespace) => &namespace.local,
            };
            self.record_import(local, ctx.line_of(specifier.span()));
        }
    }

    fn visit_ident(&mut self, node: &Ident, _ctx: &VisitorContext) {
        self.record_occurrence(&node.sym);
    }

    fn visit_ident_name(&mut self, node: &IdentName, _ctx: &VisitorContext) {
        self.record_occurrence(&node.sym);
    }
}

declare_rule!(
    NoHardcodedStrings,
    id = "no-hardcoded-strings",
    description = "Flag short string literals repeated three or more times",
    category = Bundle,
    severity = Warn,
    examples = "// Bad\n<Spinner label=\"Loading...\" />\n<Button>{\"Loading...\"}</Button>\nsetStatus(\"Loading...\");\n\n// Good\nconst LOADING = \"Loading...\";"
);

impl Rule for NoHardcodedStrings {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_file(&self, ctx: &VisitorContext) -> Vec<Diagnostic> {
        let mut visitor = StringCountVisitor::default();
        walk_ast(ctx.file().module(), &mut visitor, ctx);

        visitor
            .literals
            .iter()
            .filter(|literal| literal.count >= REPEATED_STRING_THRESHOLD)
            .map(|literal| {
                report(
                    &self.metadata,
                    ctx,
                    literal.first_line,
                    format!(
                        "String literal '{}' repeated {} times; extract to a constant.",
                        literal.text, literal.count
                    ),
                )
            })
            .collect()
    }
}

struct StringLiteral {
    text: String,
    count: usize,
    first_line: usize,
}

/// Trimmed literal texts in first-occurrence order.
#[derive(Default)]
struct StringCountVisitor {
    literals: Vec<StringLiteral>,
    index: HashMap<String, usize>,
}

impl AstVisitor for StringCountVisitor {
    fn visit_str(&mut self, node: &Str, ctx: &VisitorContext) {
        let value = node.value.to_string();
        let text = value.trim();
        let chars = text.chars().count();
        if chars == 0 || chars > MAX_TRACKED_STRING_CHARS {
            return;
        }

        match self.index.get(text) {
            Some(&i) => self.literals[i].count += 1,
            None => {
                self.index.insert(text.to_string(), self.literals.len());
                self.literals.push(StringLiteral {
                    text: text.to_string(),
                    count: 1,
                    first_line: ctx.line_of(node.span),
                });
            }
        }
    }
}
