//! Best-practice rules: debugging leftovers, DOM access, oversized components
//! and props drilling.

use swc_common::Span;
use swc_ecma_ast::{
    Callee, DefaultDecl, ExportDefaultDecl, Expr, FnDecl, Function, JSXAttr, JSXElement,
    MemberExpr, MemberProp, OptChainBase, Pat, SpreadElement,
};

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::rules::helpers::{
    attr_identifier_value, is_capitalized, jsx_attrs, jsx_element_name, report,
};
use crate::rules::{Node, Rule, RuleMetadata};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast, walk_block};

const MAX_COMPONENT_LINES: usize = 200;
const PROPS_DRILLING_THRESHOLD: usize = 3;
const DOM_QUERY_METHODS: &[&str] = &["getElementById", "querySelector"];

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoConsoleLog::new()),
        Box::new(NoDirectDomManipulation::new()),
        Box::new(NoLargeComponent::new()),
        Box::new(NoPropsDrilling::new()),
    ]
}

/// `object.method(...)` with both sides plain identifiers. Optional links
/// (`object?.method(...)`, `object.method?.(...)`) and parentheses around the
/// callee match too. Returns the call's span with the names.
fn member_call<'a>(node: Node<'a>) -> Option<(&'a str, &'a str, Span)> {
    let (callee, span) = match node {
        Node::Call(call) => match &call.callee {
            Callee::Expr(callee) => (callee.as_ref(), call.span),
            _ => return None,
        },
        Node::OptCall(call) => (call.callee.as_ref(), call.span),
        _ => return None,
    };
    let (object, method) = callee_member(callee)?;
    Some((object, method, span))
}

fn callee_member(callee: &Expr) -> Option<(&str, &str)> {
    match callee {
        Expr::Member(member) => member_names(member),
        Expr::OptChain(chain) => match chain.base.as_ref() {
            OptChainBase::Member(member) => member_names(member),
            OptChainBase::Call(_) => None,
        },
        Expr::Paren(paren) => callee_member(&paren.expr),
        _ => None,
    }
}

fn member_names(member: &MemberExpr) -> Option<(&str, &str)> {
    let Expr::Ident(object) = member.obj.as_ref() else {
        return None;
    };
    let MemberProp::Ident(method) = &member.prop else {
        return None;
    };
    Some((&*object.sym, &*method.sym))
}

fn check_call<F>(
    metadata: &RuleMetadata,
    node: Node<'_>,
    ctx: &VisitorContext,
    message: &str,
    matches: F,
) -> Option<Diagnostic>
where
    F: FnOnce(&str, &str) -> bool,
{
    let (object, method, span) = member_call(node)?;
    matches(object, method).then(|| report(metadata, ctx, ctx.line_of(span), message))
}

/// `export default function Name() {}` counts as a named declaration.
fn default_export_function(node: &ExportDefaultDecl) -> Option<(&str, &Function)> {
    match &node.decl {
        DefaultDecl::Fn(fn_expr) => fn_expr
            .ident
            .as_ref()
            .map(|ident| (&*ident.sym, &*fn_expr.function)),
        _ => None,
    }
}

declare_rule!(
    NoConsoleLog,
    id = "no-console-log",
    description = "Disallow console.log calls in production code",
    category = BestPractices,
    severity = Warn,
    examples = "// Bad\nconsole.log('user', user);\n\n// Good\nlogger.debug('user', user);"
);

impl Rule for NoConsoleLog {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        check_call(
            &self.metadata,
            node,
            ctx,
            "Remove console.log statements from production code.",
            |object, method| object == "console" && method == "log",
        )
    }
}

declare_rule!(
    NoDirectDomManipulation,
    id = "no-direct-dom-manipulation",
    description = "Disallow document.getElementById and document.querySelector in components",
    category = BestPractices,
    severity = Warn,
    examples = "// Bad\ndocument.getElementById('title').focus();\n\n// Good\nconst titleRef = useRef(null);\ntitleRef.current.focus();"
);

impl Rule for NoDirectDomManipulation {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        check_call(
            &self.metadata,
            node,
            ctx,
            "Avoid direct DOM manipulation in React components.",
            |object, method| object == "document" && DOM_QUERY_METHODS.contains(&method),
        )
    }
}

declare_rule!(
    NoLargeComponent,
    id = "no-large-component",
    description = "Flag components spanning more than 200 lines",
    category = BestPractices,
    severity = Warn,
    examples = "// Bad\nfunction Dashboard() { /* 400 lines */ }\n\n// Good\nfunction Dashboard() {\n  return <Layout><Stats /><Activity /></Layout>;\n}"
);

impl Rule for NoLargeComponent {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        let (name, span) = match node {
            Node::FnDecl(decl) => (&*decl.ident.sym, decl.function.span),
            Node::ExportDefaultDecl(decl) => {
                let (name, function) = default_export_function(decl)?;
                (name, function.span)
            }
            Node::VarDeclarator(decl) => {
                let Pat::Ident(binding) = &decl.name else {
                    return None;
                };
                let span = match decl.init.as_deref() {
                    Some(Expr::Arrow(arrow)) => arrow.span,
                    Some(Expr::Fn(fn_expr)) => fn_expr.function.span,
                    _ => return None,
                };
                (&*binding.id.sym, span)
            }
            _ => return None,
        };
        if !is_capitalized(name) {
            return None;
        }

        let (start, end) = ctx.line_range(span);
        let lines = end - start + 1;
        (lines > MAX_COMPONENT_LINES).then(|| {
            report(
                &self.metadata,
                ctx,
                start,
                format!(
                    "Component {} has {} lines; split large components.",
                    name, lines
                ),
            )
        })
    }
}

declare_rule!(
    NoPropsDrilling,
    id = "no-props-drilling",
    description = "Flag files that forward props through several component layers",
    category = BestPractices,
    severity = Warn,
    examples = "// Bad\nfunction Page(props) { return <Layout {...props} />; }\nfunction Layout(props) { return <Sidebar user={user} theme={theme} />; }\n\n// Good\n// Share deeply used values through context or composition"
);

impl Rule for NoPropsDrilling {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_file(&self, ctx: &VisitorContext) -> Vec<Diagnostic> {
        let mut visitor = PropsDrillingVisitor { forwards: 0 };
        walk_ast(ctx.file().module(), &mut visitor, ctx);

        if visitor.forwards < PROPS_DRILLING_THRESHOLD {
            return Vec::new();
        }
        vec![report(
            &self.metadata,
            ctx,
            1,
            "Props appear to be forwarded deeply across multiple component boundaries.",
        )]
    }
}

/// Counts the ways props are passed through: a component's own parameter
/// handed to a child attribute, `{...props}` spreads, and capitalized
/// elements receiving several bare identifiers.
struct PropsDrillingVisitor {
    forwards: usize,
}

impl PropsDrillingVisitor {
    fn count_param_forwards(&mut self, name: &str, function: &Function, ctx: &VisitorContext) {
        if !is_capitalized(name) {
            return;
        }
        let Some(Pat::Ident(param)) = function.params.first().map(|p| &p.pat) else {
            return;
        };
        let Some(body) = &function.body else {
            return;
        };

        let mut counter = ParamForwardCounter {
            param: &param.id.sym,
            count: 0,
        };
        walk_block(body, &mut counter, ctx);
        self.forwards += counter.count;
    }
}

impl AstVisitor for PropsDrillingVisitor {
    fn visit_fn_decl(&mut self, node: &FnDecl, ctx: &VisitorContext) {
        self.count_param_forwards(&node.ident.sym, &node.function, ctx);
    }

    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl, ctx: &VisitorContext) {
        if let Some((name, function)) = default_export_function(node) {
            self.count_param_forwards(name, function, ctx);
        }
    }

    fn visit_jsx_spread_attr(&mut self, node: &SpreadElement, _ctx: &VisitorContext) {
        if matches!(node.expr.as_ref(), Expr::Ident(ident) if &*ident.sym == "props") {
            self.forwards += 1;
        }
    }

    fn visit_jsx_element(&mut self, node: &JSXElement, _ctx: &VisitorContext) {
        if !is_capitalized(&jsx_element_name(&node.opening.name)) {
            return;
        }
        let forwarded = jsx_attrs(&node.opening.attrs)
            .filter(|attr| attr_identifier_value(attr).is_some())
            .count();
        if forwarded > 1 {
            self.forwards += 1;
        }
    }
}

struct ParamForwardCounter<'p> {
    param: &'p str,
    count: usize,
}

impl AstVisitor for ParamForwardCounter<'_> {
    fn visit_jsx_attr(&mut self, node: &JSXAttr, _ctx: &VisitorContext) {
        if attr_identifier_value(node) == Some(self.param) {
            self.count += 1;
        }
    }
}
