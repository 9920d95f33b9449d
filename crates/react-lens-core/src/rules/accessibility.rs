//! Accessibility rules: JSX elements that assistive technology cannot use.

use swc_ecma_ast::{JSXElement, JSXElementChild, JSXExpr, Lit};

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::rules::helpers::{has_jsx_attr, jsx_attr_name, jsx_attrs, jsx_element_name, report};
use crate::rules::{Node, Rule, RuleMetadata};
use crate::visitor::VisitorContext;

pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoImgWithoutAlt::new()),
        Box::new(NoButtonWithoutLabel::new()),
        Box::new(NoAnchorWithoutHref::new()),
        Box::new(NoMissingAriaRole::new()),
    ]
}

/// Reports `element` when `check` returns a message for its tag.
fn check_element<F>(
    metadata: &RuleMetadata,
    node: Node<'_>,
    ctx: &VisitorContext,
    check: F,
) -> Option<Diagnostic>
where
    F: FnOnce(&str, &JSXElement) -> Option<String>,
{
    let Node::JsxElement(element) = node else {
        return None;
    };
    let tag = jsx_element_name(&element.opening.name);
    let message = check(&tag, element)?;
    Some(report(metadata, ctx, ctx.line_of(element.span), message))
}

declare_rule!(
    NoImgWithoutAlt,
    id = "no-img-without-alt",
    description = "Require an alt attribute on <img> elements",
    category = Accessibility,
    severity = Error,
    examples = "// Bad\n<img src=\"logo.png\" />\n\n// Good\n<img src=\"logo.png\" alt=\"Company logo\" />"
);

impl Rule for NoImgWithoutAlt {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        check_element(&self.metadata, node, ctx, |tag, node| {
            (tag == "img" && !has_jsx_attr(&node.opening.attrs, "alt"))
                .then(|| "<img> tag is missing alt attribute.".to_string())
        })
    }
}

declare_rule!(
    NoButtonWithoutLabel,
    id = "no-button-without-label",
    description = "Require visible text or an aria-label on <button> elements",
    category = Accessibility,
    severity = Error,
    examples = "// Bad\n<button onClick={close}><Icon /></button>\n\n// Good\n<button onClick={close} aria-label=\"Close\"><Icon /></button>"
);

impl Rule for NoButtonWithoutLabel {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        check_element(&self.metadata, node, ctx, |tag, node| {
            (tag == "button"
                && !has_jsx_attr(&node.opening.attrs, "aria-label")
                && !has_text_content(node))
            .then(|| "<button> has no visible text content or aria-label.".to_string())
        })
    }
}

/// Direct text children or literal expression children. Nested elements do
/// not count.
fn has_text_content(node: &JSXElement) -> bool {
    node.children.iter().any(|child| match child {
        JSXElementChild::JSXText(text) => !text.value.trim().is_empty(),
        JSXElementChild::JSXExprContainer(container) => match &container.expr {
            JSXExpr::Expr(expr) => match expr.as_ref() {
                swc_ecma_ast::Expr::Lit(lit) => literal_has_text(lit),
                _ => false,
            },
            JSXExpr::JSXEmptyExpr(_) => false,
        },
        _ => false,
    })
}

fn literal_has_text(lit: &Lit) -> bool {
    match lit {
        Lit::Str(s) => !s.value.to_string().trim().is_empty(),
        Lit::Null(_) => false,
        _ => true,
    }
}

declare_rule!(
    NoAnchorWithoutHref,
    id = "no-anchor-without-href",
    description = "Require an href attribute on <a> elements",
    category = Accessibility,
    severity = Error,
    examples = "// Bad\n<a onClick={open}>Docs</a>\n\n// Good\n<a href=\"/docs\">Docs</a>"
);

impl Rule for NoAnchorWithoutHref {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        check_element(&self.metadata, node, ctx, |tag, node| {
            (tag == "a" && !has_jsx_attr(&node.opening.attrs, "href"))
                .then(|| "<a> tag is missing href attribute.".to_string())
        })
    }
}

const INTERACTIVE_HANDLER_PREFIXES: &[&str] = &["onClick", "onKey", "onMouse"];

declare_rule!(
    NoMissingAriaRole,
    id = "no-missing-aria-role",
    description = "Require a role on <div> and <span> elements with pointer or key handlers",
    category = Accessibility,
    severity = Error,
    examples = "// Bad\n<div onClick={select}>Option</div>\n\n// Good\n<div role=\"button\" onClick={select}>Option</div>"
);

impl Rule for NoMissingAriaRole {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_node(&self, node: Node<'_>, ctx: &VisitorContext) -> Option<Diagnostic> {
        check_element(&self.metadata, node, ctx, |tag, node| {
            if tag != "div" && tag != "span" {
                return None;
            }
            let attrs = &node.opening.attrs;
            let interactive = jsx_attrs(attrs).filter_map(jsx_attr_name).any(|name| {
                INTERACTIVE_HANDLER_PREFIXES
                    .iter()
                    .any(|prefix| name.starts_with(prefix))
            });

            (interactive && !has_jsx_attr(attrs, "role"))
                .then(|| format!("Interactive <{}> should include a role attribute.", tag))
        })
    }
}
