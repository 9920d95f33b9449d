//! Shared helper functions for rule implementations.

use swc_ecma_ast::{
    Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElementName, JSXExpr, JSXObject,
};

use crate::diagnostic::Diagnostic;
use crate::rules::RuleMetadata;
use crate::visitor::VisitorContext;

/// Builds a diagnostic for `metadata` at `line`, with a snippet around it.
pub fn report(
    metadata: &RuleMetadata,
    ctx: &VisitorContext,
    line: usize,
    message: impl Into<String>,
) -> Diagnostic {
    Diagnostic::new(
        metadata.category,
        metadata.id,
        metadata.severity,
        ctx.file_path(),
        line,
        message,
    )
    .with_snippet(ctx.snippet(line))
}

/// Renders `div`, `Foo.Bar` and `svg:path` style element names.
pub fn jsx_element_name(name: &JSXElementName) -> String {
    match name {
        JSXElementName::Ident(ident) => ident.sym.to_string(),
        JSXElementName::JSXMemberExpr(member) => {
            format!("{}.{}", jsx_object_name(&member.obj), member.prop.sym)
        }
        JSXElementName::JSXNamespacedName(ns) => format!("{}:{}", ns.ns.sym, ns.name.sym),
    }
}

fn jsx_object_name(obj: &JSXObject) -> String {
    match obj {
        JSXObject::Ident(ident) => ident.sym.to_string(),
        JSXObject::JSXMemberExpr(member) => {
            format!("{}.{}", jsx_object_name(&member.obj), member.prop.sym)
        }
    }
}

/// Plain (non-namespaced) attribute name.
pub fn jsx_attr_name(attr: &JSXAttr) -> Option<&str> {
    match &attr.name {
        JSXAttrName::Ident(ident) => Some(&*ident.sym),
        JSXAttrName::JSXNamespacedName(_) => None,
    }
}

pub fn jsx_attrs(attrs: &[JSXAttrOrSpread]) -> impl Iterator<Item = &JSXAttr> {
    attrs.iter().filter_map(|attr| match attr {
        JSXAttrOrSpread::JSXAttr(attr) => Some(attr),
        JSXAttrOrSpread::SpreadElement(_) => None,
    })
}

pub fn find_jsx_attr<'a>(attrs: &'a [JSXAttrOrSpread], name: &str) -> Option<&'a JSXAttr> {
    jsx_attrs(attrs).find(|attr| jsx_attr_name(attr) == Some(name))
}

pub fn has_jsx_attr(attrs: &[JSXAttrOrSpread], name: &str) -> bool {
    find_jsx_attr(attrs, name).is_some()
}

/// The identifier in `attr={name}`, if the value is exactly that.
pub fn attr_identifier_value(attr: &JSXAttr) -> Option<&str> {
    let Some(JSXAttrValue::JSXExprContainer(container)) = &attr.value else {
        return None;
    };
    match &container.expr {
        JSXExpr::Expr(expr) => match expr.as_ref() {
            Expr::Ident(ident) => Some(&*ident.sym),
            _ => None,
        },
        JSXExpr::JSXEmptyExpr(_) => None,
    }
}

/// Component names start with an uppercase letter.
pub fn is_capitalized(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
