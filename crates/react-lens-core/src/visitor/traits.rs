//! AstVisitor trait for uniform AST traversal.

use swc_ecma_ast::{
    CallExpr, ExportDefaultDecl, FnDecl, Ident, IdentName, ImportDecl, JSXAttr, JSXElement,
    OptCall, SpreadElement, Str, VarDeclarator,
};

use super::context::VisitorContext;

/// Callbacks invoked by [`walk_ast`](super::walk_ast) for every node of the
/// matching kind, in document order. The walk always descends into children
/// after the callback returns.
pub trait AstVisitor {
    fn visit_call_expr(&mut self, _node: &CallExpr, _ctx: &VisitorContext) {}

    /// The call in an optional chain, as in `fn?.()` or `obj.method?.()`.
    fn visit_opt_call(&mut self, _node: &OptCall, _ctx: &VisitorContext) {}

    fn visit_fn_decl(&mut self, _node: &FnDecl, _ctx: &VisitorContext) {}

    /// `export default function Name() {}` and friends.
    fn visit_export_default_decl(&mut self, _node: &ExportDefaultDecl, _ctx: &VisitorContext) {}

    fn visit_var_declarator(&mut self, _node: &VarDeclarator, _ctx: &VisitorContext) {}

    fn visit_import_decl(&mut self, _node: &ImportDecl, _ctx: &VisitorContext) {}

    fn visit_jsx_element(&mut self, _node: &JSXElement, _ctx: &VisitorContext) {}

    fn visit_jsx_attr(&mut self, _node: &JSXAttr, _ctx: &VisitorContext) {}

    /// `{...expr}` in a JSX attribute list.
    fn visit_jsx_spread_attr(&mut self, _node: &SpreadElement, _ctx: &VisitorContext) {}

    fn visit_ident(&mut self, _node: &Ident, _ctx: &VisitorContext) {}

    /// Property and attribute names (`a.name`, `{ name: 1 }`, `<a name="">`).
    fn visit_ident_name(&mut self, _node: &IdentName, _ctx: &VisitorContext) {}

    fn visit_str(&mut self, _node: &Str, _ctx: &VisitorContext) {}
}
