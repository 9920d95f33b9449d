//! Visitor pattern for AST traversal.
//!
//! Provides a uniform way to traverse AST nodes with context information.
//! The walk is a full pre-order traversal: every node is visited once, in
//! document order, and children are always visited.

mod context;
mod traits;

pub use context::{VisitorContext, slice_snippet};
pub use traits::AstVisitor;

use swc_ecma_ast::{BlockStmt, JSXAttrOrSpread, Module};
use swc_ecma_visit::{Visit, VisitWith};

struct Walker<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
}

impl<V: AstVisitor> Visit for Walker<'_, V> {
    fn visit_call_expr(&mut self, node: &swc_ecma_ast::CallExpr) {
        self.visitor.visit_call_expr(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_opt_call(&mut self, node: &swc_ecma_ast::OptCall) {
        self.visitor.visit_opt_call(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &swc_ecma_ast::FnDecl) {
        self.visitor.visit_fn_decl(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_export_default_decl(&mut self, node: &swc_ecma_ast::ExportDefaultDecl) {
        self.visitor.visit_export_default_decl(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &swc_ecma_ast::VarDeclarator) {
        self.visitor.visit_var_declarator(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, node: &swc_ecma_ast::ImportDecl) {
        self.visitor.visit_import_decl(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_jsx_element(&mut self, node: &swc_ecma_ast::JSXElement) {
        self.visitor.visit_jsx_element(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_jsx_attr(&mut self, node: &swc_ecma_ast::JSXAttr) {
        self.visitor.visit_jsx_attr(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_jsx_attr_or_spread(&mut self, node: &JSXAttrOrSpread) {
        if let JSXAttrOrSpread::SpreadElement(spread) = node {
            self.visitor.visit_jsx_spread_attr(spread, self.ctx);
        }
        node.visit_children_with(self);
    }

    fn visit_ident(&mut self, node: &swc_ecma_ast::Ident) {
        self.visitor.visit_ident(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_ident_name(&mut self, node: &swc_ecma_ast::IdentName) {
        self.visitor.visit_ident_name(node, self.ctx);
        node.visit_children_with(self);
    }

    fn visit_str(&mut self, node: &swc_ecma_ast::Str) {
        self.visitor.visit_str(node, self.ctx);
        node.visit_children_with(self);
    }
}

pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker { visitor, ctx };
    module.visit_with(&mut walker);
}

/// Walks a single block, such as a function body, instead of a whole module.
pub fn walk_block<V: AstVisitor>(block: &BlockStmt, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker { visitor, ctx };
    block.visit_with(&mut walker);
}
