//! Component detection and scope checks.
//!
//! These are naming and shape heuristics, not semantic analysis: a function is a
//! component when its name looks like one, and it is server-bound when its body calls
//! the server translation function anywhere.

use swc_ecma_ast::{
    BlockStmt, CallExpr, Callee, Class, Decl, Expr, Function, ImportSpecifier, Module,
    ModuleDecl, ModuleItem, ObjectPatProp, Pat, Stmt, VarDecl, VarDeclKind,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Per-function state for a component-like function on the traversal stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentContext {
    pub name: String,
    /// Body calls the server translation function.
    pub server_bound: bool,
    /// `t` is already bound in the function's own scope.
    pub binds_t: bool,
    /// A literal inside this component (or a component nested in it) was rewritten.
    pub modified: bool,
}

impl ComponentContext {
    pub fn new(name: impl Into<String>, server_bound: bool, binds_t: bool) -> Self {
        Self {
            name: name.into(),
            server_bound,
            binds_t,
            modified: false,
        }
    }
}

/// `Button`, `MyPage` or a hook-style `useThing`. Anonymous functions never qualify.
pub fn is_component_like(name: &str) -> bool {
    if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return true;
    }
    name.strip_prefix("use")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Finds a call to a function by bare name, stopping at the first match.
pub struct CallFinder<'a> {
    name: &'a str,
    found: bool,
}

impl Visit for CallFinder<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.found {
            return;
        }
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Ident(ident) = &**callee
            && &*ident.sym == self.name
        {
            self.found = true;
            return;
        }
        node.visit_children_with(self);
    }
}

/// Whether `node` contains a call to `name(...)`, awaited or not, at any depth.
pub fn contains_call<N>(node: &N, name: &str) -> bool
where
    N: for<'a> VisitWith<CallFinder<'a>>,
{
    let mut finder = CallFinder { name, found: false };
    node.visit_with(&mut finder);
    finder.found
}

/// Body calls the server translation function.
pub fn is_server_bound<N>(body: &N, server_fn: &str) -> bool
where
    N: for<'a> VisitWith<CallFinder<'a>>,
{
    contains_call(body, server_fn)
}

/// Whether a binding pattern introduces `name`.
pub fn pat_binds(pat: &Pat, name: &str) -> bool {
    match pat {
        Pat::Ident(binding) => &*binding.id.sym == name,
        Pat::Array(array) => array.elems.iter().flatten().any(|p| pat_binds(p, name)),
        Pat::Rest(rest) => pat_binds(&rest.arg, name),
        Pat::Object(object) => object.props.iter().any(|prop| match prop {
            ObjectPatProp::KeyValue(kv) => pat_binds(&kv.value, name),
            ObjectPatProp::Assign(assign) => &*assign.key.id.sym == name,
            ObjectPatProp::Rest(rest) => pat_binds(&rest.arg, name),
        }),
        Pat::Assign(assign) => pat_binds(&assign.left, name),
        Pat::Invalid(_) | Pat::Expr(_) => false,
    }
}

fn decl_binds(decl: &Decl, name: &str) -> bool {
    match decl {
        Decl::Var(var) => var_binds(var, name),
        Decl::Fn(f) => &*f.ident.sym == name,
        Decl::Class(c) => &*c.ident.sym == name,
        Decl::Using(using) => using.decls.iter().any(|d| pat_binds(&d.name, name)),
        _ => false,
    }
}

fn var_binds(var: &VarDecl, name: &str) -> bool {
    var.decls.iter().any(|d| pat_binds(&d.name, name))
}

/// Collects hoisted `var` bindings without entering nested functions or classes.
struct VarHoistFinder<'a> {
    name: &'a str,
    found: bool,
}

impl Visit for VarHoistFinder<'_> {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        if node.kind == VarDeclKind::Var && var_binds(node, self.name) {
            self.found = true;
        }
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &swc_ecma_ast::ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}
}

/// Whether a function scope binds `name` through its parameters, a top-level
/// declaration of its body, or a hoisted `var`.
pub fn scope_binds<'p>(
    params: impl IntoIterator<Item = &'p Pat>,
    body: Option<&BlockStmt>,
    name: &str,
) -> bool {
    if params.into_iter().any(|p| pat_binds(p, name)) {
        return true;
    }
    let Some(body) = body else {
        return false;
    };
    let top_level = body.stmts.iter().any(|stmt| match stmt {
        Stmt::Decl(decl) => decl_binds(decl, name),
        _ => false,
    });
    if top_level {
        return true;
    }
    let mut hoisted = VarHoistFinder { name, found: false };
    body.visit_with(&mut hoisted);
    hoisted.found
}

/// Whether the module scope binds `name`, through an import or a top-level declaration.
pub fn module_binds(module: &Module, name: &str) -> bool {
    module.body.iter().any(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
            import.specifiers.iter().any(|spec| match spec {
                ImportSpecifier::Named(named) => &*named.local.sym == name,
                ImportSpecifier::Default(default) => &*default.local.sym == name,
                ImportSpecifier::Namespace(ns) => &*ns.local.sym == name,
            })
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => decl_binds(&export.decl, name),
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl_binds(decl, name),
        _ => false,
    })
}
