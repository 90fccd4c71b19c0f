//! Translation-binding injection into component bodies.

use anyhow::Result;
use swc_common::{DUMMY_SP, Span, Spanned, SyntaxContext};
use swc_ecma_ast::{
    ArrowExpr, AssignPatProp, AwaitExpr, BindingIdent, BlockStmt, BlockStmtOrExpr, CallExpr,
    Callee, Decl, Expr, Function, Ident, Invalid, ObjectPat, ObjectPatProp, Pat, ReturnStmt, Stmt,
    VarDecl, VarDeclKind, VarDeclarator,
};

use crate::config::Mode;
use crate::core::{
    backend::SourceText, classify::TRANSLATION_SYMBOL, detect::contains_call, edits::EditLog,
};

/// How a component obtains `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `const { t } = useTranslation();`
    Client,
    /// `const { t } = await getServerTranslation();` in an async function.
    Server,
}

/// Explicit modes win; otherwise a server-bound component uses the server strategy.
pub fn choose_strategy(mode: Option<Mode>, server_bound: bool) -> Strategy {
    match mode {
        Some(Mode::Server) => Strategy::Server,
        Some(Mode::Client) => Strategy::Client,
        Some(Mode::Auto) | None if server_bound => Strategy::Server,
        Some(Mode::Auto) | None => Strategy::Client,
    }
}

/// A component-like function being injected into.
pub enum ComponentFn<'a> {
    Function(&'a mut Function),
    Arrow(&'a mut ArrowExpr),
}

impl ComponentFn<'_> {
    fn span(&self) -> Span {
        match self {
            ComponentFn::Function(f) => f.span,
            ComponentFn::Arrow(a) => a.span,
        }
    }

    fn is_async(&self) -> bool {
        match self {
            ComponentFn::Function(f) => f.is_async,
            ComponentFn::Arrow(a) => a.is_async,
        }
    }

    fn set_async(&mut self) {
        match self {
            ComponentFn::Function(f) => f.is_async = true,
            ComponentFn::Arrow(a) => a.is_async = true,
        }
    }

    fn block_mut(&mut self) -> Option<&mut BlockStmt> {
        match self {
            ComponentFn::Function(f) => f.body.as_mut(),
            ComponentFn::Arrow(a) => match &mut *a.body {
                BlockStmtOrExpr::BlockStmt(block) => Some(block),
                BlockStmtOrExpr::Expr(_) => None,
            },
        }
    }
}

/// Names and destination of one injection pass.
pub struct Injector<'a> {
    pub source: &'a SourceText,
    pub edits: &'a mut EditLog,
    pub client_hook: &'a str,
    pub server_fn: &'a str,
}

impl Injector<'_> {
    /// Inject a translation binding with `strategy`. Returns whether anything was injected.
    pub fn inject(&mut self, target: ComponentFn<'_>, strategy: Strategy) -> Result<bool> {
        match strategy {
            Strategy::Client => Ok(self.inject_client(target)),
            Strategy::Server => self.inject_server(target),
        }
    }

    /// Block bodies only; a body that already calls the hook is left alone.
    fn inject_client(&mut self, mut target: ComponentFn<'_>) -> bool {
        let Some(block) = target.block_mut() else {
            return false;
        };
        if contains_call(&*block, self.client_hook) {
            return false;
        }

        let span = block.span;
        let pos = self.source.offset(span.lo) + 1;
        self.edits.insert(
            pos,
            format!(" const {{ {} }} = {}();", TRANSLATION_SYMBOL, self.client_hook),
        );
        block.stmts.insert(0, binding_stmt(call(self.client_hook), span));
        true
    }

    /// Forces the function async. A concise arrow body becomes a block that returns the
    /// original expression.
    fn inject_server(&mut self, mut target: ComponentFn<'_>) -> Result<bool> {
        if !target.is_async() {
            let pos = self.source.offset(target.span().lo);
            self.edits.insert(pos, "async ");
        }
        target.set_async();

        let acquire = Expr::Await(AwaitExpr {
            span: DUMMY_SP,
            arg: Box::new(call(self.server_fn)),
        });
        let declaration = format!(
            "const {{ {} }} = await {}();",
            TRANSLATION_SYMBOL, self.server_fn
        );

        if let Some(block) = target.block_mut() {
            let span = block.span;
            let pos = self.source.offset(span.lo) + 1;
            self.edits.insert(pos, format!(" {}", declaration));
            block.stmts.insert(0, binding_stmt(acquire, span));
            return Ok(true);
        }

        let ComponentFn::Arrow(arrow) = target else {
            return Ok(false);
        };
        let BlockStmtOrExpr::Expr(expr) = &mut *arrow.body else {
            return Ok(false);
        };

        let span = expr.span();
        let range = self.source.range(span);
        let rendered = self.edits.render_range(&self.source.text, range.clone())?;
        self.edits.replace(
            range,
            format!("{{ {} return {}; }}", declaration, rendered),
        );

        let original = std::mem::replace(&mut **expr, Expr::Invalid(Invalid { span }));
        *arrow.body = BlockStmtOrExpr::BlockStmt(BlockStmt {
            span,
            ctxt: SyntaxContext::empty(),
            stmts: vec![
                binding_stmt(acquire, span),
                Stmt::Return(ReturnStmt {
                    span,
                    arg: Some(Box::new(original)),
                }),
            ],
        });
        Ok(true)
    }
}

fn call(name: &str) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(Expr::Ident(Ident::new_no_ctxt(
            name.into(),
            DUMMY_SP,
        )))),
        args: Vec::new(),
        type_args: None,
    })
}

/// `const { t } = <init>;`
fn binding_stmt(init: Expr, span: Span) -> Stmt {
    let key = BindingIdent::from(Ident::new_no_ctxt(TRANSLATION_SYMBOL.into(), DUMMY_SP));
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span,
            name: Pat::Object(ObjectPat {
                span,
                props: vec![ObjectPatProp::Assign(AssignPatProp {
                    span,
                    key,
                    value: None,
                })],
                optional: false,
                type_ann: None,
            }),
            init: Some(Box::new(init)),
            definite: false,
        }],
    })))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{ModuleItem, Stmt};

    use crate::core::backend::{SourceBackend, SyntaxTree, TypescriptBackend};
    use crate::core::detect::scope_binds;
    use crate::core::inject::*;

    fn parse(code: &str) -> SyntaxTree {
        TypescriptBackend.parse("test.tsx", code.to_string()).unwrap()
    }

    fn inject_first(tree: &mut SyntaxTree, strategy: Strategy) -> bool {
        let SyntaxTree {
            module,
            source,
            edits,
        } = tree;
        let mut injector = Injector {
            source,
            edits,
            client_hook: "useTranslation",
            server_fn: "getServerTranslation",
        };
        let target = match &mut module.body[0] {
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(f))) => ComponentFn::Function(&mut f.function),
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => {
                match var.decls[0].init.as_deref_mut() {
                    Some(Expr::Arrow(arrow)) => ComponentFn::Arrow(arrow),
                    _ => panic!("expected arrow initializer"),
                }
            }
            other => panic!("unexpected item {:?}", other),
        };
        injector.inject(target, strategy).unwrap()
    }

    fn print(tree: SyntaxTree) -> String {
        TypescriptBackend.print(tree).unwrap()
    }

    #[test]
    fn test_choose_strategy() {
        assert_eq!(choose_strategy(None, false), Strategy::Client);
        assert_eq!(choose_strategy(None, true), Strategy::Server);
        assert_eq!(choose_strategy(Some(Mode::Server), false), Strategy::Server);
        assert_eq!(choose_strategy(Some(Mode::Client), true), Strategy::Client);
        assert_eq!(choose_strategy(Some(Mode::Auto), true), Strategy::Server);
    }

    #[test]
    fn test_client_injection_into_function() {
        let mut tree = parse("function Greeting() {\n  return null;\n}\n");
        assert!(inject_first(&mut tree, Strategy::Client));

        let ModuleItem::Stmt(Stmt::Decl(Decl::Fn(f))) = &tree.module.body[0] else {
            panic!("expected function");
        };
        let body = f.function.body.as_ref().unwrap();
        assert_eq!(body.stmts.len(), 2);
        assert!(scope_binds(std::iter::empty(), Some(body), "t"));

        assert_eq!(
            print(tree),
            "function Greeting() { const { t } = useTranslation();\n  return null;\n}\n"
        );
    }

    #[test]
    fn test_client_skips_body_with_hook_call() {
        let mut tree = parse("function A() { const x = useTranslation(); return x; }");
        assert!(!inject_first(&mut tree, Strategy::Client));
        assert!(!tree.is_modified());
    }

    #[test]
    fn test_client_skips_concise_arrow() {
        let mut tree = parse("const A = () => null;");
        assert!(!inject_first(&mut tree, Strategy::Client));
        assert_eq!(print(tree), "const A = () => null;");
    }

    #[test]
    fn test_server_injection_makes_function_async() {
        let mut tree = parse("function Page() { return null; }");
        assert!(inject_first(&mut tree, Strategy::Server));
        assert_eq!(
            print(tree),
            "async function Page() { const { t } = await getServerTranslation(); return null; }"
        );
    }

    #[test]
    fn test_server_injection_keeps_existing_async() {
        let mut tree = parse("const Page = async () => { return null; };");
        assert!(inject_first(&mut tree, Strategy::Server));
        assert_eq!(
            print(tree),
            "const Page = async () => { const { t } = await getServerTranslation(); return null; };"
        );
    }

    #[test]
    fn test_server_injection_converts_concise_body() {
        let mut tree = parse("const Page = () => (<p>x</p>);");
        assert!(inject_first(&mut tree, Strategy::Server));

        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &tree.module.body[0] else {
            panic!("expected variable");
        };
        let Some(Expr::Arrow(arrow)) = var.decls[0].init.as_deref() else {
            panic!("expected arrow");
        };
        assert!(arrow.is_async);
        assert!(matches!(&*arrow.body, BlockStmtOrExpr::BlockStmt(b) if b.stmts.len() == 2));

        assert_eq!(
            print(tree),
            "const Page = async () => { const { t } = await getServerTranslation(); return (<p>x</p>); };"
        );
    }
}
