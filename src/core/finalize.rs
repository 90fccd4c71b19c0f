//! Module-level post-conditions: the client directive and translation imports.

use swc_common::{DUMMY_SP, Spanned};
use swc_ecma_ast::{
    Expr, ExprStmt, Ident, ImportDecl, ImportNamedSpecifier, ImportPhase, ImportSpecifier, Lit,
    Module, ModuleDecl, ModuleExportName, ModuleItem, Stmt,
};

use crate::core::{backend::SyntaxTree, rewrite::quote_js, rewrite::string_lit};

pub const CLIENT_DIRECTIVE: &str = "use client";

/// What a modified module must contain once its components are injected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizePlan {
    pub directive: Option<String>,
    /// `(symbol, module)` pairs to import by name.
    pub imports: Vec<(String, String)>,
}

/// Apply `plan` to the tree. Returns a short description of each change made.
pub fn finalize_module(tree: &mut SyntaxTree, plan: &FinalizePlan) -> Vec<String> {
    let mut applied = Vec::new();
    if let Some(directive) = &plan.directive
        && ensure_directive(tree, directive)
    {
        applied.push(format!("directive \"{}\"", directive));
    }
    for (symbol, source) in &plan.imports {
        if ensure_named_import(tree, symbol, source) {
            applied.push(format!("import {} from \"{}\"", symbol, source));
        }
    }
    applied
}

fn directive_value(item: &ModuleItem) -> Option<Option<&str>> {
    match item {
        ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => match &**expr {
            Expr::Lit(Lit::Str(s)) => Some(s.value.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Number of leading directive statements.
fn directive_count(module: &Module) -> usize {
    module
        .body
        .iter()
        .take_while(|item| directive_value(item).is_some())
        .count()
}

/// Byte offset of the first item that exists in the original text.
fn first_item_offset(tree: &SyntaxTree) -> usize {
    tree.module
        .body
        .iter()
        .map(|item| item.span())
        .find(|span| !span.is_dummy())
        .map(|span| tree.source.offset(span.lo))
        .unwrap_or(0)
}

/// Ensure a leading `"<value>"` directive. Existing directives are left in place.
pub fn ensure_directive(tree: &mut SyntaxTree, value: &str) -> bool {
    let count = directive_count(&tree.module);
    if tree.module.body[..count]
        .iter()
        .any(|item| directive_value(item).flatten() == Some(value))
    {
        return false;
    }

    let pos = first_item_offset(tree);
    tree.edits.insert(pos, format!("{};\n", quote_js(value)));
    tree.module.body.insert(
        0,
        ModuleItem::Stmt(Stmt::Expr(ExprStmt {
            span: DUMMY_SP,
            expr: Box::new(Expr::Lit(Lit::Str(string_lit(value, DUMMY_SP)))),
        })),
    );
    true
}

fn specifier_name(spec: &ImportNamedSpecifier) -> Option<&str> {
    match &spec.imported {
        None => Some(&*spec.local.sym),
        Some(ModuleExportName::Ident(ident)) => Some(&*ident.sym),
        Some(ModuleExportName::Str(s)) => s.value.as_str(),
    }
}

/// Ensure `import { symbol } from "source"`, extending an existing import from
/// `source` when there is one. Type-only and namespace imports are never extended.
pub fn ensure_named_import(tree: &mut SyntaxTree, symbol: &str, source: &str) -> bool {
    let imports: Vec<usize> = tree
        .module
        .body
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import))
                if !import.type_only && import.src.value.as_str() == Some(source) =>
            {
                Some(i)
            }
            _ => None,
        })
        .collect();

    let already_imported = imports.iter().any(|&i| {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &tree.module.body[i] else {
            return false;
        };
        import.specifiers.iter().any(|spec| match spec {
            ImportSpecifier::Named(named) => {
                !named.is_type_only && specifier_name(named) == Some(symbol)
            }
            _ => false,
        })
    });
    if already_imported {
        return false;
    }

    let new_specifier = ImportSpecifier::Named(ImportNamedSpecifier {
        span: DUMMY_SP,
        local: Ident::new_no_ctxt(symbol.into(), DUMMY_SP),
        imported: None,
        is_type_only: false,
    });

    for &i in &imports {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &mut tree.module.body[i] else {
            continue;
        };
        if import
            .specifiers
            .iter()
            .any(|s| matches!(s, ImportSpecifier::Namespace(_)))
        {
            continue;
        }

        let last_named = import.specifiers.iter().rev().find_map(|s| match s {
            ImportSpecifier::Named(named) => Some(named.span),
            _ => None,
        });
        let default = import.specifiers.iter().find_map(|s| match s {
            ImportSpecifier::Default(default) => Some(default.span),
            _ => None,
        });

        let edit = match (last_named, default) {
            (Some(span), _) => Some((span.hi, format!(", {}", symbol))),
            (None, Some(span)) => Some((span.hi, format!(", {{ {} }}", symbol))),
            (None, None) => None,
        };
        if let Some((hi, text)) = edit {
            let pos = tree.source.offset(hi);
            tree.edits.insert(pos, text);
            import.specifiers.push(new_specifier);
            return true;
        }
    }

    let statement = format!("import {{ {} }} from {};", symbol, quote_js(source));
    let count = directive_count(&tree.module);
    let last_directive = tree.module.body[..count]
        .iter()
        .map(|item| item.span())
        .filter(|span| !span.is_dummy())
        .last();

    match last_directive {
        Some(span) => {
            let pos = tree.source.offset(span.hi);
            tree.edits.insert(pos, format!("\n{}", statement));
        }
        None => {
            let pos = first_item_offset(tree);
            tree.edits.insert(pos, format!("{}\n", statement));
        }
    }

    tree.module.body.insert(
        count,
        ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
            span: DUMMY_SP,
            specifiers: vec![new_specifier],
            src: Box::new(string_lit(source, DUMMY_SP)),
            type_only: false,
            with: None,
            phase: ImportPhase::Evaluation,
        })),
    );
    true
}
