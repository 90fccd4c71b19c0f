//! Replacement nodes (and their source text) for translatable literals.
//!
//! Each rewrite yields both the new tree node and the text that replaces the original
//! node's byte range. Replacement nodes keep the span of the node they replace.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use swc_common::{DUMMY_SP, Span, SyntaxContext};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ExprOrSpread, Ident, IdentName, JSXExpr, JSXExprContainer,
    KeyValueProp, Lit, MemberProp, ObjectLit, Prop, PropName, PropOrSpread, Str,
};

use crate::core::{classify::LiteralKind, classify::TRANSLATION_SYMBOL, context::SourceLocation};

/// One literal that was (or, in a dry run, would be) wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapChange {
    pub location: SourceLocation,
    pub kind: LiteralKind,
    pub original: String,
    pub replacement: String,
}

/// Render `text` as a double-quoted JS string literal.
pub fn quote_js(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

pub fn string_lit(text: &str, span: Span) -> Str {
    Str {
        span,
        value: text.to_string().into(),
        raw: None,
    }
}

/// `t(arg0, arg1, ...)`
pub fn translation_call(args: Vec<Expr>, span: Span) -> Expr {
    Expr::Call(CallExpr {
        span,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(Expr::Ident(Ident::new_no_ctxt(
            TRANSLATION_SYMBOL.into(),
            DUMMY_SP,
        )))),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
    })
}

/// `"안녕"` in expression position becomes `t("안녕")`, keeping the literal's own quoting.
pub fn wrap_string(lit: Str, raw: &str) -> (Expr, String) {
    let span = lit.span;
    let text = format!("{}({})", TRANSLATION_SYMBOL, raw);
    (translation_call(vec![Expr::Lit(Lit::Str(lit))], span), text)
}

/// `title="안녕"` becomes `title={t("안녕")}`. Attribute strings have no escapes, so the
/// value is re-quoted rather than copied.
pub fn wrap_attribute(lit: Str, value: &str) -> (JSXExprContainer, String) {
    let span = lit.span;
    let text = format!("{{{}({})}}", TRANSLATION_SYMBOL, quote_js(value));
    let container = JSXExprContainer {
        span,
        expr: JSXExpr::Expr(Box::new(translation_call(
            vec![Expr::Lit(Lit::Str(lit))],
            span,
        ))),
    };
    (container, text)
}

/// JSX text becomes `{t("trimmed text")}`. The caller replaces only the trimmed range,
/// so surrounding whitespace and newlines stay in place.
pub fn wrap_jsx_text(trimmed: &str, span: Span) -> (JSXExprContainer, String) {
    let text = format!("{{{}({})}}", TRANSLATION_SYMBOL, quote_js(trimmed));
    let container = JSXExprContainer {
        span,
        expr: JSXExpr::Expr(Box::new(translation_call(
            vec![Expr::Lit(Lit::Str(string_lit(trimmed, span)))],
            span,
        ))),
    };
    (container, text)
}

/// Placeholder name derived from an interpolated expression's shape.
///
/// `name` keeps its identifier, `user.profile.name` flattens to `user_profile_name`,
/// anything else is positional (`expr0`, `expr1`, ...).
pub fn placeholder_name(expr: &Expr, index: usize) -> String {
    match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        Expr::Member(_) => {
            let parts = member_chain(expr);
            if parts.is_empty() {
                positional_name(index)
            } else {
                parts.join("_")
            }
        }
        Expr::Paren(paren) => placeholder_name(&paren.expr, index),
        _ => positional_name(index),
    }
}

fn positional_name(index: usize) -> String {
    format!("expr{}", index)
}

/// Identifier segments of a member chain, root first. Computed segments are skipped.
fn member_chain(expr: &Expr) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = expr;
    loop {
        match current {
            Expr::Member(member) => {
                if let MemberProp::Ident(prop) = &member.prop {
                    parts.push(prop.sym.to_string());
                }
                current = &member.obj;
            }
            Expr::Ident(ident) => {
                parts.push(ident.sym.to_string());
                break;
            }
            _ => break,
        }
    }
    parts.reverse();
    parts
}

/// Assigns placeholder names within one template, keeping them unique.
///
/// The same expression (by source text) always reuses its name. A different expression
/// whose derived name is taken falls back to its positional name, then to a numbered
/// variant of it.
#[derive(Debug, Default)]
pub struct PlaceholderNames {
    by_source: HashMap<String, String>,
    taken: Vec<String>,
}

impl PlaceholderNames {
    pub fn assign(&mut self, candidate: String, index: usize, source: &str) -> (String, bool) {
        if let Some(existing) = self.by_source.get(source) {
            return (existing.clone(), false);
        }

        let name = if !self.is_taken(&candidate) {
            candidate
        } else {
            let positional = positional_name(index);
            let mut suffix = 2;
            let mut name = positional.clone();
            while self.is_taken(&name) {
                name = format!("{}_{}", positional, suffix);
                suffix += 1;
            }
            name
        };

        self.taken.push(name.clone());
        self.by_source.insert(source.to_string(), name.clone());
        (name, true)
    }

    fn is_taken(&self, name: &str) -> bool {
        self.taken.iter().any(|n| n == name)
    }
}

/// One interpolation of a template being rewritten.
pub struct Interpolation {
    pub expr: Box<Expr>,
    /// Rendered source text of the expression (with any nested rewrites applied).
    pub source: String,
}

/// Rewrite a template literal from its cooked static parts and its interpolations.
///
/// `` `안녕 ${name}` `` becomes `t("안녕 {{name}}", { name: name })`; a template with no
/// interpolations becomes a plain `t("...")`.
pub fn wrap_template(
    quasis: &[String],
    interpolations: Vec<Interpolation>,
    span: Span,
) -> (Expr, String) {
    let mut names = PlaceholderNames::default();
    let mut message = String::new();
    let mut props: Vec<(String, Interpolation)> = Vec::new();

    let mut interpolations = interpolations.into_iter();
    for (index, quasi) in quasis.iter().enumerate() {
        message.push_str(quasi);
        let Some(interpolation) = interpolations.next() else {
            continue;
        };
        let candidate = placeholder_name(&interpolation.expr, index);
        let (name, is_new) = names.assign(candidate, index, &interpolation.source);
        message.push_str("{{");
        message.push_str(&name);
        message.push_str("}}");
        if is_new {
            props.push((name, interpolation));
        }
    }

    let quoted = quote_js(&message);
    let message_lit = Expr::Lit(Lit::Str(string_lit(&message, span)));

    if props.is_empty() {
        let text = format!("{}({})", TRANSLATION_SYMBOL, quoted);
        return (translation_call(vec![message_lit], span), text);
    }

    let rendered: Vec<String> = props
        .iter()
        .map(|(name, interpolation)| format!("{}: {}", name, interpolation.source))
        .collect();
    let text = format!(
        "{}({}, {{ {} }})",
        TRANSLATION_SYMBOL,
        quoted,
        rendered.join(", ")
    );

    let options = Expr::Object(ObjectLit {
        span,
        props: props
            .into_iter()
            .map(|(name, interpolation)| {
                PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(name.into(), DUMMY_SP)),
                    value: interpolation.expr,
                })))
            })
            .collect(),
    });

    (translation_call(vec![message_lit, options], span), text)
}
