//! Text classification: which literals hold user-facing target-script text.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use swc_ecma_ast::{Callee, Expr, MemberProp};

/// Name of the translation function at call sites.
pub const TRANSLATION_SYMBOL: &str = "t";

/// Syntactic kind of a candidate literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiteralKind {
    String,
    Template,
    JsxText,
    JsxAttribute,
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralKind::String => write!(f, "string"),
            LiteralKind::Template => write!(f, "template"),
            LiteralKind::JsxText => write!(f, "jsx-text"),
            LiteralKind::JsxAttribute => write!(f, "jsx-attribute"),
        }
    }
}

/// Target-script test applied to literal content.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    script: Regex,
}

impl TextClassifier {
    pub fn new(pattern: &str) -> Result<Self> {
        let script = Regex::new(pattern)
            .with_context(|| format!("Invalid target script pattern: \"{}\"", pattern))?;
        Ok(Self { script })
    }

    /// Trimmed content is non-empty and contains at least one target-script character.
    pub fn is_translatable(&self, text: &str) -> bool {
        let trimmed = text.trim();
        !trimmed.is_empty() && self.script.is_match(trimmed)
    }
}

/// `t(...)` or `anything.t(...)`.
pub fn is_translation_callee(callee: &Callee) -> bool {
    let Callee::Expr(expr) = callee else {
        return false;
    };
    match &**expr {
        Expr::Ident(ident) => &*ident.sym == TRANSLATION_SYMBOL,
        Expr::Member(member) => {
            matches!(&member.prop, MemberProp::Ident(prop) if &*prop.sym == TRANSLATION_SYMBOL)
        }
        _ => false,
    }
}

/// Calls whose string arguments name modules rather than text: `import("x")`, `require("x")`.
pub fn is_module_loader_callee(callee: &Callee) -> bool {
    match callee {
        Callee::Import(_) => true,
        Callee::Expr(expr) => matches!(&**expr, Expr::Ident(ident) if &*ident.sym == "require"),
        Callee::Super(_) => false,
    }
}
