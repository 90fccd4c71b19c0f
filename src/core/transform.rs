//! The tree-rewrite traversal.
//!
//! One pass over a module wraps every translatable literal that sits inside a
//! component-like function and injects a translation binding into each outermost
//! component that needs one. Literals outside any component are reported, not touched.

use anyhow::Result;
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, CatchClause, DefaultDecl, ExportDefaultDecl,
    Expr, FnDecl, Function, JSXAttr, JSXAttrValue, JSXElement, JSXElementChild, JSXExprContainer,
    JSXText, KeyValueProp, Lit, MemberProp, ModuleDecl, ModuleItem, Pat, PropName, Stmt, Str,
    TaggedTpl, TsEnumDecl, TsType, VarDeclarator,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::config::Mode;
use crate::core::{
    backend::{SourceText, SyntaxTree},
    classify::{
        LiteralKind, TRANSLATION_SYMBOL, TextClassifier, is_module_loader_callee,
        is_translation_callee,
    },
    context::SourceContext,
    detect::{
        ComponentContext, is_component_like, is_server_bound, module_binds, pat_binds,
        scope_binds,
    },
    edits::EditLog,
    ignore::IgnoreMarkers,
    inject::{ComponentFn, Injector, Strategy, choose_strategy},
    rewrite::{
        Interpolation, WrapChange, wrap_attribute, wrap_jsx_text, wrap_string, wrap_template,
    },
};

/// Per-file inputs of one traversal.
pub struct TransformOptions<'a> {
    pub classifier: &'a TextClassifier,
    pub ignore_marker: &'a str,
    pub client_hook: &'a str,
    pub server_fn: &'a str,
    /// Effective mode for this file; `auto` has already been resolved by the caller
    /// when a classification was available.
    pub mode: Option<Mode>,
}

/// Translatable text left in place because no component encloses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrappedText {
    pub context: SourceContext,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct TransformOutcome {
    /// At least one literal was rewritten.
    pub modified: bool,
    pub client_injected: bool,
    pub server_injected: bool,
    pub changes: Vec<WrapChange>,
    pub unwrapped: Vec<UnwrappedText>,
    /// Components that received a translation binding.
    pub injected_components: Vec<String>,
}

/// Rewrite `tree` in place, mirroring every change into its edit log.
pub fn transform_tree(
    tree: &mut SyntaxTree,
    options: &TransformOptions<'_>,
) -> Result<TransformOutcome> {
    let SyntaxTree {
        module,
        source,
        edits,
    } = tree;
    let source: &SourceText = source;

    let mut transformer = Transformer {
        source,
        edits,
        markers: IgnoreMarkers::new(source, options.ignore_marker),
        options,
        frames: Vec::new(),
        parents: Vec::new(),
        scopes: Vec::new(),
        module_binds_t: module_binds(module, TRANSLATION_SYMBOL),
        outcome: TransformOutcome::default(),
        error: None,
    };
    module.visit_mut_with(&mut transformer);

    match transformer.error {
        Some(err) => Err(err.context(format!("Failed to transform {}", source.path))),
        None => Ok(transformer.outcome),
    }
}

struct Transformer<'a> {
    source: &'a SourceText,
    edits: &'a mut EditLog,
    markers: IgnoreMarkers<'a>,
    options: &'a TransformOptions<'a>,
    /// Component-like functions enclosing the current node, outermost first.
    frames: Vec<ComponentContext>,
    /// Start positions of the statement-like ancestors, innermost last.
    parents: Vec<BytePos>,
    /// Whether each enclosing function, block or catch scope binds `t`.
    scopes: Vec<bool>,
    module_binds_t: bool,
    outcome: TransformOutcome,
    error: Option<anyhow::Error>,
}

impl Transformer<'_> {
    fn fail(&mut self, err: anyhow::Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Whether a translatable literal at `span` may be rewritten.
    fn accept(&mut self, span: Span, text: &str) -> bool {
        if self.error.is_some()
            || self
                .markers
                .is_ignored(span.lo, self.parents.last().copied())
        {
            return false;
        }
        if self.frames.is_empty() {
            self.outcome.unwrapped.push(UnwrappedText {
                context: self.source.context(span.lo),
                text: text.trim().to_string(),
            });
            return false;
        }
        true
    }

    /// Record a rewrite. The outermost component owes a binding unless `t` is already
    /// in scope.
    fn wrapped(&mut self, span: Span, kind: LiteralKind, original: &str, replacement: String) {
        self.edits.replace(self.source.range(span), replacement.clone());
        self.outcome.changes.push(WrapChange {
            location: self.source.location(span.lo),
            kind,
            original: original.to_string(),
            replacement,
        });
        self.outcome.modified = true;

        if self.module_binds_t || self.scopes.iter().any(|binds| *binds) {
            return;
        }
        if let Some(outermost) = self.frames.first_mut() {
            outermost.modified = true;
        }
    }

    fn rewrite_string(&mut self, expr: &mut Expr) {
        let Expr::Lit(Lit::Str(lit)) = expr else {
            return;
        };
        let Some(value) = lit.value.as_str() else {
            return;
        };
        if !self.options.classifier.is_translatable(value) {
            return;
        }
        let source = self.source;
        let raw = source.slice(lit.span);
        if raw.is_empty() || !self.accept(lit.span, value) {
            return;
        }

        let span = lit.span;
        let (replacement, text) = wrap_string(lit.clone(), raw);
        self.wrapped(span, LiteralKind::String, raw, text);
        *expr = replacement;
    }

    /// Runs after the template's own interpolations were visited, so nested rewrites
    /// are folded into the rendered expression text.
    fn rewrite_template(&mut self, expr: &mut Expr) {
        let Expr::Tpl(tpl) = expr else {
            return;
        };
        let quasis: Vec<String> = tpl
            .quasis
            .iter()
            .map(|q| {
                q.cooked
                    .as_ref()
                    .and_then(|cooked| cooked.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| q.raw.to_string())
            })
            .collect();
        if !self.options.classifier.is_translatable(&quasis.concat()) {
            return;
        }
        let source = self.source;
        let original = source.slice(tpl.span);
        if original.is_empty() || !self.accept(tpl.span, original) {
            return;
        }

        let mut rendered = Vec::with_capacity(tpl.exprs.len());
        for e in &tpl.exprs {
            match self.edits.render_range(&source.text, source.range(e.span())) {
                Ok(text) => rendered.push(text),
                Err(err) => {
                    self.fail(err);
                    return;
                }
            }
        }
        let interpolations = tpl
            .exprs
            .drain(..)
            .zip(rendered)
            .map(|(expr, text)| Interpolation { expr, source: text })
            .collect();

        let span = tpl.span;
        let (replacement, text) = wrap_template(&quasis, interpolations, span);
        self.wrapped(span, LiteralKind::Template, original, text);
        *expr = replacement;
    }

    fn rewrite_attribute(&mut self, lit: &Str) -> Option<JSXExprContainer> {
        let value = lit.value.as_str()?;
        if !self.options.classifier.is_translatable(value) {
            return None;
        }
        let source = self.source;
        let raw = source.slice(lit.span);
        if raw.is_empty() || !self.accept(lit.span, value) {
            return None;
        }

        let (container, text) = wrap_attribute(lit.clone(), value);
        self.wrapped(lit.span, LiteralKind::JsxAttribute, raw, text);
        Some(container)
    }

    /// Only the trimmed text is replaced; surrounding whitespace stays put. The key is
    /// the parsed value, so HTML entities arrive decoded.
    fn rewrite_jsx_text(&mut self, node: &JSXText) -> Option<JSXExprContainer> {
        let key = node.value.trim_matches(is_jsx_whitespace);
        if !self.options.classifier.is_translatable(key) {
            return None;
        }
        let source = self.source;
        let raw = source.slice(node.span);
        let trimmed = raw.trim_matches(is_jsx_whitespace);
        if trimmed.is_empty() {
            return None;
        }

        let lead = raw.len() - raw.trim_start_matches(is_jsx_whitespace).len();
        let lo = node.span.lo + BytePos(lead as u32);
        let span = Span::new(lo, lo + BytePos(trimmed.len() as u32));
        if !self.accept(span, key) {
            return None;
        }

        let (container, text) = wrap_jsx_text(key, span);
        self.wrapped(span, LiteralKind::JsxText, trimmed, text);
        Some(container)
    }

    /// Traverse a component-like function with its frame pushed, then inject its
    /// binding if something inside it was wrapped. Parameters belong to the enclosing
    /// scope, so they are visited before the frame exists.
    fn visit_component(&mut self, name: String, mut target: ComponentFn<'_>) {
        let server_fn = self.options.server_fn;
        let frame = match &mut target {
            ComponentFn::Function(f) => {
                f.params.visit_mut_with(self);
                let body = f.body.as_ref();
                ComponentContext::new(
                    name,
                    body.is_some_and(|b| is_server_bound(b, server_fn)),
                    scope_binds(f.params.iter().map(|p| &p.pat), body, TRANSLATION_SYMBOL),
                )
            }
            ComponentFn::Arrow(a) => {
                a.params.visit_mut_with(self);
                let (server_bound, block) = match &*a.body {
                    BlockStmtOrExpr::BlockStmt(b) => (is_server_bound(b, server_fn), Some(b)),
                    BlockStmtOrExpr::Expr(e) => (is_server_bound(&**e, server_fn), None),
                };
                ComponentContext::new(
                    name,
                    server_bound,
                    scope_binds(a.params.iter(), block, TRANSLATION_SYMBOL),
                )
            }
        };

        self.scopes.push(frame.binds_t);
        self.frames.push(frame);
        match &mut target {
            ComponentFn::Function(f) => f.body.visit_mut_with(self),
            ComponentFn::Arrow(a) => a.body.visit_mut_with(self),
        }
        self.scopes.pop();
        let Some(frame) = self.frames.pop() else {
            return;
        };

        if !frame.modified || self.error.is_some() {
            return;
        }
        let strategy = choose_strategy(self.options.mode, frame.server_bound);
        let mut injector = Injector {
            source: self.source,
            edits: &mut *self.edits,
            client_hook: self.options.client_hook,
            server_fn,
        };
        match injector.inject(target, strategy) {
            Ok(true) => {
                match strategy {
                    Strategy::Client => self.outcome.client_injected = true,
                    Strategy::Server => self.outcome.server_injected = true,
                }
                log::debug!(
                    "{}: injected {:?} binding into {}",
                    self.source.path,
                    strategy,
                    frame.name
                );
                self.outcome.injected_components.push(frame.name);
            }
            Ok(false) => {
                log::warn!(
                    "{}: could not inject a translation binding into {}; `{}` is unbound there",
                    self.source.path,
                    frame.name,
                    TRANSLATION_SYMBOL
                );
            }
            Err(err) => self.fail(err),
        }
    }

    fn with_parent(&mut self, lo: BytePos, visit: impl FnOnce(&mut Self)) {
        self.parents.push(lo);
        visit(self);
        self.parents.pop();
    }

    fn with_scope(&mut self, binds_t: bool, visit: impl FnOnce(&mut Self)) {
        self.scopes.push(binds_t);
        visit(self);
        self.scopes.pop();
    }
}

/// Whitespace JSX drops around text. `&nbsp;` decodes to U+00A0 and is kept.
fn is_jsx_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

fn component_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(binding) if is_component_like(&binding.id.sym) => {
            Some(binding.id.sym.to_string())
        }
        _ => None,
    }
}

impl VisitMut for Transformer<'_> {
    fn visit_mut_module_item(&mut self, item: &mut ModuleItem) {
        let lo = item.span().lo;
        if self.markers.has_leading_marker(lo) {
            return;
        }
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(_) | ModuleDecl::ExportAll(_)) => return,
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(export)) if export.src.is_some() => {
                return;
            }
            _ => {}
        }
        self.with_parent(lo, |this| item.visit_mut_children_with(this));
    }

    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        let lo = stmt.span().lo;
        if self.markers.has_leading_marker(lo) {
            return;
        }
        self.with_parent(lo, |this| stmt.visit_mut_children_with(this));
    }

    fn visit_mut_fn_decl(&mut self, node: &mut FnDecl) {
        if is_component_like(&node.ident.sym) {
            let name = node.ident.sym.to_string();
            self.visit_component(name, ComponentFn::Function(&mut node.function));
        } else {
            node.visit_mut_children_with(self);
        }
    }

    fn visit_mut_var_declarator(&mut self, node: &mut VarDeclarator) {
        self.parents.push(node.span.lo);
        let handled = match (component_name(&node.name), node.init.as_deref_mut()) {
            (Some(name), Some(Expr::Arrow(arrow))) => {
                self.visit_component(name, ComponentFn::Arrow(arrow));
                true
            }
            (Some(name), Some(Expr::Fn(f))) => {
                self.visit_component(name, ComponentFn::Function(&mut f.function));
                true
            }
            _ => false,
        };
        if !handled {
            node.visit_mut_children_with(self);
        }
        self.parents.pop();
    }

    fn visit_mut_export_default_decl(&mut self, node: &mut ExportDefaultDecl) {
        if let DefaultDecl::Fn(f) = &mut node.decl
            && let Some(ident) = &f.ident
            && is_component_like(&ident.sym)
        {
            let name = ident.sym.to_string();
            self.visit_component(name, ComponentFn::Function(&mut f.function));
            return;
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Lit(Lit::Str(_)) => self.rewrite_string(expr),
            Expr::Tpl(_) => {
                expr.visit_mut_children_with(self);
                self.rewrite_template(expr);
            }
            _ => expr.visit_mut_children_with(self),
        }
    }

    fn visit_mut_call_expr(&mut self, node: &mut CallExpr) {
        if is_module_loader_callee(&node.callee) {
            return;
        }
        if !is_translation_callee(&node.callee) {
            node.visit_mut_children_with(self);
            return;
        }
        // The key of an existing `t(...)` stays as it is; its options are ordinary code.
        for (index, arg) in node.args.iter_mut().enumerate() {
            let is_key = index == 0
                && arg.spread.is_none()
                && matches!(&*arg.expr, Expr::Lit(Lit::Str(_)) | Expr::Tpl(_));
            if !is_key {
                arg.visit_mut_with(self);
            }
        }
    }

    fn visit_mut_function(&mut self, node: &mut Function) {
        let binds_t = scope_binds(
            node.params.iter().map(|p| &p.pat),
            node.body.as_ref(),
            TRANSLATION_SYMBOL,
        );
        self.with_scope(binds_t, |this| node.visit_mut_children_with(this));
    }

    fn visit_mut_arrow_expr(&mut self, node: &mut ArrowExpr) {
        let block = match &*node.body {
            BlockStmtOrExpr::BlockStmt(b) => Some(b),
            BlockStmtOrExpr::Expr(_) => None,
        };
        let binds_t = scope_binds(node.params.iter(), block, TRANSLATION_SYMBOL);
        self.with_scope(binds_t, |this| node.visit_mut_children_with(this));
    }

    fn visit_mut_block_stmt(&mut self, node: &mut BlockStmt) {
        let binds_t = scope_binds(
            std::iter::empty::<&Pat>(),
            Some(&*node),
            TRANSLATION_SYMBOL,
        );
        self.with_scope(binds_t, |this| node.visit_mut_children_with(this));
    }

    fn visit_mut_catch_clause(&mut self, node: &mut CatchClause) {
        let binds_t = node
            .param
            .as_ref()
            .is_some_and(|p| pat_binds(p, TRANSLATION_SYMBOL));
        self.with_scope(binds_t, |this| node.visit_mut_children_with(this));
    }

    fn visit_mut_jsx_element(&mut self, node: &mut JSXElement) {
        self.with_parent(node.span.lo, |this| node.visit_mut_children_with(this));
    }

    fn visit_mut_jsx_element_child(&mut self, child: &mut JSXElementChild) {
        if let JSXElementChild::JSXText(text) = child {
            if let Some(container) = self.rewrite_jsx_text(text) {
                *child = JSXElementChild::JSXExprContainer(container);
            }
            return;
        }
        child.visit_mut_children_with(self);
    }

    fn visit_mut_jsx_attr(&mut self, attr: &mut JSXAttr) {
        self.parents.push(attr.span.lo);
        match &mut attr.value {
            Some(JSXAttrValue::Str(lit)) => {
                if let Some(container) = self.rewrite_attribute(lit) {
                    attr.value = Some(JSXAttrValue::JSXExprContainer(container));
                }
            }
            Some(value) => value.visit_mut_with(self),
            None => {}
        }
        self.parents.pop();
    }

    fn visit_mut_key_value_prop(&mut self, node: &mut KeyValueProp) {
        let lo = node.key.span().lo;
        self.with_parent(lo, |this| node.value.visit_mut_with(this));
    }

    // Object keys, including computed ones, are identifiers rather than text.
    fn visit_mut_prop_name(&mut self, _: &mut PropName) {}

    fn visit_mut_member_prop(&mut self, prop: &mut MemberProp) {
        if let MemberProp::Computed(computed) = prop
            && matches!(&*computed.expr, Expr::Lit(Lit::Str(_)))
        {
            return;
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_tagged_tpl(&mut self, _: &mut TaggedTpl) {}

    fn visit_mut_ts_type(&mut self, _: &mut TsType) {}

    fn visit_mut_ts_enum_decl(&mut self, _: &mut TsEnumDecl) {}
}
