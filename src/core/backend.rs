//! The `{parse, print}` capability the transformer is written against.
//!
//! Two interchangeable backends exist, one per grammar family. Both print by applying
//! the tree's edit log to the original text, so untouched code keeps its exact bytes
//! and line numbers.

use std::ops::Range;
use std::sync::Arc;

use anyhow::{Context, Result};
use enum_dispatch::enum_dispatch;
use swc_common::{BytePos, FilePathMapping, SourceFile, SourceMap, Span};
use swc_ecma_ast::Module;

use crate::config::ParserType;
use crate::core::{
    context::{SourceContext, SourceLocation},
    edits::EditLog,
    parsers::jsx::{Dialect, ExtractedComments, ParsedJSX, parse_jsx_source},
};

/// Original text of a parsed file plus the lookups needed to map spans back into it.
pub struct SourceText {
    /// Path used in diagnostics.
    pub path: String,
    pub text: String,
    pub source_map: Arc<SourceMap>,
    pub file: Arc<SourceFile>,
    pub comments: ExtractedComments,
}

impl SourceText {
    /// Byte offset of `pos` into `text`.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.file.start_pos.0) as usize
    }

    pub fn range(&self, span: Span) -> Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    pub fn slice(&self, span: Span) -> &str {
        self.text.get(self.range(span)).unwrap_or_default()
    }

    /// 1-based line and display column of `pos`.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let loc = self.source_map.lookup_char_pos(pos);
        (loc.line, loc.col_display + 1)
    }

    /// Text of a 1-based line, without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|i| self.text.lines().nth(i))
    }

    pub fn location(&self, pos: BytePos) -> SourceLocation {
        let (line, col) = self.line_col(pos);
        SourceLocation::new(self.path.clone(), line, col)
    }

    pub fn context(&self, pos: BytePos) -> SourceContext {
        let location = self.location(pos);
        let source_line = self.line(location.line).unwrap_or_default().to_string();
        SourceContext::new(location, source_line)
    }
}

/// One file's tree, owned by the call processing that file.
///
/// The module is mutated in place by the transformer; each mutation is mirrored in
/// `edits`, which the printer consumes.
pub struct SyntaxTree {
    pub module: Module,
    pub source: SourceText,
    pub edits: EditLog,
}

impl SyntaxTree {
    fn from_parsed(parsed: ParsedJSX, path: &str, text: String) -> Self {
        Self {
            module: parsed.module,
            source: SourceText {
                path: path.to_string(),
                text,
                source_map: parsed.source_map,
                file: parsed.source_file,
                comments: parsed.comments,
            },
            edits: EditLog::new(),
        }
    }

    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }
}

#[enum_dispatch]
pub trait SourceBackend {
    /// Parse `source`. Fails with a descriptive error on invalid input.
    fn parse(&self, path: &str, source: String) -> Result<SyntaxTree>;

    /// Render a (possibly rewritten) tree back to source text.
    fn print(&self, tree: SyntaxTree) -> Result<String>;

    fn name(&self) -> &'static str;
}

fn parse_with(dialect: Dialect, path: &str, source: String) -> Result<SyntaxTree> {
    let source_map = Arc::new(SourceMap::new(FilePathMapping::empty()));
    let parsed = parse_jsx_source(source.clone(), path, source_map, dialect)
        .with_context(|| format!("Failed to parse {}", path))?;
    Ok(SyntaxTree::from_parsed(parsed, path, source))
}

fn print_edits(tree: SyntaxTree) -> Result<String> {
    tree.edits
        .apply(&tree.source.text)
        .with_context(|| format!("Failed to print {}", tree.source.path))
}

/// TypeScript grammar: TSX for `.tsx`/`.jsx`/`.js`, plain TS for `.ts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypescriptBackend;

impl SourceBackend for TypescriptBackend {
    fn parse(&self, path: &str, source: String) -> Result<SyntaxTree> {
        parse_with(Dialect::Typescript, path, source)
    }

    fn print(&self, tree: SyntaxTree) -> Result<String> {
        print_edits(tree)
    }

    fn name(&self) -> &'static str {
        "typescript"
    }
}

/// ECMAScript grammar with JSX, for plain JavaScript code bases.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcmascriptBackend;

impl SourceBackend for EcmascriptBackend {
    fn parse(&self, path: &str, source: String) -> Result<SyntaxTree> {
        parse_with(Dialect::Ecmascript, path, source)
    }

    fn print(&self, tree: SyntaxTree) -> Result<String> {
        print_edits(tree)
    }

    fn name(&self) -> &'static str {
        "ecmascript"
    }
}

#[enum_dispatch(SourceBackend)]
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Typescript(TypescriptBackend),
    Ecmascript(EcmascriptBackend),
}

impl From<ParserType> for Backend {
    fn from(parser: ParserType) -> Self {
        match parser {
            ParserType::Typescript => TypescriptBackend.into(),
            ParserType::Ecmascript => EcmascriptBackend.into(),
        }
    }
}
