use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceFile, SourceMap, Spanned,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments extracted from SingleThreadedComments during parsing,
/// stored independently of swc's RefCell-based container.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Leading comments attached to the token starting at `pos`.
    pub fn leading_at(&self, pos: BytePos) -> &[Comment] {
        self.leading.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Grammar family used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Typescript,
    Ecmascript,
}

impl Dialect {
    /// Build the swc syntax for a file. JSX is enabled everywhere except plain
    /// TypeScript files, where `<T>expr` is a type assertion.
    pub fn syntax_for(self, file_path: &str) -> Syntax {
        match self {
            Dialect::Typescript => {
                let ext = Path::new(file_path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                Syntax::Typescript(TsSyntax {
                    tsx: !matches!(ext, "ts" | "mts" | "cts"),
                    decorators: true,
                    ..Default::default()
                })
            }
            Dialect::Ecmascript => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub source_file: Arc<SourceFile>,
    pub comments: ExtractedComments,
}

/// Parse JSX/TSX source code string into an AST.
///
/// Recoverable syntax errors collected by the parser are treated as failures too:
/// the rewriter only works on files that parse cleanly.
pub fn parse_jsx_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
    dialect: Dialect,
) -> Result<ParsedJSX> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            dialect.syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser.parse_module().map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            anyhow!(
                "{} (line {}, column {})",
                e.kind().msg(),
                loc.line,
                loc.col_display + 1
            )
        })?;

        if let Some(e) = parser.take_errors().into_iter().next() {
            let loc = source_map.lookup_char_pos(e.span().lo);
            return Err(anyhow!(
                "{} (line {}, column {})",
                e.kind().msg(),
                loc.line,
                loc.col_display + 1
            ));
        }

        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedJSX {
            module,
            source_map,
            source_file,
            comments: extracted_comments,
        })
    })
}

#[cfg(test)]
mod tests {
    use swc_common::FilePathMapping;

    use crate::core::parsers::jsx::*;

    fn parse(code: &str, path: &str, dialect: Dialect) -> Result<ParsedJSX> {
        let cm = Arc::new(SourceMap::new(FilePathMapping::empty()));
        parse_jsx_source(code.to_string(), path, cm, dialect)
    }

    #[test]
    fn test_parse_tsx_component() {
        let parsed = parse(
            "export function App() { return <div>안녕</div>; }",
            "app.tsx",
            Dialect::Typescript,
        )
        .unwrap();
        assert_eq!(parsed.module.body.len(), 1);
    }

    #[test]
    fn test_plain_ts_allows_angle_bracket_assertion() {
        let parsed = parse("const n = <number>value;", "util.ts", Dialect::Typescript);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_ecmascript_parses_jsx() {
        let parsed = parse(
            "export default function App() { return <p>hi</p>; }",
            "app.js",
            Dialect::Ecmascript,
        );
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse("const = ;", "broken.ts", Dialect::Typescript)
            .err()
            .unwrap()
            .to_string();
        assert!(err.contains("line 1"), "unexpected error: {}", err);
    }

    #[test]
    fn test_leading_comments_collected() {
        let parsed = parse(
            "// i18n-ignore\nconst a = 1;",
            "a.ts",
            Dialect::Typescript,
        )
        .unwrap();
        let first = parsed.module.body[0].span().lo;
        let comments = parsed.comments.leading_at(first);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text.trim(), "i18n-ignore");
    }
}
