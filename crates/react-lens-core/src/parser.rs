//! Parser module for JSX-capable JavaScript/TypeScript source code
//!
//! Integrates with SWC for parsing source files into AST. JSX is always
//! enabled; TypeScript files are parsed with the TSX grammar.

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{EsSyntax, StringInput, Syntax, TsSyntax, lexer::Lexer};
use tracing::debug;

pub use swc_ecma_ast::Module;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({line}:{column})")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    typescript: bool,
    decorators: bool,
    tolerate_recovered: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    /// Accept a module when the parser recovered from its errors, such as
    /// strict-mode violations (`delete x`, `010`) in sloppy scripts.
    pub fn tolerate_recovered(mut self, enabled: bool) -> Self {
        self.tolerate_recovered = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: true,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: true,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser {
            syntax,
            tolerate_recovered: self.tolerate_recovered,
        }
    }
}

/// Result of a successful parse: the module plus the position the source
/// file starts at inside its source map, needed to turn spans into offsets.
#[derive(Debug)]
pub struct ParseOutput {
    pub module: Module,
    pub start_pos: BytePos,
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
    tolerate_recovered: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript | Language::Jsx => Self::builder()
                .decorators(true)
                .tolerate_recovered(true)
                .build(),
            Language::TypeScript | Language::Tsx => {
                Self::builder().typescript(true).decorators(true).build()
            }
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as an ES module. A fatal error fails the parse; recovered
    /// errors fail it too unless the parser tolerates them.
    pub fn parse_module(&self, filename: &str, code: &str) -> Result<ParseOutput, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map.new_source_file(
            FileName::Custom(filename.to_string()).into(),
            code.to_string(),
        );

        let lexer = Lexer::new(
            self.syntax,
            Default::default(),
            StringInput::from(&*fm),
            None,
        );

        let mut parser = swc_ecma_parser::Parser::new_from(lexer);
        let to_parse_error = |e: swc_ecma_parser::error::Error| {
            let span = e.span();
            let loc = source_map.lookup_char_pos(span.lo);
            ParseError {
                line: loc.line,
                column: loc.col_display + 1,
                message: e.kind().msg().to_string(),
            }
        };

        let module = parser.parse_module().map_err(to_parse_error)?;

        let recovered = parser.take_errors();
        if let Some(first) = recovered.into_iter().next() {
            let error = to_parse_error(first);
            if !self.tolerate_recovered {
                return Err(error);
            }
            debug!(file = filename, %error, "ignoring recovered syntax error");
        }

        Ok(ParseOutput {
            module,
            start_pos: fm.start_pos,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// A source file parsed into an AST, with line lookup for spans.
pub struct ParsedFile {
    path: String,
    source: String,
    language: Language,
    module: Module,
    start_pos: BytePos,
    line_starts: Vec<usize>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("path", &self.path)
            .field("language", &self.language)
            .field("line_count", &self.line_count())
            .finish()
    }
}

impl ParsedFile {
    pub fn parse(path: &str, source: &str) -> Result<Self, ParseError> {
        let output = Parser::for_file(path).parse_module(path, source)?;

        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Ok(Self {
            path: path.to_string(),
            source: source.to_string(),
            language: detect_language(path),
            module: output.module,
            start_pos: output.start_pos,
            line_starts,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line of a span's start. Dummy spans map to line 1.
    pub fn line_of(&self, span: Span) -> usize {
        if span.is_dummy() {
            return 1;
        }
        self.line_at(span.lo)
    }

    /// 1-based first and last line covered by a span.
    pub fn line_range(&self, span: Span) -> (usize, usize) {
        if span.is_dummy() {
            return (1, 1);
        }
        let start = self.line_at(span.lo);
        let end = self.line_at(BytePos(span.hi.0.saturating_sub(1).max(span.lo.0)));
        (start, end.max(start))
    }

    fn line_at(&self, pos: BytePos) -> usize {
        let offset = pos.0.saturating_sub(self.start_pos.0) as usize;
        self.line_starts
            .partition_point(|&start| start <= offset)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_module_with_imports() {
        let parser = Parser::new();
        let result = parser.parse_module("test.js", "import x from 'y';");

        assert!(result.is_ok());
        assert_eq!(result.unwrap().module.body.len(), 1);
    }

    #[test]
    fn parse_jsx_in_plain_js_file() {
        let parser = Parser::for_file("component.js");
        let result = parser.parse_module("component.js", "const el = <div>Hello</div>;");

        assert!(result.is_ok());
    }

    #[test]
    fn parse_tsx_component() {
        let parser = Parser::for_file("component.tsx");
        let code = "const App = (props: { title: string }) => <h1>{props.title}</h1>;";

        assert!(parser.parse_module("component.tsx", code).is_ok());
    }

    #[test]
    fn parse_ts_file_accepts_jsx() {
        let parser = Parser::for_file("view.ts");
        let code = "const x: number = 1;\nexport const View = () => <div />;";

        assert!(parser.parse_module("view.ts", code).is_ok());
    }

    #[test]
    fn parse_invalid_syntax_returns_error() {
        let parser = Parser::new();
        let error = parser.parse_module("test.js", "const = ;").unwrap_err();

        assert_eq!(error.line, 1);
        assert!(error.column > 0);
        assert!(!error.message.is_empty());
    }

    #[test]
    fn parse_unclosed_jsx_returns_error() {
        let parser = Parser::for_file("broken.tsx");
        let result = parser.parse_module("broken.tsx", "const el = <div>;\n");

        assert!(result.is_err());
    }

    #[test]
    fn sloppy_mode_javascript_is_accepted() {
        let code = "var x = 1;\ndelete x;\nvar mode = 010;\nexport const A = () => <img />;\n";

        assert!(Parser::for_file("A.jsx").parse_module("A.jsx", code).is_ok());
        assert!(Parser::for_file("a.js").parse_module("a.js", code).is_ok());
    }

    #[test]
    fn recovered_errors_fail_when_not_tolerated() {
        let parser = Parser::builder().build();
        let error = parser
            .parse_module("a.js", "var x = 1;\ndelete x;\n")
            .unwrap_err();

        assert_eq!(error.line, 2);
    }

    #[test]
    fn detect_language_from_extension() {
        assert_eq!(detect_language("file.js"), Language::JavaScript);
        assert_eq!(detect_language("file.jsx"), Language::Jsx);
        assert_eq!(detect_language("file.ts"), Language::TypeScript);
        assert_eq!(detect_language("file.tsx"), Language::Tsx);
        assert_eq!(detect_language("unknown"), Language::JavaScript);
    }

    #[test]
    fn parsed_file_reports_lines_for_spans() {
        let code = "const a = 1;\nconst b = 2;\nconst c = 3;";
        let parsed = ParsedFile::parse("test.js", code).unwrap();

        let spans: Vec<Span> = parsed
            .module()
            .body
            .iter()
            .map(|item| item.span())
            .collect();

        assert_eq!(parsed.line_of(spans[0]), 1);
        assert_eq!(parsed.line_of(spans[1]), 2);
        assert_eq!(parsed.line_of(spans[2]), 3);
    }

    #[test]
    fn parsed_file_line_range_covers_multiline_nodes() {
        let code = "\nfunction Big() {\n  return 1;\n}\nconst after = 2;";
        let parsed = ParsedFile::parse("test.js", code).unwrap();

        let span = parsed.module().body[0].span();

        assert_eq!(parsed.line_range(span), (2, 4));
    }

    #[test]
    fn parsed_file_dummy_span_is_line_one() {
        let parsed = ParsedFile::parse("test.js", "const a = 1;").unwrap();

        assert_eq!(parsed.line_of(swc_common::DUMMY_SP), 1);
        assert_eq!(parsed.line_range(swc_common::DUMMY_SP), (1, 1));
    }

    #[test]
    fn parsed_file_counts_lines() {
        let parsed = ParsedFile::parse("test.js", "const a = 1;\nconst b = 2;").unwrap();

        assert_eq!(parsed.line_count(), 2);
        assert_eq!(parsed.language(), Language::JavaScript);
        assert_eq!(parsed.path(), "test.js");
    }
}
