//! Visitor context providing file information during AST traversal.

use swc_common::Span;

use crate::parser::ParsedFile;

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &ParsedFile {
        self.file
    }

    pub fn file_path(&self) -> &str {
        self.file.path()
    }

    /// First source line of a node, 1 when the span carries no location.
    pub fn line_of(&self, span: Span) -> usize {
        self.file.line_of(span)
    }

    pub fn line_range(&self, span: Span) -> (usize, usize) {
        self.file.line_range(span)
    }

    pub fn snippet(&self, line: usize) -> String {
        slice_snippet(self.file.source(), line)
    }
}

/// Returns the line before through the line after `line` (1-based), clamped
/// to the file.
pub fn slice_snippet(content: &str, line: usize) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let start = line.saturating_sub(2);
    let end = (line + 1).min(lines.len());

    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}
