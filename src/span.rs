use std::cmp::{max, min};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn merge(self, other: Span) -> Self {
        Span {
            start: min(self.start, other.start),
            end: max(self.end, other.end),
        }
    }
}

/// A front-end error anchored to a source range.
///
/// When the source map and file name are attached, `format` renders the
/// familiar `file:line:col: msg` header followed by the offending line and a
/// caret underline. Without them only the bare message is available.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{msg}")]
pub struct Diagnostic {
    pub msg: String,
    pub span: Span,
    pub sm: Option<SourceMap>,
    pub file: Option<String>,
}

impl Diagnostic {
    pub fn format(&self) -> String {
        if let (Some(sm), Some(file)) = (&self.sm, &self.file) {
            sm.format_diagnostic(file, &self.msg, self.span)
        } else {
            format!("error: {}", self.msg)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    src: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(src: String) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in src.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        SourceMap { src, line_starts }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Source text covered by `span`, clamped to the buffer.
    pub fn text(&self, span: Span) -> &str {
        let end = min(span.end, self.src.len());
        let start = min(span.start, end);
        self.src.get(start..end).unwrap_or("")
    }

    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let line_idx = self
            .line_starts
            .binary_search(&pos)
            .unwrap_or_else(|x| x - 1);

        let line_start = self.line_starts[line_idx];
        let col = if pos >= line_start {
            self.src[line_start..min(pos, self.src.len())].chars().count() + 1
        } else {
            1
        };
        (line_idx + 1, col)
    }

    pub fn line_snippet(&self, line: usize) -> &str {
        if line < 1 || line > self.line_starts.len() {
            return "";
        }
        let start = self.line_starts[line - 1];
        let end = if line == self.line_starts.len() {
            self.src.len()
        } else {
            self.line_starts[line] - 1 // Exclude newline
        };
        if start > end {
            return "";
        }
        &self.src[start..end]
    }

    pub fn format_diagnostic(&self, file: &str, msg: &str, span: Span) -> String {
        let (start_line, start_col) = self.line_col(span.start);
        let (end_line, _) = self.line_col(span.end);
        let snippet = self.line_snippet(start_line);

        let mut arrow_col = start_col;

        if start_line != end_line {
            // Multi-line: skip leading whitespace if we point to it
            if let Some(first_non_ws) = snippet.chars().position(|c| !c.is_whitespace()) {
                let first_non_ws_col = first_non_ws + 1;
                if start_col < first_non_ws_col {
                    arrow_col = first_non_ws_col;
                }
            }
        }

        let mut arrow = " ".repeat(arrow_col - 1);

        if start_line == end_line {
            let line_start = self.line_starts[start_line - 1];
            let start_clamp = max(line_start, span.start);
            let end_clamp = min(self.src.len(), span.end);
            let len = if end_clamp > start_clamp {
                self.src[start_clamp..end_clamp].chars().count()
            } else {
                0
            };

            arrow.push('^');
            arrow.push_str(&"~".repeat(max(1, len) - 1));
        } else {
            arrow.push('^');
        }

        format!(
            "{}:{}:{}: {}\n{}\n{}",
            file, start_line, start_col, msg, snippet, arrow
        )
    }
}
