use crate::lexer::{Token, TokenKind};
use crate::span::{Diagnostic, SourceMap, Span};

pub type ParsResult<T> = Result<T, Diagnostic>;

pub(crate) struct Parser<'a> {
    pub tokens: &'a [Token],
    pub pos: usize,
    pub sm: &'a SourceMap,
    pub file: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], sm: &'a SourceMap, file: &'a str) -> Self {
        Parser {
            tokens,
            pos: 0,
            sm,
            file,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    pub fn peek_kind_at(&self, offset: usize) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    pub fn error<T>(&self, msg: &str, span: Span) -> ParsResult<T> {
        Err(Diagnostic {
            msg: msg.to_string(),
            span,
            sm: Some(self.sm.clone()),
            file: Some(self.file.to_string()),
        })
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::new(0, 0)
        }
    }

    pub fn current_span(&self) -> Span {
        if let Some(t) = self.peek() {
            return t.span;
        }
        // EOF: one char past the last token
        match self.tokens.last() {
            Some(last) => Span::new(last.span.end, last.span.end + 1),
            None => Span::new(0, 0),
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> ParsResult<()> {
        match self.peek() {
            Some(t) if t.kind == kind => {
                self.advance();
                Ok(())
            }
            Some(t) => self.error(&format!("Expected {:?}, got {:?}", kind, t.kind), t.span),
            None => self.error(&format!("Expected {:?}, got EOF", kind), self.current_span()),
        }
    }

    pub fn expect_ident(&mut self, what: &str) -> ParsResult<String> {
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => {
                self.advance();
                Ok(name.clone())
            }
            _ => self.error(&format!("Expected {}", what), self.current_span()),
        }
    }

    pub fn match_kind(&mut self, kind: TokenKind) -> bool {
        if let Some(t) = self.peek() {
            if t.kind == kind {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Consumes explicit `;` separators. Newlines are plain whitespace.
    pub fn consume_separators(&mut self) {
        while self.match_kind(TokenKind::Semi) {}
    }

    /// True when the next token starts on the same source line as `span` ends.
    pub fn next_on_same_line(&self, span: Span) -> bool {
        match self.peek() {
            Some(t) => self.sm.line_col(t.span.start).0 == self.sm.line_col(span.end).0,
            None => false,
        }
    }
}
