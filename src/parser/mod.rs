mod common;
mod expr;
mod stmt;

use self::common::Parser;
pub use self::common::ParsResult;
use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use crate::span::{SourceMap, Span};

pub fn parse(tokens: &[Token], sm: &SourceMap, file: &str) -> ParsResult<CompilationUnit> {
    let mut parser = Parser::new(tokens, sm, file);
    let mut items = Vec::new();

    let start_span = parser.current_span();

    parser.consume_separators();
    while parser.peek().is_some() {
        if parser.match_kind(TokenKind::Fn) {
            items.push(Item::Function(parser.parse_function()?));
        } else {
            items.push(Item::Statement(parser.parse_stmt()?));
        }
        parser.consume_separators();
    }

    let end_span = parser.previous_span();
    let span = if start_span.end <= end_span.end {
        start_span.merge(end_span)
    } else {
        Span::new(0, 0)
    };

    Ok(CompilationUnit { items, span })
}

impl<'a> Parser<'a> {
    /// Parses `name(params) { body }` after the caller consumed `fn`.
    fn parse_function(&mut self) -> ParsResult<FunctionDecl> {
        let start = self.previous_span();
        let name = self.expect_ident("function name")?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.match_kind(TokenKind::RParen) {
            loop {
                params.push(self.expect_ident("parameter name")?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());

        Ok(FunctionDecl {
            name,
            params,
            body,
            span,
        })
    }
}
