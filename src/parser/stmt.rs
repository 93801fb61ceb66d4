use super::common::{ParsResult, Parser};
use crate::ast::*;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub fn parse_block(&mut self) -> ParsResult<Vec<Stmt>> {
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        self.consume_separators();
        while !self.match_kind(TokenKind::RBrace) {
            if self.peek().is_none() {
                return self.error("Expected '}' before end of file", self.current_span());
            }
            body.push(self.parse_stmt()?);
            self.consume_separators();
        }
        Ok(body)
    }

    pub fn parse_stmt(&mut self) -> ParsResult<Stmt> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            Some(TokenKind::If) => {
                self.advance();
                StmtKind::If(self.parse_if_tail()?)
            }
            Some(TokenKind::For) => {
                self.advance();
                self.parse_for_tail()?
            }
            Some(TokenKind::Try) => {
                self.advance();
                self.parse_try_tail()?
            }
            Some(TokenKind::Return) => {
                self.advance();
                StmtKind::Return(self.parse_trailing_expr()?)
            }
            Some(TokenKind::Throw) => {
                self.advance();
                StmtKind::Throw(self.parse_trailing_expr()?)
            }
            Some(TokenKind::Continue) => {
                self.advance();
                StmtKind::Continue
            }
            Some(TokenKind::Fn) => {
                return self.error("functions may only be declared at top level", start);
            }
            Some(_) => StmtKind::Expr(self.parse_expr()?),
            None => return self.error("Expected statement, got EOF", start),
        };
        Ok(Stmt::new(kind, start.merge(self.previous_span())))
    }

    /// `cond { ... } [else if ... | else { ... }]`, after `if`.
    fn parse_if_tail(&mut self) -> ParsResult<IfStmt> {
        let cond = self.parse_expr()?;
        let then_body = self.parse_block()?;
        let else_branch = if self.match_kind(TokenKind::Else) {
            if self.match_kind(TokenKind::If) {
                Some(ElseBranch::If(Box::new(self.parse_if_tail()?)))
            } else {
                Some(ElseBranch::Else(self.parse_block()?))
            }
        } else {
            None
        };
        Ok(IfStmt {
            cond,
            then_body,
            else_branch,
        })
    }

    /// `x in expr { ... }` or `(x in expr) { ... }`, after `for`.
    fn parse_for_tail(&mut self) -> ParsResult<StmtKind> {
        let parenthesized = self.peek_kind() == Some(&TokenKind::LParen)
            && matches!(self.peek_kind_at(1), Some(TokenKind::Ident(_)))
            && self.peek_kind_at(2) == Some(&TokenKind::In);
        if parenthesized {
            self.advance();
        }
        let var = self.expect_ident("loop variable")?;
        self.expect(TokenKind::In)?;
        let iterable = self.parse_expr()?;
        if parenthesized {
            self.expect(TokenKind::RParen)?;
        }
        let body = self.parse_block()?;
        Ok(StmtKind::For {
            var,
            iterable,
            body,
        })
    }

    /// `{ ... } catch (e) { ... }* [finally { ... }]`, after `try`.
    fn parse_try_tail(&mut self) -> ParsResult<StmtKind> {
        let body = self.parse_block()?;
        let mut catches = Vec::new();
        while self.match_kind(TokenKind::Catch) {
            let start = self.previous_span();
            let parenthesized = self.match_kind(TokenKind::LParen);
            let var = self.expect_ident("catch variable")?;
            if parenthesized {
                self.expect(TokenKind::RParen)?;
            }
            let body = self.parse_block()?;
            catches.push(CatchClause {
                var,
                body,
                span: start.merge(self.previous_span()),
            });
        }
        let finally = if self.match_kind(TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(StmtKind::Try {
            body,
            catches,
            finally,
        })
    }

    /// Optional operand of `return`/`throw`: only taken when it starts on the keyword's line.
    fn parse_trailing_expr(&mut self) -> ParsResult<Option<Expr>> {
        let keyword = self.previous_span();
        match self.peek_kind() {
            None | Some(TokenKind::RBrace) | Some(TokenKind::Semi) => Ok(None),
            Some(_) if !self.next_on_same_line(keyword) => Ok(None),
            Some(_) => Ok(Some(self.parse_expr()?)),
        }
    }
}
