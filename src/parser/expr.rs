use super::common::{ParsResult, Parser};
use crate::ast::*;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub fn parse_expr(&mut self) -> ParsResult<Expr> {
        if self.at_assignment() {
            return self.parse_assignment();
        }
        self.parse_or()
    }

    /// Lookahead for `ident (, ident)* =`.
    fn at_assignment(&self) -> bool {
        let mut offset = 0;
        loop {
            if !matches!(self.peek_kind_at(offset), Some(TokenKind::Ident(_))) {
                return false;
            }
            match self.peek_kind_at(offset + 1) {
                Some(TokenKind::Equals) => return true,
                Some(TokenKind::Comma) => offset += 2,
                _ => return false,
            }
        }
    }

    fn parse_assignment(&mut self) -> ParsResult<Expr> {
        let start = self.current_span();
        let mut targets = vec![self.expect_ident("assignment target")?];
        while self.match_kind(TokenKind::Comma) {
            targets.push(self.expect_ident("assignment target")?);
        }
        self.expect(TokenKind::Equals)?;
        let value = self.parse_expr()?;
        let span = start.merge(value.span);
        Ok(Expr::new(
            ExprKind::Assign {
                targets,
                value: Box::new(value),
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> ParsResult<Expr> {
        let mut left = self.parse_and()?;
        while self.match_kind(TokenKind::OrOr) {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::Or(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParsResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.match_kind(TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            let span = left.span.merge(right.span);
            left = Expr::new(ExprKind::And(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParsResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::EqEq) => CompareOp::Eq,
                Some(TokenKind::NotEq) => CompareOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = compare(left, op, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParsResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => CompareOp::Lt,
                Some(TokenKind::Le) => CompareOp::Le,
                Some(TokenKind::Gt) => CompareOp::Gt,
                Some(TokenKind::Ge) => CompareOp::Ge,
                Some(TokenKind::Is) => {
                    self.advance();
                    let ty = self.parse_additive()?;
                    let span = left.span.merge(ty.span);
                    left = Expr::new(
                        ExprKind::Is {
                            value: Box::new(left),
                            ty: Box::new(ty),
                        },
                        span,
                    );
                    continue;
                }
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = compare(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParsResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => ArithOp::Add,
                Some(TokenKind::Minus) => ArithOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = arith(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParsResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => ArithOp::Mul,
                Some(TokenKind::Slash) => ArithOp::Div,
                Some(TokenKind::Percent) => ArithOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = arith(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParsResult<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            Some(TokenKind::Bang) => UnaryOp::Not,
            Some(TokenKind::Minus) => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        self.advance();

        // `-3` is a literal, not a negation
        if op == UnaryOp::Neg {
            if let Some(TokenKind::Number(n)) = self.peek_kind() {
                self.advance();
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::Literal(Literal::Number(format!("-{}", n))), span));
            }
        }

        let expr = self.parse_unary()?;
        let span = start.merge(expr.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> ParsResult<Expr> {
        let base = self.parse_primary()?;
        let mut ops = Vec::new();
        loop {
            if self.match_kind(TokenKind::Dot) {
                ops.push(PostfixOp::Field(self.expect_ident("identifier after '.'")?));
            } else if self.match_kind(TokenKind::LParen) {
                ops.push(PostfixOp::Call(self.parse_args()?));
            } else {
                break;
            }
        }
        if ops.is_empty() {
            return Ok(base);
        }
        let span = base.span.merge(self.previous_span());
        Ok(Expr::new(
            ExprKind::Postfix {
                base: Box::new(base),
                ops,
            },
            span,
        ))
    }

    /// Comma-separated arguments after `(`, through the closing `)`.
    fn parse_args(&mut self) -> ParsResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.match_kind(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParsResult<Expr> {
        let start = self.current_span();
        let Some(token) = self.advance() else {
            return self.error("Expected expression, got EOF", start);
        };
        let kind = match &token.kind {
            TokenKind::Ident(name) => ExprKind::Ident(name.clone()),
            TokenKind::String(s) => ExprKind::Literal(Literal::Str(s.clone())),
            TokenKind::ShellString(s) => ExprKind::Literal(Literal::Shell(s.clone())),
            TokenKind::Number(n) => ExprKind::Literal(Literal::Number(n.clone())),
            TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Null => ExprKind::Literal(Literal::Null),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                ExprKind::Paren(Box::new(inner))
            }
            TokenKind::LBracket => ExprKind::Literal(Literal::List(self.parse_list_items()?)),
            TokenKind::LBrace => ExprKind::Literal(Literal::Map(self.parse_map_entries()?)),
            other => {
                return self.error(&format!("Expected expression, got {:?}", other), start);
            }
        };
        Ok(Expr::new(kind, start.merge(self.previous_span())))
    }

    fn parse_list_items(&mut self) -> ParsResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.match_kind(TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.match_kind(TokenKind::Comma) {
                self.expect(TokenKind::RBracket)?;
                break;
            }
        }
        Ok(items)
    }

    fn parse_map_entries(&mut self) -> ParsResult<Vec<MapEntry>> {
        let mut entries = Vec::new();
        while !self.match_kind(TokenKind::RBrace) {
            let key = match self.peek_kind() {
                Some(TokenKind::Ident(name)) => MapKey::Ident(name.clone()),
                Some(TokenKind::String(s)) => MapKey::Str(s.clone()),
                _ => return self.error("Expected map key", self.current_span()),
            };
            self.advance();
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push(MapEntry { key, value });
            if !self.match_kind(TokenKind::Comma) {
                self.expect(TokenKind::RBrace)?;
                break;
            }
        }
        Ok(entries)
    }
}

fn compare(left: Expr, op: CompareOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn arith(left: Expr, op: ArithOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Arith {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
