use crate::span::{Diagnostic, SourceMap, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Fn,
    If,
    Else,
    For,
    In,
    Try,
    Catch,
    Finally,
    Throw,
    Return,
    Continue,
    True,
    False,
    Null,
    Is,
    Ident(String),
    Number(String),
    /// Inner text of a `"..."` literal, escapes left untouched.
    String(String),
    /// Inner text of a `$"..."` shell-escape literal.
    ShellString(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semi,
    Dot,
    Equals,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pos: usize,
    sm: &'a SourceMap,
    file: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(sm: &'a SourceMap, file: &'a str) -> Self {
        Lexer {
            chars: sm.src().chars().peekable(),
            pos: 0,
            sm,
            file,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.pos += ch.len_utf8();
        }
        c
    }

    fn error<T>(&self, msg: &str, start: usize) -> Result<T, Diagnostic> {
        Err(Diagnostic {
            msg: msg.to_string(),
            span: Span::new(start, self.pos),
            sm: Some(self.sm.clone()),
            file: Some(self.file.to_string()),
        })
    }

    fn skip_line(&mut self) {
        while let Some(&c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.next();
        }
    }

    /// Reads the body of a quoted literal after the opening quote.
    fn quoted(&mut self, start: usize) -> Result<String, Diagnostic> {
        let mut s = String::new();
        loop {
            match self.next() {
                Some('"') => return Ok(s),
                Some('\\') => {
                    s.push('\\');
                    match self.next() {
                        Some(escaped) => s.push(escaped),
                        None => return self.error("unterminated string literal", start),
                    }
                }
                Some(c) => s.push(c),
                None => return self.error("unterminated string literal", start),
            }
        }
    }

    /// Consumes one character that forms a token on its own.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.next();
        kind
    }

    /// Consumes `second` if it follows, choosing between a one- and two-char token.
    fn pair(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(&second) {
            self.next();
            double
        } else {
            single
        }
    }
}

fn keyword(ident: &str) -> Option<TokenKind> {
    let kind = match ident {
        "fn" => TokenKind::Fn,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "throw" => TokenKind::Throw,
        "return" => TokenKind::Return,
        "continue" => TokenKind::Continue,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "is" => TokenKind::Is,
        _ => return None,
    };
    Some(kind)
}

pub fn lex(sm: &SourceMap, file: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = Vec::new();
    let mut lexer = Lexer::new(sm, file);

    while let Some(&c) = lexer.peek() {
        let start = lexer.pos;
        let kind = match c {
            ' ' | '\n' | '\t' | '\r' => {
                lexer.next();
                continue;
            }
            '#' => {
                lexer.skip_line();
                continue;
            }
            '/' => {
                lexer.next();
                if lexer.peek() == Some(&'/') {
                    lexer.skip_line();
                    continue;
                }
                TokenKind::Slash
            }
            '(' => lexer.single(TokenKind::LParen),
            ')' => lexer.single(TokenKind::RParen),
            '{' => lexer.single(TokenKind::LBrace),
            '}' => lexer.single(TokenKind::RBrace),
            '[' => lexer.single(TokenKind::LBracket),
            ']' => lexer.single(TokenKind::RBracket),
            ',' => lexer.single(TokenKind::Comma),
            ':' => lexer.single(TokenKind::Colon),
            ';' => lexer.single(TokenKind::Semi),
            '.' => lexer.single(TokenKind::Dot),
            '+' => lexer.single(TokenKind::Plus),
            '-' => lexer.single(TokenKind::Minus),
            '*' => lexer.single(TokenKind::Star),
            '%' => lexer.single(TokenKind::Percent),
            '=' => {
                lexer.next();
                lexer.pair('=', TokenKind::EqEq, TokenKind::Equals)
            }
            '!' => {
                lexer.next();
                lexer.pair('=', TokenKind::NotEq, TokenKind::Bang)
            }
            '<' => {
                lexer.next();
                lexer.pair('=', TokenKind::Le, TokenKind::Lt)
            }
            '>' => {
                lexer.next();
                lexer.pair('=', TokenKind::Ge, TokenKind::Gt)
            }
            '&' => {
                lexer.next();
                if lexer.peek() != Some(&'&') {
                    return lexer.error("expected '&&'", start);
                }
                lexer.next();
                TokenKind::AndAnd
            }
            '|' => {
                lexer.next();
                if lexer.peek() != Some(&'|') {
                    return lexer.error("expected '||'", start);
                }
                lexer.next();
                TokenKind::OrOr
            }
            '"' => {
                lexer.next();
                TokenKind::String(lexer.quoted(start)?)
            }
            '$' => {
                lexer.next();
                if lexer.peek() != Some(&'"') {
                    return lexer.error("expected '\"' after '$'", start);
                }
                lexer.next();
                TokenKind::ShellString(lexer.quoted(start)?)
            }
            c if c.is_ascii_digit() => {
                let mut num = String::new();
                while let Some(&d) = lexer.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    num.push(d);
                    lexer.next();
                }
                // Fractional part only when a digit follows the dot, so `1.foo` stays a field access.
                let mut la = lexer.chars.clone();
                if la.next() == Some('.') && la.next().is_some_and(|d| d.is_ascii_digit()) {
                    num.push('.');
                    lexer.next();
                    while let Some(&d) = lexer.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        num.push(d);
                        lexer.next();
                    }
                }
                TokenKind::Number(num)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&ch) = lexer.peek() {
                    if !ch.is_alphanumeric() && ch != '_' {
                        break;
                    }
                    ident.push(ch);
                    lexer.next();
                }
                keyword(&ident).unwrap_or(TokenKind::Ident(ident))
            }
            other => {
                lexer.next();
                return lexer.error(&format!("unexpected character '{}'", other), start);
            }
        };
        tokens.push(Token {
            kind,
            span: Span::new(start, lexer.pos),
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let sm = SourceMap::new(src.to_string());
        lex(&sm, "test.gnash")
            .expect("lex failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_and_operators() {
        assert_eq!(
            kinds("if a == b && !c { return }"),
            vec![
                TokenKind::If,
                TokenKind::Ident("a".into()),
                TokenKind::EqEq,
                TokenKind::Ident("b".into()),
                TokenKind::AndAnd,
                TokenKind::Bang,
                TokenKind::Ident("c".into()),
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn strings_keep_escapes_and_shell_form() {
        assert_eq!(
            kinds(r#""a\"b ${name}" $"ls -1""#),
            vec![
                TokenKind::String(r#"a\"b ${name}"#.into()),
                TokenKind::ShellString("ls -1".into()),
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("# heading\nx // trailing\n/ 2"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Slash,
                TokenKind::Number("2".into()),
            ]
        );
    }

    #[test]
    fn decimal_numbers() {
        assert_eq!(kinds("3.25"), vec![TokenKind::Number("3.25".into())]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let sm = SourceMap::new("x = \"oops".to_string());
        let err = lex(&sm, "bad.gnash").unwrap_err();
        assert_eq!(err.msg, "unterminated string literal");
        assert_eq!(err.span, Span::new(4, 9));
    }
}
