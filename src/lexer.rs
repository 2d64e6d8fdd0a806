use crate::diagnostics::{Diagnostic, DiagnosticKind, SourceSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    Const,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Keyword(Keyword),
    OpenParen,
    CloseParen,
    Equals,
    Semicolon,
    /// One of `+ - * / %`; the lexeme carries which.
    BinaryOperator,
    EndOfInput,
}

impl TokenKind {
    /// Human-readable name used in parser diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword(Keyword::Let) => "`let`",
            TokenKind::Keyword(Keyword::Const) => "`const`",
            TokenKind::Keyword(Keyword::Null) => "`null`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::Equals => "`=`",
            TokenKind::Semicolon => "`;`",
            TokenKind::BinaryOperator => "binary operator",
            TokenKind::EndOfInput => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: SourceSpan,
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current: usize,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            current: 0,
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.peeked.take().or_else(|| self.chars.next());
        if let Some((idx, ch)) = next {
            self.current = idx + ch.len_utf8();
        }
        next
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn eat_while<F>(&mut self, mut predicate: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
    }

    fn token(&self, start: usize, kind: TokenKind) -> Token {
        let end = self.current;
        Token {
            kind,
            lexeme: self.source[start..end].to_string(),
            span: SourceSpan { start, end },
        }
    }

    fn identifier_or_keyword(&mut self, start: usize) -> Token {
        self.eat_while(char::is_alphabetic);
        let lexeme = &self.source[start..self.current];
        let kind = keyword_for(lexeme).unwrap_or(TokenKind::Identifier);
        self.token(start, kind)
    }

    fn number_literal(&mut self, start: usize) -> Token {
        self.eat_while(|ch| ch.is_ascii_digit());
        self.token(start, TokenKind::Number)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        while let Some((start, ch)) = self.bump() {
            let token = match ch {
                ' ' | '\t' | '\n' => continue,
                '(' => self.token(start, TokenKind::OpenParen),
                ')' => self.token(start, TokenKind::CloseParen),
                '=' => self.token(start, TokenKind::Equals),
                ';' => self.token(start, TokenKind::Semicolon),
                '+' | '-' | '*' | '/' | '%' => self.token(start, TokenKind::BinaryOperator),
                '0'..='9' => self.number_literal(start),
                ch if ch.is_alphabetic() => self.identifier_or_keyword(start),
                other => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::Lex,
                        format!("unrecognized character {other:?} in source"),
                    )
                    .with_span(SourceSpan::new(start, self.current)));
                }
            };
            tokens.push(token);
        }
        tokens.push(Token {
            kind: TokenKind::EndOfInput,
            lexeme: String::new(),
            span: SourceSpan::new(self.current, self.current),
        });
        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }
}

/// Shorthand for `Lexer::new(source).tokenize()`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source).tokenize()
}

fn keyword_for(ident: &str) -> Option<TokenKind> {
    let keyword = match ident {
        "let" => Keyword::Let,
        "const" => Keyword::Const,
        "null" => Keyword::Null,
        _ => return None,
    };
    Some(TokenKind::Keyword(keyword))
}
