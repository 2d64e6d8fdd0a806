use crate::{
    ast::{BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind},
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    lexer::{Keyword, Lexer, Token, TokenKind},
};

pub fn parse_program(source: &str) -> Result<Program, Diagnostic> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

/// Tallest expression tree, and deepest group/assignment nesting, the parser accepts.
/// Evaluation and drop both recurse once per level.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    current: usize,
    nesting: usize,
}

/// An expression with the height of its tree.
struct Parsed {
    expr: Expr,
    depth: usize,
}

impl Parser {
    /// `tokens` must end with an `EndOfInput` token, as produced by the lexer.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            nesting: 0,
        }
    }

    fn parse_program(&mut self) -> Result<Program, Diagnostic> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::EndOfInput) {
            statements.push(self.parse_statement()?);
        }
        tracing::trace!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Let) => self.parse_var_decl(false),
            TokenKind::Keyword(Keyword::Const) => self.parse_var_decl(true),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_var_decl(&mut self, constant: bool) -> Result<Stmt, Diagnostic> {
        let start = self.advance().span.start;
        let name_token = if constant {
            self.consume(TokenKind::Identifier, "expected constant name after `const`")?
        } else {
            self.consume(TokenKind::Identifier, "expected variable name after `let`")?
        };

        if self.matches(TokenKind::Semicolon) {
            if constant {
                return Err(Diagnostic::new(
                    DiagnosticKind::Parse,
                    format!("const requires an initializer: `{}`", name_token.lexeme),
                )
                .with_span(name_token.span));
            }
            return Ok(Stmt {
                span: SourceSpan::new(start, self.previous().span.end),
                kind: StmtKind::VarDecl {
                    name: name_token.lexeme,
                    constant,
                    initializer: None,
                },
            });
        }

        self.consume(TokenKind::Equals, "expected `=` or `;` after declared name")?;
        let initializer = self.parse_expression()?.expr;
        let end = self
            .consume(TokenKind::Semicolon, "expected `;` after variable declaration")?
            .span
            .end;
        Ok(Stmt {
            span: SourceSpan::new(start, end),
            kind: StmtKind::VarDecl {
                name: name_token.lexeme,
                constant,
                initializer: Some(initializer),
            },
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, Diagnostic> {
        let expr = self.parse_expression()?.expr;
        let mut span = expr.span;
        if self.matches(TokenKind::Semicolon) {
            span.end = self.previous().span.end;
        }
        Ok(Stmt {
            span,
            kind: StmtKind::Expr(expr),
        })
    }

    fn parse_expression(&mut self) -> Result<Parsed, Diagnostic> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Parsed, Diagnostic> {
        let target = self.parse_additive()?;
        if self.matches(TokenKind::Equals) {
            self.enter(self.previous().span)?;
            let value = self.parse_assignment();
            self.nesting -= 1;
            return join(target, value?, |target, value| ExprKind::Assign { target, value });
        }
        Ok(target)
    }

    fn parse_additive(&mut self) -> Result<Parsed, Diagnostic> {
        let mut parsed = self.parse_multiplicative()?;
        while let Some(op) = self.match_operator(&[BinaryOp::Add, BinaryOp::Sub]) {
            let right = self.parse_multiplicative()?;
            parsed = join(parsed, right, |left, right| ExprKind::Binary { op, left, right })?;
        }
        Ok(parsed)
    }

    fn parse_multiplicative(&mut self) -> Result<Parsed, Diagnostic> {
        let mut parsed = self.parse_primary()?;
        while let Some(op) = self.match_operator(&[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod])
        {
            let right = self.parse_primary()?;
            parsed = join(parsed, right, |left, right| ExprKind::Binary { op, left, right })?;
        }
        Ok(parsed)
    }

    fn parse_primary(&mut self) -> Result<Parsed, Diagnostic> {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|err| {
                    Diagnostic::new(
                        DiagnosticKind::Parse,
                        format!("invalid number literal `{}`: {err}", token.lexeme),
                    )
                    .with_span(token.span)
                })?;
                ExprKind::Number(value)
            }
            TokenKind::Identifier => {
                self.advance();
                ExprKind::Identifier(token.lexeme)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::OpenParen => {
                self.advance();
                self.enter(token.span)?;
                let inner = self.parse_expression();
                self.nesting -= 1;
                let inner = inner?;
                let close = self.consume(TokenKind::CloseParen, "expected `)` after expression")?;
                return Ok(Parsed {
                    expr: Expr {
                        span: token.span.to(close.span),
                        kind: inner.expr.kind,
                    },
                    depth: inner.depth,
                });
            }
            _ => return Err(self.error(&token, "unexpected token in expression")),
        };
        Ok(Parsed {
            expr: Expr {
                kind,
                span: token.span,
            },
            depth: 1,
        })
    }

    /// Opens one level of recursive descent (a group or an assignment value).
    fn enter(&mut self, span: SourceSpan) -> Result<(), Diagnostic> {
        if self.nesting >= MAX_EXPRESSION_DEPTH {
            return Err(too_deep(span));
        }
        self.nesting += 1;
        Ok(())
    }

    fn match_operator(&mut self, allowed: &[BinaryOp]) -> Option<BinaryOp> {
        let token = self.peek();
        if token.kind != TokenKind::BinaryOperator {
            return None;
        }
        let op = BinaryOp::from_symbol(&token.lexeme).filter(|op| allowed.contains(op))?;
        self.advance();
        Some(op)
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self
                .error(self.peek(), message)
                .with_note(format!("expected {}", kind.describe())))
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::EndOfInput {
            self.current += 1;
        }
        token
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.current.min(last)]
    }

    fn error(&self, token: &Token, message: &str) -> Diagnostic {
        let found = match token.kind {
            TokenKind::Number | TokenKind::Identifier | TokenKind::BinaryOperator => {
                format!("{} `{}`", token.kind.describe(), token.lexeme)
            }
            _ => token.kind.describe().to_string(),
        };
        Diagnostic::new(DiagnosticKind::Parse, format!("{message}, found {found}"))
            .with_span(token.span)
    }
}

/// Builds a two-child node, refusing trees taller than [`MAX_EXPRESSION_DEPTH`].
fn join<F>(left: Parsed, right: Parsed, kind: F) -> Result<Parsed, Diagnostic>
where
    F: FnOnce(Box<Expr>, Box<Expr>) -> ExprKind,
{
    let span = left.expr.span.to(right.expr.span);
    let depth = 1 + left.depth.max(right.depth);
    if depth > MAX_EXPRESSION_DEPTH {
        return Err(too_deep(span));
    }
    Ok(Parsed {
        expr: Expr {
            span,
            kind: kind(Box::new(left.expr), Box::new(right.expr)),
        },
        depth,
    })
}

fn too_deep(span: SourceSpan) -> Diagnostic {
    Diagnostic::new(DiagnosticKind::Parse, "expression nests too deeply")
        .with_span(span)
        .with_note(format!(
            "at most {MAX_EXPRESSION_DEPTH} levels of nesting are allowed"
        ))
}
