use std::rc::Rc;

use crate::{
    ast::{BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind},
    diagnostics::{Diagnostic, DiagnosticKind, HybridError, Result, SourceSpan},
    environment::{Environment, EnvironmentRef},
    parser, prelude,
    value::Value,
};

/// What `/` and `%` do when the right operand is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DivisionPolicy {
    /// Yield IEEE-754 infinities or NaN.
    #[default]
    Ieee,
    /// Fail with [`DiagnosticKind::DivisionByZero`].
    Error,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionContext {
    pub division: DivisionPolicy,
}

pub struct Interpreter {
    env: EnvironmentRef,
    context: ExecutionContext,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter over a fresh global scope holding the prelude.
    pub fn new() -> Self {
        Self::with_context(ExecutionContext::default())
    }

    pub fn with_context(context: ExecutionContext) -> Self {
        let env = Environment::new();
        prelude::install(&env);
        Self { env, context }
    }

    /// Interpreter over a caller-owned scope. The prelude is not installed.
    pub fn with_environment(env: EnvironmentRef, context: ExecutionContext) -> Self {
        Self { env, context }
    }

    pub fn environment(&self) -> EnvironmentRef {
        Rc::clone(&self.env)
    }

    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        let program = parser::parse_program(source).map_err(HybridError::from)?;
        self.eval_program(&program)
    }

    /// Runs every statement against the same scope; the last value wins.
    pub fn eval_program(&mut self, program: &Program) -> Result<Value> {
        tracing::debug!(
            statements = program.statements.len(),
            division = ?self.context.division,
            "evaluating program"
        );
        let mut last_value = Value::Null;
        for stmt in &program.statements {
            last_value = self.execute_statement(stmt)?;
        }
        Ok(last_value)
    }

    pub fn execute_statement(&mut self, stmt: &Stmt) -> Result<Value> {
        match &stmt.kind {
            StmtKind::VarDecl {
                name,
                constant,
                initializer,
            } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                let declared = self
                    .env
                    .borrow_mut()
                    .declare(name, value, *constant)
                    .map_err(|diag| diag.with_span(stmt.span))?;
                Ok(declared)
            }
            StmtKind::Expr(expr) => self.evaluate(expr),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Identifier(name) => Environment::lookup(&self.env, name)
                .map_err(|diag| HybridError::from(diag.with_span(expr.span))),
            ExprKind::Binary { op, left, right } => {
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                self.binary(*op, left_value, right_value, expr.span)
            }
            ExprKind::Assign { target, value } => {
                let ExprKind::Identifier(name) = &target.kind else {
                    return Err(HybridError::from(
                        Diagnostic::new(
                            DiagnosticKind::InvalidAssignmentTarget,
                            "invalid left-hand side in assignment expression",
                        )
                        .with_span(target.span)
                        .with_note("only a variable name can be assigned to"),
                    ));
                };
                let value = self.evaluate(value)?;
                Environment::assign(&self.env, name, value)
                    .map_err(|diag| HybridError::from(diag.with_span(target.span)))
            }
        }
    }

    fn binary(&self, op: BinaryOp, left: Value, right: Value, span: SourceSpan) -> Result<Value> {
        let (Value::Number(lhs), Value::Number(rhs)) = (left, right) else {
            tracing::trace!(
                %op,
                left = left.type_name(),
                right = right.type_name(),
                "non-numeric operands, yielding null"
            );
            return Ok(Value::Null);
        };
        if self.context.division == DivisionPolicy::Error
            && matches!(op, BinaryOp::Div | BinaryOp::Mod)
            && rhs == 0.0
        {
            return Err(HybridError::from(
                Diagnostic::new(
                    DiagnosticKind::DivisionByZero,
                    format!("division by zero in `{} {op} {}`", left, right),
                )
                .with_span(span),
            ));
        }
        let result = match op {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Mod => lhs % rhs,
        };
        Ok(Value::Number(result))
    }
}

/// Evaluates `program` against `env` with the default execution context.
pub fn evaluate(program: &Program, env: &EnvironmentRef) -> Result<Value> {
    Interpreter::with_environment(Rc::clone(env), ExecutionContext::default()).eval_program(program)
}
