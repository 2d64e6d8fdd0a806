//! Core library for the Hybrid scripting language: lexing, parsing,
//! scoped environments and a tree-walking evaluator, plus the REPL driver.

pub mod ast;
pub mod diagnostics;
pub mod environment;
pub mod lexer;
pub mod parser;
pub mod prelude;
pub mod repl;
pub mod runtime;
pub mod value;

pub use diagnostics::{Diagnostic, DiagnosticKind, HybridError, SourceSpan};
pub use environment::{Environment, EnvironmentRef};
pub use parser::parse_program;
pub use repl::Repl;
pub use runtime::{evaluate, DivisionPolicy, ExecutionContext, Interpreter};
pub use value::Value;
