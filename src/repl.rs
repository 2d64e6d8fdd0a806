use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{HybridError, Result},
    runtime::{ExecutionContext, Interpreter},
    value::Value,
};

pub struct Repl {
    interpreter: Interpreter,
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

impl Repl {
    pub fn new() -> Self {
        Self::with_context(ExecutionContext::default())
    }

    pub fn with_context(context: ExecutionContext) -> Self {
        Self {
            interpreter: Interpreter::with_context(context),
        }
    }

    /// Evaluates one input line as a complete program in the session scope.
    /// Returns `None` when the line ends the session: it is empty or mentions `exit`.
    /// A whitespace-only line is not empty; it evaluates to `null`.
    pub fn eval_line(&mut self, line: &str) -> Option<Result<Value>> {
        if line.is_empty() || line.contains("exit") {
            return None;
        }
        Some(self.interpreter.eval_source(line.trim()))
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(|err| {
            HybridError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
        })?;
        println!("\nHybrid Repl v{}", env!("CARGO_PKG_VERSION"));
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let Some(outcome) = self.eval_line(&line) else {
                        break;
                    };
                    editor.add_history_entry(line.trim()).ok();
                    match outcome {
                        Ok(value) => println!("{value}"),
                        Err(HybridError::Diagnostic(diag)) => {
                            eprintln!("{:?}: {}", diag.kind, diag.message);
                            for note in &diag.notes {
                                eprintln!("  note: {note}");
                            }
                        }
                        Err(other) => eprintln!("error: {other}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    return Err(HybridError::from(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        err,
                    )));
                }
            }
        }
        Ok(())
    }
}
