use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hybrid::{DivisionPolicy, ExecutionContext, HybridError, Interpreter, Repl};

#[derive(Parser)]
#[command(author, version, about = "Hybrid language interpreter")]
struct Args {
    /// Behaviour of `/` and `%` when the right operand is zero
    #[arg(long, value_enum, global = true, default_value_t = Division::Ieee)]
    division: Division,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Hybrid script file and print its final value
    Run { script: PathBuf },
    /// Start an interactive REPL session
    Repl,
    /// Evaluate a snippet of Hybrid code and print its value
    Eval { source: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Division {
    /// Propagate IEEE-754 infinities and NaN
    Ieee,
    /// Fail with a division-by-zero error
    Error,
}

impl From<Division> for DivisionPolicy {
    fn from(division: Division) -> Self {
        match division {
            Division::Ieee => DivisionPolicy::Ieee,
            Division::Error => DivisionPolicy::Error,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    let context = ExecutionContext {
        division: args.division.into(),
    };
    let outcome = match args.command.unwrap_or(Command::Repl) {
        Command::Run { script } => run_script(script, context),
        Command::Repl => Repl::with_context(context).run(),
        Command::Eval { source } => eval_snippet(&source, context),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, only when it is set.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_script(path: PathBuf, context: ExecutionContext) -> Result<(), HybridError> {
    let source = fs::read_to_string(&path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running script");
    eval_snippet(&source, context)
}

fn eval_snippet(source: &str, context: ExecutionContext) -> Result<(), HybridError> {
    let mut interpreter = Interpreter::with_context(context);
    let value = interpreter.eval_source(source)?;
    println!("{value}");
    Ok(())
}
