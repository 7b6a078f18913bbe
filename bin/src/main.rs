use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;

use interpreter::{InterpretError, Interpreter};

/// Runs a Lox script, or starts an interactive prompt when no script is given.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    file: Option<PathBuf>,
}

fn exit_code(error: &InterpretError) -> ExitCode {
    match error {
        InterpretError::CompileError(_) => ExitCode::from(65),
        InterpretError::RuntimeError(_) => ExitCode::from(70),
        InterpretError::Io(_) => ExitCode::from(74),
    }
}

fn run_file(path: PathBuf) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(&path)?;
    log::info!("Running {}", path.display());

    match Interpreter::new(stdout()).run_source(&source) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{e}");
            Ok(exit_code(&e))
        }
    }
}

// Every line is a separate run. Errors are reported and the prompt carries on.
fn run_prompt() -> anyhow::Result<ExitCode> {
    let mut interpreter = Interpreter::new(stdout());
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            println!();
            return Ok(ExitCode::SUCCESS);
        }

        if let Err(e) = interpreter.run_source(&line) {
            eprintln!("{e}");
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match args.file {
        Some(file) => run_file(file),
        None => run_prompt(),
    }
}
