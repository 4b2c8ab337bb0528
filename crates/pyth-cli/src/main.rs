//! The `pyth` command-line front-end.

use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use pyth::{Runner, StdPrint};

/// Pyth interpreter.
#[derive(Debug, Parser)]
#[command(name = "pyth", about = "Pyth interpreter.")]
struct Cli {
    /// Pyth file to run.
    #[arg(conflicts_with = "code", required_unless_present = "code")]
    file: Option<PathBuf>,

    /// Run inline source instead of a file.
    #[arg(short = 'c', long = "code")]
    code: Option<String>,

    /// Show input and generated code.
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source: Vec<u8> = if let Some(code) = &cli.code {
        code.clone().into_bytes()
    } else {
        let path = cli.file.as_ref().expect("clap requires a file or -c");
        match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("error reading {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
    };

    let runner = match Runner::new(&source) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.debug {
        let preprocessed = runner.preprocessed_source();
        println!("{:=^50}", format!(" {} bytes ", preprocessed.len()));
        println!("{preprocessed}");
        println!("{}", "=".repeat(50));
        print!("{}", runner.program_dump());
        println!("{}", "=".repeat(50));
    }

    match runner.run("", &mut StdPrint) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
