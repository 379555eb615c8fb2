//! CLI module for compile-check
//!
//! ## Usage
//!
//! - `compile-check --compiler g++ --arg=-std=c++20 --pass ok.cpp --fail bad.cpp` - run compile cases
//! - `compile-check probe <CMD>` - check that a compiler can be invoked
//!
//! ## Modules
//!
//! - `runner` - Case execution and reporting
//!
//! ## Design
//!
//! Commands return `CliResult<Outcome>`. `run()` turns that into the
//! process exit status: `Outcome::Passed` is 0, a failed case, a failed probe
//! or any `CliError` is 1. Nothing in this module calls `process::exit`.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{DEFAULT_COMPILER, HarnessConfig};
use crate::probe::check_compiler_exists;
use crate::version::VERSION;
use runner::{CompileCase, ConsoleReporter, RunError, RunOptions};

// ============================================================================
// Outcomes and errors
// ============================================================================

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every case met its expectation, or the probed compiler answered
    Passed,
    /// Some case missed its expectation, or the probed compiler did not answer
    Failed,
}

impl From<Outcome> for process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Passed => process::ExitCode::SUCCESS,
            Outcome::Failed => process::ExitCode::FAILURE,
        }
    }
}

/// Errors that stop a command before it can produce an [`Outcome`]
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no cases given\nUse --pass <FILE> and --fail <FILE> to add compile cases")]
    NoCases,

    #[error(transparent)]
    Run(#[from] RunError),
}

pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Check that source files compile, or fail to compile
#[derive(Parser, Debug)]
#[command(name = "compile-check")]
#[command(version = VERSION)]
#[command(about = "Check that source files compile, or fail to compile", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Compiler command to invoke
    #[arg(long, value_name = "CMD", default_value = DEFAULT_COMPILER)]
    pub compiler: String,

    /// Argument passed to every compiler invocation (repeatable, order kept)
    #[arg(short = 'a', long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Source file that must compile (repeatable)
    #[arg(long = "pass", value_name = "FILE")]
    pub pass: Vec<PathBuf>,

    /// Source file that must fail to compile (repeatable)
    #[arg(long = "fail", value_name = "FILE")]
    pub fail: Vec<PathBuf>,

    /// Print each compiler command line and its output
    #[arg(short, long)]
    pub verbose: bool,

    /// Stop on first failure
    #[arg(short = 'x', long = "exitfirst")]
    pub stop_on_fail: bool,

    /// Only run cases whose path contains this keyword
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that a compiler can be invoked
    Probe {
        /// Compiler command to probe
        #[arg(value_name = "CMD")]
        compiler: String,
    },
}

impl Cli {
    /// Harness configuration described by the flags
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::new()
            .with_compiler(&self.compiler)
            .with_args(&self.args)
            .with_verbose(self.verbose)
    }

    /// Cases in run order: every `--pass` file, then every `--fail` file
    pub fn cases(&self) -> Vec<CompileCase> {
        self.pass
            .iter()
            .map(CompileCase::compiles)
            .chain(self.fail.iter().map(CompileCase::fails))
            .collect()
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            stop_on_fail: self.stop_on_fail,
            filter: self.filter.clone(),
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Parse the command line, run it, and map the result to an exit status.
pub fn run() -> process::ExitCode {
    match execute(Cli::parse()) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("error: {}", err);
            process::ExitCode::FAILURE
        }
    }
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> CliResult<Outcome> {
    match &cli.command {
        Some(Command::Probe { compiler }) => Ok(probe_compiler(compiler)),
        None => run_compile_cases(&cli),
    }
}

fn probe_compiler(compiler: &str) -> Outcome {
    if check_compiler_exists(compiler) {
        println!("{}: ok", compiler);
        Outcome::Passed
    } else {
        Outcome::Failed
    }
}

fn run_compile_cases(cli: &Cli) -> CliResult<Outcome> {
    let cases = cli.cases();
    if cases.is_empty() {
        return Err(CliError::NoCases);
    }

    let mut reporter = ConsoleReporter::new(cli.verbose);
    let summary = runner::run_cases(&cli.config(), cases, &cli.run_options(), &mut reporter)?;

    Ok(if summary.all_passed() { Outcome::Passed } else { Outcome::Failed })
}

// ============================================================================
// Tests
// ============================================================================
