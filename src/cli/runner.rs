//! Compile-test runner
//!
//! ## TestReporter Trait
//!
//! The runner uses a `TestReporter` trait to separate reporting from
//! execution. `ConsoleReporter` prints one `PASS`/`FAIL` line per case,
//! the reason and extra args of each failure, and a count summary.
//!
//! ## Lifecycle
//!
//! 1. Probe the compiler, abort if it is missing
//! 2. Create one [`Compiler`] for the whole run
//! 3. Run every case in order
//! 4. Clean up the compiler's output directory

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::compiler::Compiler;
use crate::config::HarnessConfig;
use crate::probe::check_compiler_exists;

// ============================================================================
// Cases and results
// ============================================================================

/// What a case expects the compiler to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Compiles,
    FailsToCompile,
}

impl Expectation {
    pub fn describe(self) -> &'static str {
        match self {
            Expectation::Compiles => "compiles",
            Expectation::FailsToCompile => "fails to compile",
        }
    }
}

/// A source file plus the outcome it should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCase {
    pub source: PathBuf,
    pub expectation: Expectation,
    /// Appended after the global arguments for this case only
    pub extra_args: Vec<String>,
}

impl CompileCase {
    pub fn compiles(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            expectation: Expectation::Compiles,
            extra_args: Vec::new(),
        }
    }

    pub fn fails(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            expectation: Expectation::FailsToCompile,
            extra_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Name shown by reporters
    pub fn name(&self) -> String {
        self.source.display().to_string()
    }

    fn run(&self, compiler: &Compiler) -> CaseResult {
        let start = Instant::now();
        let extra: Vec<&str> = self.extra_args.iter().map(String::as_str).collect();
        let met = match self.expectation {
            Expectation::Compiles => compiler.compiles(&self.source, &extra),
            Expectation::FailsToCompile => compiler.compile_fails(&self.source, &extra),
        };
        let elapsed = start.elapsed();

        if met {
            CaseResult::Passed(elapsed)
        } else {
            let message = match self.expectation {
                Expectation::Compiles => "expected to compile, but the compiler rejected it",
                Expectation::FailsToCompile => "expected a compile error, but the compiler accepted it",
            };
            CaseResult::Failed(elapsed, message.to_string())
        }
    }
}

/// Result of running a single case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseResult {
    Passed(Duration),
    /// Elapsed time and what the compiler did instead
    Failed(Duration, String),
}

impl CaseResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseResult::Passed(_))
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            CaseResult::Passed(d) | CaseResult::Failed(d, _) => *d,
        }
    }
}

/// Summary of a run
///
/// `passed + failed + not_run == total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Cases collected after filtering
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Cases skipped because the run stopped at the first failure
    pub not_run: usize,
    /// Set when the output directory could not be removed
    pub cleanup_error: Option<String>,
    pub duration: Duration,
}

impl RunSummary {
    /// Whether every collected case ran and met its expectation
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.not_run == 0
    }
}

/// Errors that stop a run before or between cases
#[derive(Debug, Error)]
pub enum RunError {
    #[error("compiler '{0}' is not available")]
    CompilerMissing(String),

    #[error("no compile cases collected")]
    NoCases,

    #[error("failed to set up compiler output directory: {0}")]
    Setup(#[from] io::Error),
}

// ============================================================================
// Reporter
// ============================================================================

/// Trait for reporting run progress and results.
pub trait TestReporter {
    /// Called once the case list is final and the compiler is ready
    fn on_collection_complete(&mut self, case_count: usize);

    /// Called before a case runs
    fn on_case_start(&mut self, _case: &CompileCase) {}

    /// Called after a case runs
    fn on_case_complete(&mut self, case: &CompileCase, result: &CaseResult);

    /// Called after the last case and after cleanup
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Console reporter: one `PASS`/`FAIL` line per case on stderr
#[derive(Default)]
pub struct ConsoleReporter {
    /// Also show the expectation and timing of every case
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";

fn paint(color: &str, text: &str) -> String {
    format!("\x1b[{}m{}\x1b[0m", color, text)
}

impl TestReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, case_count: usize) {
        eprintln!("collected {} case(s)", case_count);
    }

    fn on_case_complete(&mut self, case: &CompileCase, result: &CaseResult) {
        let tag = match result {
            CaseResult::Passed(_) => paint(GREEN, "PASS"),
            CaseResult::Failed(..) => paint(RED, "FAIL"),
        };

        if self.verbose {
            eprintln!(
                "{}  {}  [{}, {}ms]",
                tag,
                case.name(),
                case.expectation.describe(),
                result.elapsed().as_millis()
            );
        } else {
            eprintln!("{}  {}", tag, case.name());
        }

        if let CaseResult::Failed(_, reason) = result {
            eprintln!("      {}", reason);
            if !case.extra_args.is_empty() {
                eprintln!("      extra args: {}", case.extra_args.join(" "));
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        if let Some(err) = &summary.cleanup_error {
            eprintln!("{} {}", paint(YELLOW, "warning:"), err);
        }

        let mut counts = vec![paint(GREEN, &format!("{} passed", summary.passed))];
        if summary.failed > 0 {
            counts.push(paint(RED, &format!("{} failed", summary.failed)));
        }
        if summary.not_run > 0 {
            counts.push(paint(
                YELLOW,
                &format!("{} not run (stopped at first failure)", summary.not_run),
            ));
        }

        eprintln!(
            "{} case(s): {} in {:.2}s",
            summary.total,
            counts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Options that shape a run but not individual compiler calls
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after the first failing case
    pub stop_on_fail: bool,
    /// Only run cases whose path contains this keyword
    pub filter: Option<String>,
}

/// Keep the cases selected by `filter`, in their original order
pub fn filter_cases(cases: Vec<CompileCase>, filter: Option<&str>) -> Vec<CompileCase> {
    match filter {
        Some(keyword) => cases.into_iter().filter(|c| c.name().contains(keyword)).collect(),
        None => cases,
    }
}

/// Run `cases` against the compiler described by `config`.
///
/// The compiler is probed first; a missing compiler aborts the run before any
/// case executes. The output directory is removed before returning. A failed
/// removal does not change any case result; it is reported through
/// [`RunSummary::cleanup_error`].
pub fn run_cases(
    config: &HarnessConfig,
    cases: Vec<CompileCase>,
    options: &RunOptions,
    reporter: &mut dyn TestReporter,
) -> Result<RunSummary, RunError> {
    let start_time = Instant::now();

    let cases = filter_cases(cases, options.filter.as_deref());
    if cases.is_empty() {
        return Err(RunError::NoCases);
    }

    if !check_compiler_exists(&config.compiler) {
        return Err(RunError::CompilerMissing(config.compiler.clone()));
    }

    let compiler = Compiler::from_config(config)?;
    reporter.on_collection_complete(cases.len());

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        reporter.on_case_start(case);
        let result = case.run(&compiler);
        reporter.on_case_complete(case, &result);

        if result.is_passed() {
            passed += 1;
        } else {
            failed += 1;
            if options.stop_on_fail {
                break;
            }
        }
    }

    let out_dir = compiler.out_dir().display().to_string();
    let cleanup_error = compiler
        .cleanup()
        .err()
        .map(|err| format!("could not remove {}: {}", out_dir, err));

    let summary = RunSummary {
        total: cases.len(),
        passed,
        failed,
        not_run: cases.len() - passed - failed,
        cleanup_error,
        duration: start_time.elapsed(),
    };
    reporter.on_run_complete(&summary);
    Ok(summary)
}

// ============================================================================
// Tests
// ============================================================================
