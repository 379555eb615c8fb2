//! Compiler wrapper - runs an external compiler against source files
//!
//! A [`Compiler`] holds the command name, the arguments passed on every
//! invocation and a temporary directory that receives the build output.
//! Each call produces a full command line:
//!
//! ```text
//! <command> -o <tmpdir>/a.out <global args...> <extra args...> <source>
//! ```
//!
//! The command line is passed as an argument vector, never through a shell.
//!
//! ## Preconditions
//!
//! Construction does not check that the compiler exists. Call
//! [`check_compiler_exists`](crate::probe::check_compiler_exists) first.
//!
//! ## Concurrency
//!
//! Every call writes to the same output file, so calls on one instance must
//! not overlap. Separate instances own separate directories and can be used
//! from different threads.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tempfile::TempDir;

use crate::config::HarnessConfig;

/// Flag naming the output file.
const OUTPUT_FLAG: &str = "-o";
/// Output file name inside the scoped directory, reused by every call.
const OUTPUT_FILE: &str = "a.out";
/// Prefix for the scoped output directory.
const TEMP_DIR_PREFIX: &str = "compile-check-";

/// Wrapper around an external compiler with a scoped output directory
#[derive(Debug)]
pub struct Compiler {
    command: String,
    global_args: Vec<String>,
    verbose: bool,
    /// Removed by [`Compiler::cleanup`], or on drop
    out_dir: TempDir,
}

/// One finished (or failed-to-start) compiler run
struct Invocation {
    argv: Vec<String>,
    status: io::Result<ExitStatus>,
    /// Captured stdout and stderr, interleaved as written
    output: String,
}

impl Invocation {
    fn succeeded(&self) -> bool {
        matches!(&self.status, Ok(status) if status.success())
    }

    fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

impl Compiler {
    /// Create a wrapper for `command` with arguments applied to every call.
    ///
    /// Creates the output directory immediately; that is the only way this
    /// can fail.
    pub fn new<I, S>(command: impl Into<String>, global_args: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let out_dir = tempfile::Builder::new().prefix(TEMP_DIR_PREFIX).tempdir()?;
        let compiler = Self {
            command: command.into(),
            global_args: global_args.into_iter().map(Into::into).collect(),
            verbose: false,
            out_dir,
        };
        tracing::debug!(
            command = %compiler.command,
            out_dir = %compiler.out_dir.path().display(),
            "created compiler wrapper"
        );
        Ok(compiler)
    }

    /// Create a wrapper from a [`HarnessConfig`]
    pub fn from_config(config: &HarnessConfig) -> io::Result<Self> {
        Ok(Self::new(&config.compiler, &config.global_args)?.verbose(config.verbose))
    }

    /// Print every command line and its captured output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn global_args(&self) -> &[String] {
        &self.global_args
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Directory that receives the build output
    pub fn out_dir(&self) -> &Path {
        self.out_dir.path()
    }

    fn output_path(&self) -> PathBuf {
        self.out_dir.path().join(OUTPUT_FILE)
    }

    fn build_argv(&self, source: &Path, extra_args: &[&str]) -> Vec<String> {
        let mut argv = Vec::with_capacity(4 + self.global_args.len() + extra_args.len());
        argv.push(self.command.clone());
        argv.push(OUTPUT_FLAG.to_string());
        argv.push(self.output_path().display().to_string());
        argv.extend(self.global_args.iter().cloned());
        argv.extend(extra_args.iter().map(|arg| arg.to_string()));
        argv.push(source.display().to_string());
        argv
    }

    /// Run the compiler with stdout and stderr sharing one pipe, so the
    /// captured text keeps the order the compiler wrote it in.
    fn run(&self, source: &Path, extra_args: &[&str]) -> io::Result<(ExitStatus, String)> {
        let (mut reader, writer) = io::pipe()?;
        let writer_err = writer.try_clone()?;

        // The Command holds the write ends until dropped; reading to EOF
        // needs every write end closed.
        let mut child = {
            let mut command = Command::new(&self.command);
            command
                .arg(OUTPUT_FLAG)
                .arg(self.output_path())
                .args(&self.global_args)
                .args(extra_args)
                .arg(source)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_err);
            command.spawn()?
        };

        let mut captured = Vec::new();
        let read = reader.read_to_end(&mut captured);
        let status = child.wait()?;
        read?;

        Ok((status, String::from_utf8_lossy(&captured).into_owned()))
    }

    fn invoke(&self, source: &Path, extra_args: &[&str]) -> Invocation {
        let argv = self.build_argv(source, extra_args);

        match self.run(source, extra_args) {
            Ok((status, output)) => Invocation {
                argv,
                status: Ok(status),
                output,
            },
            Err(err) => {
                let output = format!("failed to run '{}': {}", self.command, err);
                Invocation {
                    argv,
                    status: Err(err),
                    output,
                }
            }
        }
    }

    /// Check whether `source` compiles.
    ///
    /// `extra_args` go after the global arguments for this call only. Returns
    /// `false` for a non-zero exit and for a compiler that could not be
    /// started.
    #[tracing::instrument(skip_all, fields(source = %source.as_ref().display(), extra = extra_args.len()))]
    pub fn compiles(&self, source: impl AsRef<Path>, extra_args: &[&str]) -> bool {
        let invocation = self.invoke(source.as_ref(), extra_args);
        let success = invocation.succeeded();

        match &invocation.status {
            Ok(status) => tracing::debug!(command = %invocation.command_line(), %status, "compiler finished"),
            Err(err) => tracing::debug!(command = %invocation.command_line(), error = %err, "compiler did not start"),
        }

        if self.verbose {
            let verdict = if success { "successful" } else { "failed" };
            println!("Compilation {}: {}", verdict, invocation.command_line());
            println!("{}", invocation.output);
        }

        success
    }

    /// Check whether `source` fails to compile.
    ///
    /// Exactly `!self.compiles(source, extra_args)`: a compiler that could not
    /// be started counts as a failure too.
    pub fn compile_fails(&self, source: impl AsRef<Path>, extra_args: &[&str]) -> bool {
        !self.compiles(source, extra_args)
    }

    /// Delete the output directory and everything in it.
    pub fn cleanup(self) -> io::Result<()> {
        let path = self.out_dir.path().to_path_buf();
        self.out_dir.close().inspect_err(|err| {
            tracing::warn!(out_dir = %path.display(), error = %err, "failed to remove output directory");
        })
    }
}
