//! Harness configuration
//!
//! Which compiler to run, the arguments passed on every invocation, and
//! whether invocations are echoed to the console.

/// Compiler used when none is configured.
pub const DEFAULT_COMPILER: &str = "g++";

/// Configuration for a compile-test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Compiler command name or path
    pub compiler: String,
    /// Arguments passed verbatim, in order, to every invocation
    pub global_args: Vec<String>,
    /// Print each command line and its captured output
    pub verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            global_args: Vec::new(),
            verbose: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compiler command
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Append one global argument
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.global_args.push(arg.into());
        self
    }

    /// Append several global arguments, keeping their order
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set verbosity
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
