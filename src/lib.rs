#![forbid(unsafe_code)]
//! compile-check: a compile-test harness
//!
//! Shells out to an external compiler to verify that source files compile,
//! or fail to compile, and reports the results pytest-style.
//!
//! ```no_run
//! use compile_check::{Compiler, check_compiler_exists};
//!
//! assert!(check_compiler_exists("g++"));
//! let compiler = Compiler::new("g++", ["-std=c++20"])?;
//! assert!(compiler.compiles("tests/fixtures/valid.cpp", &[]));
//! assert!(compiler.compile_fails("tests/fixtures/invalid_syntax.cpp", &[]));
//! compiler.cleanup()?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod probe;
pub mod version;

pub use compiler::Compiler;
pub use config::HarnessConfig;
pub use probe::check_compiler_exists;
