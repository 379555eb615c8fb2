//! Shared test infrastructure: a fake compiler and fixture paths
//!
//! The fake compiler is a POSIX shell script that behaves like a minimal
//! `cc`:
//! - `--version` prints a version line and exits 0
//! - otherwise expects `-o <out> ... <source>`
//! - writes its arguments, one per line, to `<out>.args`
//! - fails if the source is missing, contains `COMPILE_ERROR`, or any
//!   argument is `-fail-all`
//! - on `-interleave`, writes `ERR1` to stderr and then `OUT2` to stdout
//! - otherwise writes `<out>` and exits 0

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;

const FAKE_COMPILER: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "fakecc 1.0.0"
  exit 0
fi
out="$2"
printf '%s\n' "$@" > "$out.args"
for arg in "$@"; do
  if [ "$arg" = "-interleave" ]; then
    echo "fakecc: ERR1" >&2
    echo "fakecc: OUT2"
  fi
  if [ "$arg" = "-fail-all" ]; then
    echo "fakecc: forced failure" >&2
    exit 1
  fi
  src="$arg"
done
if [ ! -f "$src" ]; then
  echo "fakecc: $src: No such file or directory" >&2
  exit 1
fi
if grep -q COMPILE_ERROR "$src"; then
  echo "$src:1: error: COMPILE_ERROR" >&2
  exit 2
fi
echo "compiled $src"
echo "binary" > "$out"
exit 0
"#;

struct Scratch {
    _dir: TempDir,
    compiler: PathBuf,
    good: PathBuf,
    bad: PathBuf,
}

/// Written once per test binary so no test execs a file another thread is
/// still writing.
fn scratch() -> &'static Scratch {
    static SCRATCH: OnceLock<Scratch> = OnceLock::new();
    SCRATCH.get_or_init(|| {
        let dir = tempfile::Builder::new()
            .prefix("compile-check-tests-")
            .tempdir()
            .expect("create scratch dir");

        let compiler = dir.path().join("fakecc");
        fs::write(&compiler, FAKE_COMPILER).expect("write fake compiler");
        make_executable(&compiler);

        let good = dir.path().join("good.c");
        fs::write(&good, "int main(void) { return 0; }\n").expect("write good source");
        let bad = dir.path().join("bad.c");
        fs::write(&bad, "int main(void) { COMPILE_ERROR }\n").expect("write bad source");

        Scratch {
            _dir: dir,
            compiler,
            good,
            bad,
        }
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod fake compiler");
}

/// Path to the fake compiler, usable as a compiler command
pub fn fake_compiler() -> String {
    scratch().compiler.display().to_string()
}

/// A source the fake compiler accepts
pub fn good_source() -> &'static Path {
    &scratch().good
}

/// A source the fake compiler rejects
pub fn bad_source() -> &'static Path {
    &scratch().bad
}

/// Arguments the fake compiler received on its last run through `out_dir`
pub fn recorded_args(out_dir: &Path) -> Vec<String> {
    fs::read_to_string(out_dir.join("a.out.args"))
        .expect("fake compiler did not record its arguments")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Path to a file under `tests/fixtures`
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}
