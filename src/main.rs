//! compile-check CLI entry point

fn main() -> std::process::ExitCode {
    // Structured logging with env-based filter; quiet by default so only
    // harness output reaches the console
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    compile_check::cli::run()
}
