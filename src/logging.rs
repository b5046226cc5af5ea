//! Logging configuration using tracing
//!
//! Logs go to stderr so JSON printed by the CLI stays clean on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Filtering follows `RUST_LOG` and defaults to `warn`.
///
/// # Example RUST_LOG values
/// - `RUST_LOG=info` - uploads and dispatched messages
/// - `RUST_LOG=checkwriter=debug` - every API request
/// - `RUST_LOG=checkwriter=debug,reqwest=trace` - include HTTP client internals
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init() -> crate::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| {
            crate::CheckWriterError::Other(format!("Failed to initialize tracing: {}", e))
        })?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}
