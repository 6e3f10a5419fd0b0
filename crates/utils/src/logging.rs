use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr fmt subscriber filtered by `RUST_LOG`, falling back to `default_directive`.
///
/// Stdout is left free for command output. Calling this more than once is a no-op.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
