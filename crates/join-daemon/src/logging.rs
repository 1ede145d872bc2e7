use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Respects `RUST_LOG`; otherwise defaults to info (or debug with `verbose`).
/// Logs go to stderr so launched processes share the console's terminal.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "debug,join_daemon=debug,join_core=debug"
    } else {
        "info,join_daemon=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
