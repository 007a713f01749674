//! Tracing setup for host applications and tests.

use tracing_subscriber::EnvFilter;

/// Where formatted events go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// The test harness writer, so output is captured per test.
    TestHarness,
}

/// Install a `fmt` subscriber on stdout, filtered by `RUST_LOG`.
///
/// Falls back to `default_filter` (e.g. `"loadforecast=info"`) when `RUST_LOG`
/// is unset. Calling it again is harmless: only the first call installs.
///
/// ```
/// loadforecast_client::telemetry::init_tracing("loadforecast=debug");
/// tracing::info!("visible once a subscriber is installed");
///
/// // Already installed; this is a no-op.
/// loadforecast_client::telemetry::init_tracing("warn");
/// ```
pub fn init_tracing(default_filter: &str) {
    install(default_filter, LogOutput::Stdout);
}

/// [`init_tracing`] with an explicit output.
pub fn install(default_filter: &str, output: LogOutput) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match output {
        LogOutput::Stdout => builder.try_init(),
        LogOutput::TestHarness => builder.with_test_writer().try_init(),
    };
    if installed.is_err() {
        tracing::trace!("Tracing subscriber already installed");
    }
}
