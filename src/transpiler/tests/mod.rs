//! Translator tests.

mod features;

/// Route translator events to the test output; `RUST_LOG=qir=trace` to see them.
pub(super) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
