//! Shared test setup. Not a test target itself (cargo skips `tests/<dir>/mod.rs`).

/// Initializes a `tracing` subscriber writing to the test harness's captured output.
/// Safe to call from every test — `try_init` is a no-op after the first call.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
