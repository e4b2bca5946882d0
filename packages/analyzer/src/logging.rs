//! Logging setup for binaries and tests embedding the analyzer
//!
//! The library only emits through the `log` facade. Configure levels with
//! `RUST_LOG`, for example `RUST_LOG=keyprobe_analyzer=debug`.

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Install `env_logger` once; later calls do nothing
pub fn init() {
    INIT_LOGGER.call_once(|| {
        let installed = env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .try_init();
        if installed.is_ok() {
            log::debug!("Logging initialized");
        }
    });
}

/// Install a logger that writes through the test harness
pub fn init_test() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}
