//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn, LevelFilter};

/// Initialize logging with a default level that `RUST_LOG` can still override
pub fn init_with_level(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Initialize logging for tests; safe to call more than once
pub fn try_init() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}
