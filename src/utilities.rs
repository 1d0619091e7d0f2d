//! Utilities.
use std::panic;
use std::process;

use log::LevelFilter;

/// Log to stderr with microsecond timestamps, at `level` and above.
///
/// `RUST_LOG` still applies on top of the given level.
pub fn configure_logger(level: LevelFilter) {
    env_logger::builder()
        .filter_level(level)
        .format_timestamp_micros()
        .parse_default_env()
        .init();
}

/// Exit the whole process when any thread panics, instead of only the panicking thread.
pub fn exit_process_on_panic() {
    let orig_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        process::exit(1);
    }));
}

/// Raise `level` to at least `debug` in verbose mode.
pub fn effective_log_level(level: LevelFilter, verbose: bool) -> LevelFilter {
    if verbose {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}
