use env_logger::{Builder, Env};

/// Initialize env_logger for the binary and the engine crates.
///
/// `RUST_LOG` overrides the defaults. The `verbose` flag raises the engine
/// crates to debug.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "mascot=debug,mascot_core=debug,warn"
    } else {
        "mascot=info,mascot_core=info,warn"
    };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}
