use env_logger::Env;

/// Initialise `env_logger`; `RUST_LOG` always wins over the debug flag.
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}
