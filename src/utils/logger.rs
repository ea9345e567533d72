/// Initialise logging. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
