/// Intercept messages using the `log` crate and print them to STDERR, defaulting to the `info`
/// level. `RUST_LOG` overrides that. Safe to call more than once; only the first call does
/// anything.
pub fn setup() {
    use env_logger::{Builder, Env};
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}
