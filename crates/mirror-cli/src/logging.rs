use tracing_subscriber::EnvFilter;

/// Log to stderr when `MIRROR_LOG` (or `RUST_LOG`) is set; stay silent otherwise.
pub fn init() {
    let filter = match std::env::var("MIRROR_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
