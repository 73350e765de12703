use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. An explicit filter wins over `RUST_LOG`;
/// with neither, only warnings are shown.
pub fn init(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|err| anyhow!("invalid log filter '{directives}': {err}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("cannot install log subscriber: {err}"))
}
