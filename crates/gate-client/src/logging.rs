use tracing_subscriber::EnvFilter;

/// Initialize a stderr subscriber; `RUST_LOG` wins over `verbose`
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fallback = if verbose {
        "gate_client=debug"
    } else {
        "gate_client=info"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
