use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default directives when `RUST_LOG` is unset
const DEFAULT_DIRECTIVES: &str = "toolgate=info,gate_mcp=info,gate_auth=info,gate_session=info,gate_catalog=info";
const VERBOSE_DIRECTIVES: &str = "toolgate=debug,gate_mcp=debug,gate_auth=debug,gate_session=debug,gate_catalog=debug";

/// Initialize a tracing subscriber writing to stderr.
///
/// stdout is reserved for protocol output. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let fallback = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
