//! toolgate
//!
//! Authorized, session-audited tool gateway.
//!
//! # Usage
//!
//! ```bash
//! toolgate serve [--profile math|catalog|all]
//! toolgate gateway [--profile math|catalog|all]
//! toolgate authorize [--input event.json]
//! toolgate list-tools [--json]
//! ```
//!
//! # Environment Variables
//!
//! - `DUMMY_BEARER_TOKEN`: expected bearer secret
//! - `SESSION_TABLE_NAME`, `TOOLGATE_SESSION_DIR`, `TOOLGATE_SESSION_TTL_SECS`: session storage
//! - `TOOLGATE_CATALOG_URL`, `TOOLGATE_PROFILE`: tools
//! - `RUST_LOG`: log verbosity (logs go to stderr)

use std::io::Read;
use std::path::Path;

use clap::Parser;
use gate_auth::AuthorizerEvent;
use gate_mcp::cli::{Cli, Commands};
use gate_mcp::{GatewayConfig, McpServer, Result, ServerProfile};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = gate_mcp::logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "toolgate failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = GatewayConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { profile } => {
            apply_profile(&mut config, profile);
            tracing::info!(profile = %config.server.profile, "Starting toolgate server");
            let mut server = McpServer::new(config.dispatcher()?);
            server.run().await
        }
        Commands::Gateway { profile } => {
            apply_profile(&mut config, profile);
            tracing::info!(profile = %config.server.profile, "Starting toolgate gateway");
            config.gateway()?.run().await
        }
        Commands::Authorize { input } => authorize(&config, input.as_deref()),
        Commands::ListTools { profile, json } => {
            apply_profile(&mut config, profile);
            list_tools(&config, json)
        }
    }
}

fn apply_profile(config: &mut GatewayConfig, profile: Option<ServerProfile>) {
    if let Some(profile) = profile {
        config.server.profile = profile;
    }
}

fn authorize(config: &GatewayConfig, input: Option<&Path>) -> Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: AuthorizerEvent = serde_json::from_str(&raw)?;
    let decision = config.authorizer()?.authorize(&event);
    println!("{}", serde_json::to_string_pretty(&decision.to_response())?);
    Ok(())
}

fn list_tools(config: &GatewayConfig, json: bool) -> Result<()> {
    let definitions = config.registry()?.definitions();
    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }
    for def in definitions {
        println!("{:<30} {}", def.name, def.description);
    }
    Ok(())
}
