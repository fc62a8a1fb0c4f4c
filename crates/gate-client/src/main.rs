//! gate-client
//!
//! Fetches an access token with the client-credentials grant and talks to a
//! toolgate endpoint with it. Logs go to stderr.

use clap::{Parser, Subcommand};
use gate_auth::TokenClaims;
use gate_client::{ClientProfile, Credentials, OAuthClient, Result, ToolApiClient, well_known_url};
use serde_json::Value;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "gate-client")]
#[command(author, version, about = "Call a toolgate endpoint with client-credentials tokens")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Which client credentials to use
    #[arg(short, long, global = true, value_enum, default_value_t = ClientProfile::All, env = "GATE_CLIENT_PROFILE")]
    profile: ClientProfile,

    /// OAuth2 token endpoint; discovered from metadata when omitted
    #[arg(long, global = true, env = "GATE_TOKEN_URL")]
    token_url: Option<Url>,

    /// Authorization server metadata document
    #[arg(long, global = true, env = "GATE_METADATA_URL")]
    metadata_url: Option<Url>,

    /// Tool endpoint
    #[arg(long, global = true, env = "GATE_API_URL")]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the authorization server metadata
    Metadata,

    /// Obtain a token and print it with its decoded claims
    Token,

    /// List the endpoint's tools
    ListTools,

    /// Invoke one tool
    Call {
        /// Tool name
        name: String,

        /// Arguments as JSON (object or array)
        #[arg(short, long, default_value = "{}")]
        args: String,

        /// Session to audit the call against
        #[arg(long)]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = gate_client::logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let oauth = OAuthClient::new()?;

    match &cli.command {
        Commands::Metadata => {
            let url = metadata_url(&cli)?;
            let metadata = oauth.fetch_metadata(&url).await?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Commands::Token => {
            let token = obtain_token(&cli, &oauth).await?;
            println!("Bearer {token}");
            match TokenClaims::decode(&token) {
                Ok(claims) => {
                    println!("{}", serde_json::to_string_pretty(claims.as_map())?);
                    println!("Scopes in token: {}", claims.scopes().join(" "));
                }
                Err(e) => tracing::warn!(error = %e, "Token payload is not inspectable"),
            }
        }
        Commands::ListTools => {
            let api = api_client(&cli, &oauth).await?;
            println!("{}", serde_json::to_string_pretty(&api.list_tools().await?)?);
        }
        Commands::Call {
            name,
            args,
            session,
        } => {
            let args: Value = serde_json::from_str(args)?;
            let mut api = api_client(&cli, &oauth).await?;
            if let Some(session) = session {
                api = api.with_session(session);
            }
            println!("{}", serde_json::to_string_pretty(&api.call_tool(name, args).await?)?);
        }
    }
    Ok(())
}

/// Explicit metadata URL, else the well-known document next to the API
fn metadata_url(cli: &Cli) -> Result<Url> {
    if let Some(url) = &cli.metadata_url {
        return Ok(url.clone());
    }
    match &cli.api_url {
        Some(api) => well_known_url(api),
        None => Err(gate_client::Error::config(
            "one of --metadata-url or --api-url is required",
        )),
    }
}

async fn obtain_token(cli: &Cli, oauth: &OAuthClient) -> Result<String> {
    let credentials = Credentials::from_env(cli.profile)?;
    let token_url = match &cli.token_url {
        Some(url) => url.clone(),
        None => oauth.discover_token_endpoint(&metadata_url(cli)?).await?,
    };
    Ok(oauth.request_token(&token_url, &credentials).await?.access_token)
}

async fn api_client(cli: &Cli, oauth: &OAuthClient) -> Result<ToolApiClient> {
    let endpoint = cli
        .api_url
        .clone()
        .ok_or_else(|| gate_client::Error::config("--api-url is required"))?;
    let token = obtain_token(cli, oauth).await?;
    ToolApiClient::new(endpoint, token)
}
