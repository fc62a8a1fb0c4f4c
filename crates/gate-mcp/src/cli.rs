//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::registry::ServerProfile;

/// Authorized, session-audited tool gateway
#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML config file; environment variables override its values
    #[arg(short, long, global = true, env = "TOOLGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve MCP (JSON-RPC 2.0) over stdio
    Serve {
        /// Tool set to expose; overrides the configured profile
        #[arg(short, long, value_enum)]
        profile: Option<ServerProfile>,
    },

    /// Authorize and dispatch gateway requests, one JSON object per line
    ///
    /// Each stdin line is `{"headers": {...}, "methodArn": "...", "body": {...}}`;
    /// each stdout line is `{"statusCode": ..., "body": ...}`.
    Gateway {
        /// Tool set to expose; overrides the configured profile
        #[arg(short, long, value_enum)]
        profile: Option<ServerProfile>,
    },

    /// Decide one authorizer event
    ///
    /// Reads `{"headers": {...}, "methodArn": "..."}` and prints the policy
    /// document. A Deny is still a successful run.
    Authorize {
        /// Event file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List the tools a server would expose
    ListTools {
        #[arg(short, long, value_enum)]
        profile: Option<ServerProfile>,

        /// Print the discovery listing as JSON
        #[arg(long)]
        json: bool,
    },
}
