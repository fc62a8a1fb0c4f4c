//! Authorized, session-audited tool gateway
//!
//! ```text
//! [ caller ] --Authorization: Bearer--> [ Gateway ]
//!                                         |  Authorizer (gate-auth): Allow / Deny(403)
//!                                         v
//!                                  [ ToolDispatcher ]
//!                                         |  bind args against the declared params
//!                                         v
//!                                  [ AuditedHandler ] --> SessionStore (gate-session)
//!                                         |
//!                                         v
//!                                  [ tool handler ] --> ProductCatalog (gate-catalog)
//! ```
//!
//! The same dispatcher also sits behind [`McpServer`], a JSON-RPC 2.0 stdio
//! server speaking the MCP `initialize` / `tools/list` / `tools/call` subset.
//!
//! # Tools
//!
//! - `add_two_numbers(a, b)`
//! - `fetch_all_products()`
//! - `filter_by_price_range(min_price, max_price)`
//! - `filter_by_stock_availability(min_stock)`

pub mod audit;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod server;

pub use audit::{ARGUMENTS_ATTR, AuditedHandler, FUNCTION_ATTR, InvocationContext, RESULT_ATTR};
pub use config::GatewayConfig;
pub use dispatcher::{DispatchRequest, ToolDispatcher, error_response};
pub use error::{Error, Result};
pub use gateway::{Gateway, GatewayRequest, GatewayResponse, SESSION_HEADER};
pub use protocol::{ToolContent, ToolResult};
pub use registry::{
    ParamKind, ParamSpec, ServerProfile, ToolArguments, ToolDefinition, ToolDescriptor,
    ToolHandler, ToolRegistry, sync_handler,
};
pub use server::McpServer;
