//! Tool registry
//!
//! Tools are declared once, with a typed parameter list, and registered into
//! a [`ToolRegistry`] that is then shared read-only.

mod arguments;
mod builtins;
mod store;
mod types;

pub use arguments::ToolArguments;
pub use builtins::{ServerProfile, builtin_descriptors};
pub use store::ToolRegistry;
pub use types::{ParamKind, ParamSpec, ToolDefinition, ToolDescriptor, ToolHandler, sync_handler};
