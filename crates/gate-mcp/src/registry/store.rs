//! Tool registry storage

use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::{ToolDefinition, ToolDescriptor};
use crate::audit::AuditedHandler;
use crate::{Error, Result};

/// Name-keyed set of tools, built once at startup and shared read-only.
///
/// Every handler is wrapped in an [`AuditedHandler`] when it is registered,
/// so all invocations through the registry are session-audited.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, rejecting a name that is already taken.
    pub fn register(&mut self, mut descriptor: ToolDescriptor) -> Result<()> {
        if self.tools.contains_key(&descriptor.name) {
            return Err(Error::DuplicateName(descriptor.name));
        }
        descriptor.handler = Arc::new(AuditedHandler::new(
            descriptor.name.clone(),
            descriptor.handler,
        ));
        tracing::debug!(tool = %descriptor.name, "Registered tool");
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names (sorted).
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Discovery listing, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(ToolDescriptor::definition).collect()
    }
}
