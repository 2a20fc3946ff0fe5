//! Tool Registry: stores tool descriptors together with their handlers

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::RegistryError;
use crate::schema::{self, InputSchema};

/// A tool handler: validated JSON arguments in, JSON result out
pub type ToolHandler = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// Public description of a tool as shown by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

pub(crate) struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub validator: jsonschema::Validator,
    pub handler: ToolHandler,
}

/// In-memory tool registry.
///
/// Names are unique: registering a name twice is rejected rather than
/// shadowing the earlier entry. Listing preserves registration order.
pub struct Registry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool descriptor and the handler that serves it
    pub fn register_tool<F>(
        &mut self,
        descriptor: ToolDescriptor,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        if self.index.contains_key(&descriptor.name) {
            error!("Rejected duplicate tool registration: {}", descriptor.name);
            return Err(RegistryError::Duplicate(descriptor.name));
        }

        let validator = schema::compile(&descriptor.input_schema).map_err(|message| {
            error!("Rejected tool {} with invalid schema: {message}", descriptor.name);
            RegistryError::InvalidSchema {
                tool: descriptor.name.clone(),
                message,
            }
        })?;

        info!("Registered tool: {}", descriptor.name);
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            validator,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Get a tool descriptor by name
    pub fn get_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entry(name).map(|t| &t.descriptor)
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// List every registered tool in registration order
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Get total tool count
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

/// Helper to create a ToolDescriptor
pub fn make_tool(name: &str, description: &str, input_schema: InputSchema) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}
