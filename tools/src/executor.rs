//! Tool execution pipeline
//!
//! Pipeline: look up tool → validate arguments → run handler (blocking pool,
//! timeout) → wrap result

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ToolError;
use crate::registry::Registry;
use crate::schema;

/// Default per-invocation handler budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A call to a tool by name
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub tool_name: String,
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(tool_name: &str, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            arguments,
        }
    }
}

/// Successful tool result
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub execution_id: String,
    pub tool: String,
    pub duration_ms: u64,
    pub content: Value,
}

/// Executes tools from a registry
pub struct Executor {
    timeout: Duration,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute a tool through the full pipeline.
    ///
    /// Unknown names and invalid arguments fail before the handler is
    /// touched. A handler that errors, panics or overruns the timeout is
    /// reported as a handler-level error; a timed-out handler keeps running
    /// on the blocking pool but its result is discarded.
    pub async fn execute(
        &self,
        registry: &Registry,
        request: ToolRequest,
    ) -> Result<ToolOutput, ToolError> {
        let execution_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        // 1. Check tool exists
        let tool = registry.entry(&request.tool_name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", request.tool_name);
            ToolError::NotFound(request.tool_name.clone())
        })?;

        // 2. Validate arguments against the declared schema
        let arguments = match request.arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        schema::validate(&tool.validator, &arguments).map_err(|message| {
            warn!("Rejected arguments for {}: {message}", request.tool_name);
            ToolError::Validation {
                tool: request.tool_name.clone(),
                message,
            }
        })?;

        info!(
            "Executing: tool={} execution_id={}",
            request.tool_name, execution_id
        );

        // 3. Run the handler off the async workers
        let handler = Arc::clone(&tool.handler);
        let task = tokio::task::spawn_blocking(move || handler(arguments));

        let content = match tokio::time::timeout(self.timeout, task).await {
            Err(_) => {
                let err = ToolError::Timeout {
                    tool: request.tool_name.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                };
                warn!("{err}");
                return Err(err);
            }
            Ok(Err(join_error)) => {
                let err = ToolError::Handler {
                    tool: request.tool_name.clone(),
                    message: format!("handler panicked: {join_error}"),
                };
                warn!("{err}");
                return Err(err);
            }
            Ok(Ok(Err(e))) => {
                let err = ToolError::Handler {
                    tool: request.tool_name.clone(),
                    message: format!("{e:#}"),
                };
                warn!("{err}");
                return Err(err);
            }
            Ok(Ok(Ok(content))) => content,
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Completed: tool={} execution_id={} duration_ms={}",
            request.tool_name, execution_id, duration_ms
        );

        Ok(ToolOutput {
            execution_id,
            tool: request.tool_name,
            duration_ms,
            content,
        })
    }
}
