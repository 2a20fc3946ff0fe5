//! Error taxonomy for the tool boundary

use thiserror::Error;

/// Failure of a single tool invocation.
///
/// `NotFound` and `Validation` are detected before any handler runs.
/// `Handler` and `Timeout` come from the handler itself and are reported
/// back to the caller as an error-flagged result, never as a crash.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments for {tool}: {message}")]
    Validation { tool: String, message: String },

    #[error("{tool} failed: {message}")]
    Handler { tool: String, message: String },

    #[error("{tool} timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },
}

impl ToolError {
    /// Stable machine-readable tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::NotFound(_) => "tool_not_found",
            ToolError::Validation { .. } => "validation_error",
            ToolError::Handler { .. } => "handler_error",
            ToolError::Timeout { .. } => "timeout",
        }
    }

    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::Handler { .. } | ToolError::Timeout { .. })
    }
}

/// Failure while registering a tool.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    #[error("Invalid input schema for {tool}: {message}")]
    InvalidSchema { tool: String, message: String },
}
