//! Code-review agents served as tools.
//!
//! Each agent (security, best practices, clean code, documentation, test
//! generation) owns a few tools backed by text heuristics. Tools live in a
//! [`registry::Registry`], are invoked through [`executor::Executor`] and
//! exposed over newline-delimited JSON-RPC by [`server::Server`].

pub mod agent;
pub mod clean_code;
pub mod config;
pub mod docs;
pub mod error;
pub mod executor;
pub mod findings;
pub mod framework;
pub mod host;
pub mod orchestrator;
pub mod practices;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod security;
pub mod server;
pub mod testgen;

pub use agent::{AgentKind, AgentReport};
pub use error::{RegistryError, ToolError};
pub use executor::{Executor, ToolOutput, ToolRequest};
pub use findings::{Finding, Severity};
pub use framework::{Framework, Language};
pub use registry::{Registry, ToolDescriptor};
