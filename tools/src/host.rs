//! Which tool set a process serves, and building the registry for it

use std::fmt;
use std::str::FromStr;

use crate::agent::AgentKind;
use crate::config::Config;
use crate::error::RegistryError;
use crate::orchestrator;
use crate::registry::Registry;

/// Tool set selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every enabled agent plus the orchestrator
    All,
    Agent(AgentKind),
    Orchestrator,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Selection::All),
            "orchestrator" => Ok(Selection::Orchestrator),
            other => other.parse().map(Selection::Agent),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Agent(kind) => write!(f, "{kind}"),
            Selection::Orchestrator => f.write_str("orchestrator"),
        }
    }
}

/// Register the tools for `selection`. A single agent named explicitly is
/// served even when the config disables it.
pub fn build_registry(selection: Selection, config: &Config) -> Result<Registry, RegistryError> {
    let mut reg = Registry::new();
    let enabled = config.enabled_agents();
    let framework = config.orchestrator.default_framework;

    match selection {
        Selection::All => {
            for agent in &enabled {
                agent.register_tools(&mut reg)?;
            }
            orchestrator::register_tools(&mut reg, enabled, framework)?;
        }
        Selection::Agent(agent) => agent.register_tools(&mut reg)?,
        Selection::Orchestrator => orchestrator::register_tools(&mut reg, enabled, framework)?,
    }

    Ok(reg)
}
