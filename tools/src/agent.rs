//! Agent kinds and the per-agent report merged by the orchestrator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;
use crate::findings::Finding;
use crate::framework::Framework;
use crate::registry::Registry;
use crate::{clean_code, docs, practices, security, testgen};

/// One capability domain with its own tool set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Security,
    BestPractices,
    CleanCode,
    Documentation,
    TestGenerator,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Security,
        AgentKind::BestPractices,
        AgentKind::CleanCode,
        AgentKind::Documentation,
        AgentKind::TestGenerator,
    ];

    pub const NAMES: [&'static str; 5] = [
        "security",
        "best_practices",
        "clean_code",
        "documentation",
        "test_generator",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Security => "security",
            AgentKind::BestPractices => "best_practices",
            AgentKind::CleanCode => "clean_code",
            AgentKind::Documentation => "documentation",
            AgentKind::TestGenerator => "test_generator",
        }
    }

    /// Register this agent's fixed tool set
    pub fn register_tools(&self, reg: &mut Registry) -> Result<(), RegistryError> {
        match self {
            AgentKind::Security => security::register_tools(reg),
            AgentKind::BestPractices => practices::register_tools(reg),
            AgentKind::CleanCode => clean_code::register_tools(reg),
            AgentKind::Documentation => docs::register_tools(reg),
            AgentKind::TestGenerator => testgen::register_tools(reg),
        }
    }

    /// Run this agent's review over one input
    pub fn review(&self, code: &str, framework: Framework) -> AgentReport {
        match self {
            AgentKind::Security => security::review(code, framework),
            AgentKind::BestPractices => practices::review(code, framework),
            AgentKind::CleanCode => clean_code::review(code),
            AgentKind::Documentation => docs::review(code),
            AgentKind::TestGenerator => testgen::review(code, framework),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "security" => Ok(AgentKind::Security),
            "best_practices" | "practices" => Ok(AgentKind::BestPractices),
            "clean_code" => Ok(AgentKind::CleanCode),
            "documentation" | "docs" => Ok(AgentKind::Documentation),
            "test_generator" | "tests" => Ok(AgentKind::TestGenerator),
            other => Err(format!("Unknown agent: {other}")),
        }
    }
}

/// What one agent contributes to a full analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReport {
    pub agent: AgentKind,
    /// `None` for agents that generate rather than grade
    pub score: Option<u32>,
    pub issues: Vec<Finding>,
}
