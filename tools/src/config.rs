//! Server configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::agent::AgentKind;
use crate::framework::Framework;

pub const DEFAULT_CONFIG_PATH: &str = "config/agents.json";
pub const CONFIG_ENV: &str = "MVP_AGENTS_CONFIG";

/// Root configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Per-agent switches keyed by agent name; agents not listed are enabled
    #[serde(default)]
    pub agents: BTreeMap<String, AgentToggle>,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_handler_timeout")]
    pub handler_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            handler_timeout_ms: default_handler_timeout(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct AgentToggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_framework")]
    pub default_framework: Framework,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_framework: default_framework(),
        }
    }
}

fn default_handler_timeout() -> u64 {
    10_000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_true() -> bool {
    true
}
fn default_framework() -> Framework {
    Framework::Rails
}

impl Config {
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.server.handler_timeout_ms)
    }

    pub fn is_enabled(&self, agent: AgentKind) -> bool {
        self.agents
            .iter()
            .find(|(name, _)| name.parse::<AgentKind>().ok() == Some(agent))
            .map_or(true, |(_, toggle)| toggle.enabled)
    }

    /// Enabled agents in kind order
    pub fn enabled_agents(&self) -> Vec<AgentKind> {
        AgentKind::ALL
            .into_iter()
            .filter(|a| self.is_enabled(*a))
            .collect()
    }

    /// Names under `agents` that do not name a known agent
    pub fn unknown_agents(&self) -> Vec<&str> {
        self.agents
            .keys()
            .filter(|name| name.parse::<AgentKind>().is_err())
            .map(String::as_str)
            .collect()
    }
}

/// Config location: explicit path, then `MVP_AGENTS_CONFIG`, then the default
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Parse configuration text; `.toml` paths are TOML, everything else JSON
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config: Config = if is_toml {
        toml::from_str(content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?
    };

    Ok(config)
}

/// Configuration together with the file it was read from
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// False when the file was missing and defaults were used
    pub found: bool,
}

impl LoadedConfig {
    /// Report the config source and ignored entries. Call once logging is up.
    pub fn log_summary(&self) {
        if self.found {
            info!("Loaded config from {}", self.path.display());
        } else {
            warn!("Config file not found at {}, using defaults", self.path.display());
        }
        for name in self.config.unknown_agents() {
            warn!("Ignoring unknown agent in config: {name}");
        }
    }
}

/// Load configuration; a missing file yields defaults
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let path = resolve_path(explicit);

    if !path.exists() {
        return Ok(LoadedConfig {
            config: Config::default(),
            path,
            found: false,
        });
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = parse(&content, &path)?;
    Ok(LoadedConfig {
        config,
        path,
        found: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.handler_timeout_ms, 10_000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, LogFormat::Compact);
        assert_eq!(config.orchestrator.default_framework, Framework::Rails);
        assert_eq!(config.enabled_agents(), AgentKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "server": {"handler_timeout_ms": 2500, "log_format": "json"},
            "agents": {"clean_code": {"enabled": false}, "security": {}},
            "orchestrator": {"default_framework": "react-native"}
        }"#;
        let config = parse(json, Path::new("agents.json")).unwrap();
        assert_eq!(config.handler_timeout(), Duration::from_millis(2500));
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert!(!config.is_enabled(AgentKind::CleanCode));
        assert!(config.is_enabled(AgentKind::Security));
        assert_eq!(config.enabled_agents().len(), 4);
        assert_eq!(config.orchestrator.default_framework, Framework::ReactNative);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[server]
log_level = "debug"

[agents.documentation]
enabled = false
"#;
        let config = parse(toml_str, Path::new("agents.toml")).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert!(!config.is_enabled(AgentKind::Documentation));
    }

    #[test]
    fn test_agent_aliases_and_unknown_names() {
        let config = parse(
            r#"{"agents": {"docs": {"enabled": false}, "linter": {"enabled": false}}}"#,
            Path::new("c.json"),
        )
        .unwrap();
        assert!(!config.is_enabled(AgentKind::Documentation));
        assert_eq!(config.unknown_agents(), vec!["linter"]);
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        let err = parse("{not json", Path::new("c.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_unknown_framework_rejected() {
        let json = r#"{"orchestrator": {"default_framework": "django"}}"#;
        assert!(parse(json, Path::new("c.json")).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"server": {{"handler_timeout_ms": 50}}}}"#).unwrap();

        let loaded = load_config(Some(file.path())).unwrap();
        assert!(loaded.found);
        assert_eq!(loaded.path, file.path());
        assert_eq!(loaded.config.server.handler_timeout_ms, 50);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.json"))).unwrap();
        assert!(!loaded.found);
        assert_eq!(loaded.config.server.handler_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_keeps_unknown_agents_for_reporting() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"agents": {{"linter": {{"enabled": false}}}}}}"#).unwrap();

        let loaded = load_config(Some(file.path())).unwrap();
        assert!(loaded.found);
        assert_eq!(loaded.config.unknown_agents(), vec!["linter"]);
        assert_eq!(loaded.config.enabled_agents(), AgentKind::ALL.to_vec());
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_path(Some(Path::new("/tmp/explicit.toml")));
        assert_eq!(path, PathBuf::from("/tmp/explicit.toml"));
    }
}
