//! Security agent: SQL injection, XSS, hardcoded secrets, CSRF and authentication checks.
//!
//! Every detector is a pure function over the source text; `scan` runs the
//! fixed battery and scores the result.

pub mod auth;
pub mod csrf;
pub mod secrets;
pub mod sql_injection;
pub mod xss;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentReport};
use crate::error::RegistryError;
use crate::findings::{risk_score, severity_counts, Finding, SeverityCounts};
use crate::framework::{Framework, Language};
use crate::registry::{make_tool, Registry};
use crate::schema::{parse_input, serialize_output, InputSchema, PropertySchema};

pub use auth::{check_authentication, AuthReport};
pub use secrets::{SecretMatch, SecretType};

/// Result of a full security scan
#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub language: Language,
    pub vulnerabilities: Vec<Finding>,
    pub secrets: Vec<SecretMatch>,
    pub risk_score: u32,
    pub summary: SeverityCounts,
}

/// Run every text heuristic over `code`
pub fn scan(code: &str, language: Option<Language>) -> SecurityReport {
    let secrets = secrets::detect(code);

    let mut vulnerabilities = sql_injection::detect(code);
    vulnerabilities.extend(xss::detect(code));
    vulnerabilities.extend(secrets::to_findings(&secrets));
    vulnerabilities.extend(csrf::detect(code));

    SecurityReport {
        language: language.unwrap_or_else(|| Language::detect(code)),
        risk_score: risk_score(&vulnerabilities),
        summary: severity_counts(&vulnerabilities),
        vulnerabilities,
        secrets,
    }
}

/// Security contribution to a full analysis: scan plus the framework's
/// authentication check, scored as `100 - risk`.
pub fn review(code: &str, framework: Framework) -> AgentReport {
    let mut issues = scan(code, Some(framework.language())).vulnerabilities;
    issues.extend(check_authentication(code, framework).findings);
    AgentReport {
        agent: AgentKind::Security,
        score: Some(100 - risk_score(&issues)),
        issues,
    }
}

#[derive(Deserialize)]
struct ScanInput {
    code: String,
    #[serde(default)]
    language: Option<Language>,
}

#[derive(Deserialize)]
struct AuthInput {
    code: String,
    framework: Framework,
}

#[derive(Deserialize)]
struct SecretsInput {
    code: String,
}

#[derive(Serialize)]
struct SecretsOutput {
    found: usize,
    secrets: Vec<SecretMatch>,
}

fn code_property() -> PropertySchema {
    PropertySchema::string("Source code to analyze")
}

/// Register every security tool with the registry.
pub fn register_tools(reg: &mut Registry) -> Result<(), RegistryError> {
    reg.register_tool(
        make_tool(
            "scan_security",
            "Scan code for SQL injection, XSS, hardcoded secrets and missing CSRF protection",
            InputSchema::object().required("code", code_property()).optional(
                "language",
                PropertySchema::string("Source language; detected when omitted")
                    .one_of(&Language::NAMES),
            ),
        ),
        execute_scan,
    )?;

    reg.register_tool(
        make_tool(
            "check_authentication",
            "Check that controllers, HTTP calls or mutations are authenticated for the given framework",
            InputSchema::object().required("code", code_property()).required(
                "framework",
                PropertySchema::string("Target framework").one_of(&Framework::NAMES),
            ),
        ),
        execute_check_authentication,
    )?;

    reg.register_tool(
        make_tool(
            "detect_secrets",
            "List hardcoded passwords, API keys, tokens and secrets with their positions",
            InputSchema::object().required("code", code_property()),
        ),
        execute_detect_secrets,
    )?;

    Ok(())
}

fn execute_scan(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: ScanInput = parse_input(input)?;
    serialize_output(&scan(&input.code, input.language))
}

fn execute_check_authentication(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: AuthInput = parse_input(input)?;
    serialize_output(&check_authentication(&input.code, input.framework))
}

fn execute_detect_secrets(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: SecretsInput = parse_input(input)?;
    let secrets = secrets::detect(&input.code);
    serialize_output(&SecretsOutput {
        found: secrets.len(),
        secrets,
    })
}
