//! Hardcoded secret heuristic: credential-named bindings assigned string literals

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::findings::{line_of, Finding, Severity};

static SECRET_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b([a-z0-9_]*(?:password|passwd|pwd|api[_-]?key|apikey|secret|token)[a-z0-9_]*)\b["']?\s*(?:=>|=|:)\s*["']([^"'\n]{3,})["']"#,
    )
    .expect("valid regex")
});

/// What kind of credential a binding name suggests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretType {
    Password,
    ApiKey,
    Token,
    Secret,
}

impl SecretType {
    fn classify(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("password") || name.contains("passwd") || name.contains("pwd") {
            SecretType::Password
        } else if name.contains("api_key") || name.contains("apikey") || name.contains("api-key") {
            SecretType::ApiKey
        } else if name.contains("token") {
            SecretType::Token
        } else {
            SecretType::Secret
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SecretType::Password => "password",
            SecretType::ApiKey => "API key",
            SecretType::Token => "token",
            SecretType::Secret => "secret",
        }
    }
}

/// One hardcoded credential occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretMatch {
    pub secret_type: SecretType,
    pub name: String,
    pub line: usize,
    pub offset: usize,
    /// Masked value, never the literal itself
    pub preview: String,
}

/// Find every credential-like assignment of a quoted literal
pub fn detect(code: &str) -> Vec<SecretMatch> {
    SECRET_ASSIGNMENT
        .captures_iter(code)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some(SecretMatch {
                secret_type: SecretType::classify(name),
                name: name.to_string(),
                line: line_of(code, whole.start()),
                offset: whole.start(),
                preview: mask(value),
            })
        })
        .collect()
}

/// One finding per detected secret
pub fn to_findings(secrets: &[SecretMatch]) -> Vec<Finding> {
    secrets
        .iter()
        .map(|s| {
            Finding::new(
                "hardcoded-secrets",
                Severity::Critical,
                format!("Hardcoded {} in `{}`", s.secret_type.label(), s.name),
            )
            .with_recommendation("Load credentials from ENV or encrypted credentials instead")
            .at_line(s.line)
        })
        .collect()
}

fn mask(value: &str) -> String {
    let head: String = value.chars().take(2).collect();
    format!("{head}****")
}
