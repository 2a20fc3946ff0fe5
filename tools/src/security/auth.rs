//! Authentication checks, one strategy per framework

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::csrf::is_controller;
use crate::findings::{line_of, Finding, Severity};
use crate::framework::Framework;

static AUTH_GATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"before_(?:action|filter)\s+:(?:authenticate\w*|require_login|require_user)")
        .expect("valid regex")
});

static HTTP_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:fetch|axios(?:\.(?:get|post|put|patch|delete|request))?)\s*\(")
        .expect("valid regex")
});

static MUTATION_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"class\s+\w+\s*<\s*(?:(?:Mutations|Types)::)?(?:BaseMutation|BaseResolver|GraphQL::Schema::(?:Mutation|RelayClassicMutation|Resolver))",
    )
    .expect("valid regex")
});

/// Outcome of an authentication check
#[derive(Debug, Clone, Serialize)]
pub struct AuthReport {
    pub framework: Framework,
    pub authenticated: bool,
    pub findings: Vec<Finding>,
}

pub fn check_authentication(code: &str, framework: Framework) -> AuthReport {
    let findings = match framework {
        Framework::Rails => check_rails(code),
        Framework::ReactNative => check_react_native(code),
        Framework::Graphql => check_graphql(code),
    };
    AuthReport {
        framework,
        authenticated: findings.is_empty(),
        findings,
    }
}

/// Controllers need either a `before_action :authenticate...` gate or an
/// explicit `authenticate` call somewhere in the body.
fn check_rails(code: &str) -> Vec<Finding> {
    if !is_controller(code) || AUTH_GATE.is_match(code) || code.contains("authenticate") {
        return Vec::new();
    }
    vec![Finding::new(
        "missing-authentication",
        Severity::High,
        "Controller has no authentication gate",
    )
    .with_recommendation(
        "Add `before_action :authenticate_user!` or an explicit authenticate call",
    )]
}

/// Outbound HTTP calls need an Authorization/Bearer header somewhere in the text
fn check_react_native(code: &str) -> Vec<Finding> {
    if code.contains("Authorization") || code.contains("Bearer") {
        return Vec::new();
    }
    HTTP_CALL
        .find_iter(code)
        .map(|m| {
            let call = m.as_str().trim_end_matches('(').trim();
            Finding::new(
                "missing-authorization-header",
                Severity::Medium,
                format!("HTTP call `{call}` sends no Authorization header"),
            )
            .with_recommendation("Attach `Authorization: Bearer <token>` from secure storage")
            .at_line(line_of(code, m.start()))
        })
        .collect()
}

/// Mutations need a `current_user` or `authorized?` check
fn check_graphql(code: &str) -> Vec<Finding> {
    if code.contains("current_user") || code.contains("authorized?") {
        return Vec::new();
    }
    MUTATION_CLASS
        .find_iter(code)
        .map(|m| {
            Finding::new(
                "missing-authorization",
                Severity::High,
                "Mutation does not check the current user",
            )
            .with_recommendation("Check `context[:current_user]` or define `authorized?`")
            .at_line(line_of(code, m.start()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rails_controller_without_gate() {
        let code = "class PostsController < ApplicationController\n  def index; end\nend";
        let report = check_authentication(code, Framework::Rails);
        assert!(!report.authenticated);
        assert_eq!(report.findings[0].kind, "missing-authentication");
        assert_eq!(report.findings[0].severity, Severity::High);
    }

    #[test]
    fn test_rails_controller_with_gate() {
        let code = "class PostsController < ApplicationController\n  before_action :authenticate_user!\nend";
        assert!(check_authentication(code, Framework::Rails).authenticated);
    }

    #[test]
    fn test_rails_controller_with_explicit_call() {
        let code = "class SessionsController < ApplicationController\n  def create\n    user.authenticate(params[:password])\n  end\nend";
        assert!(check_authentication(code, Framework::Rails).authenticated);
    }

    #[test]
    fn test_rails_non_controller_ignored() {
        let model = "class User < ApplicationRecord\nend";
        assert!(check_authentication(model, Framework::Rails).authenticated);
    }

    #[test]
    fn test_react_native_calls_without_header() {
        let code = "const load = async () => {\n  const res = await fetch(url);\n  await axios.post(url, body);\n};";
        let report = check_authentication(code, Framework::ReactNative);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].line, Some(2));
        assert_eq!(report.findings[1].line, Some(3));
    }

    #[test]
    fn test_react_native_with_bearer_header() {
        let code = "fetch(url, { headers: { Authorization: `Bearer ${token}` } });";
        assert!(check_authentication(code, Framework::ReactNative).authenticated);
    }

    #[test]
    fn test_graphql_mutation_without_user_check() {
        let code = "module Mutations\n  class CreatePost < BaseMutation\n    def resolve(title:)\n      Post.create!(title: title)\n    end\n  end\nend";
        let report = check_authentication(code, Framework::Graphql);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].line, Some(2));
    }

    #[test]
    fn test_graphql_mutation_with_user_check() {
        let code = "class CreatePost < Mutations::BaseMutation\n  def resolve\n    raise unless context[:current_user]\n  end\nend";
        assert!(check_authentication(code, Framework::Graphql).authenticated);
    }
}
