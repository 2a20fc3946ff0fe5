//! Best-practices agent: per-framework rule batteries, canned guidance and
//! optimization suggestions.

pub mod examples;
pub mod graphql;
pub mod optimizations;
pub mod rails;
pub mod react_native;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentReport};
use crate::error::RegistryError;
use crate::findings::{Finding, Severity};
use crate::framework::Framework;
use crate::registry::{make_tool, Registry};
use crate::schema::{parse_input, serialize_output, InputSchema, PropertySchema};

pub use examples::{ComponentType, Guidance};
pub use optimizations::{Priority, Suggestion};

/// Result of one rule over one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Followed(&'static str),
    Violation {
        severity: Severity,
        message: &'static str,
        recommendation: &'static str,
    },
    NotApplicable,
}

impl Outcome {
    pub fn is_violation(&self) -> bool {
        matches!(self, Outcome::Violation { .. })
    }
}

/// An independent text check
pub struct Rule {
    pub id: &'static str,
    pub check: fn(&str) -> Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowedPractice {
    pub rule: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub recommendation: &'static str,
}

impl From<&Violation> for Finding {
    fn from(v: &Violation) -> Self {
        Finding::new(v.rule, v.severity, v.message).with_recommendation(v.recommendation)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticesReport {
    pub framework: Framework,
    pub followed: Vec<FollowedPractice>,
    pub violations: Vec<Violation>,
    pub score: u32,
}

pub fn rules_for(framework: Framework) -> &'static [Rule] {
    match framework {
        Framework::Rails => rails::RULES,
        Framework::ReactNative => react_native::RULES,
        Framework::Graphql => graphql::RULES,
    }
}

/// `max(0, 100 - 10 * violations)`
pub fn score(violations: usize) -> u32 {
    let penalty = u32::try_from(violations).unwrap_or(u32::MAX).saturating_mul(10);
    100u32.saturating_sub(penalty)
}

/// Run the framework's rule battery and score it with [`score`].
pub fn check(code: &str, framework: Framework) -> PracticesReport {
    let mut followed = Vec::new();
    let mut violations = Vec::new();

    for rule in rules_for(framework) {
        match (rule.check)(code) {
            Outcome::Followed(note) => followed.push(FollowedPractice {
                rule: rule.id,
                note,
            }),
            Outcome::Violation {
                severity,
                message,
                recommendation,
            } => violations.push(Violation {
                rule: rule.id,
                severity,
                message,
                recommendation,
            }),
            Outcome::NotApplicable => {}
        }
    }

    PracticesReport {
        framework,
        score: score(violations.len()),
        followed,
        violations,
    }
}

pub fn review(code: &str, framework: Framework) -> AgentReport {
    let report = check(code, framework);
    AgentReport {
        agent: AgentKind::BestPractices,
        score: Some(report.score),
        issues: report.violations.iter().map(Finding::from).collect(),
    }
}

#[derive(Deserialize)]
struct CheckInput {
    code: String,
    framework: Framework,
}

#[derive(Deserialize)]
struct ExamplesInput {
    framework: Framework,
    component_type: ComponentType,
}

#[derive(Deserialize)]
struct OptimizeInput {
    framework: Framework,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Serialize)]
struct OptimizeOutput {
    framework: Framework,
    suggestions: Vec<Suggestion>,
}

fn framework_property() -> PropertySchema {
    PropertySchema::string("Target framework").one_of(&Framework::NAMES)
}

pub fn register_tools(reg: &mut Registry) -> Result<(), RegistryError> {
    reg.register_tool(
        make_tool(
            "check_best_practices",
            "Check code against the conventions of a Rails, React Native or GraphQL codebase",
            InputSchema::object()
                .required("code", PropertySchema::string("Source code to check"))
                .required("framework", framework_property()),
        ),
        execute_check,
    )?;

    reg.register_tool(
        make_tool(
            "get_examples",
            "Get recommended practices and an example snippet for a component type",
            InputSchema::object()
                .required("framework", framework_property())
                .required(
                    "component_type",
                    PropertySchema::string("Kind of component").one_of(&ComponentType::NAMES),
                ),
        ),
        execute_get_examples,
    )?;

    reg.register_tool(
        make_tool(
            "suggest_optimizations",
            "Suggest performance optimizations for a framework, optionally marking those the code already applies",
            InputSchema::object()
                .required("framework", framework_property())
                .optional("code", PropertySchema::string("Code to compare against")),
        ),
        execute_suggest_optimizations,
    )?;

    Ok(())
}

fn execute_check(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: CheckInput = parse_input(input)?;
    serialize_output(&check(&input.code, input.framework))
}

fn execute_get_examples(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: ExamplesInput = parse_input(input)?;
    let guidance = examples::lookup(input.framework, input.component_type).ok_or_else(|| {
        anyhow!(
            "No examples for component type {:?} in {}",
            input.component_type,
            input.framework
        )
    })?;
    serialize_output(&guidance)
}

fn execute_suggest_optimizations(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: OptimizeInput = parse_input(input)?;
    serialize_output(&OptimizeOutput {
        framework: input.framework,
        suggestions: optimizations::suggest(input.framework, input.code.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_drops_ten_per_violation() {
        let code = "class PostsController < ApplicationController\n  def create\n    Post.create(params[:post])\n  rescue Exception\n  end\nend";
        let report = check(code, Framework::Rails);
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.score, 80);
    }

    #[test]
    fn test_score_floors_at_zero() {
        assert_eq!(score(0), 100);
        assert_eq!(score(3), 70);
        assert_eq!(score(10), 0);
        assert_eq!(score(11), 0);
        assert_eq!(score(usize::MAX), 0);
    }

    #[test]
    fn test_clean_code_scores_100() {
        let report = check("", Framework::ReactNative);
        assert!(report.violations.is_empty());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_rule_ids_unique_per_framework() {
        for framework in Framework::ALL {
            let mut ids: Vec<_> = rules_for(framework).iter().map(|r| r.id).collect();
            let total = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), total, "{framework}");
        }
    }

    #[test]
    fn test_review_maps_violations_to_findings() {
        let report = review("Post.create(params[:post])", Framework::Rails);
        assert_eq!(report.agent, AgentKind::BestPractices);
        assert_eq!(report.score, Some(90));
        assert_eq!(report.issues[0].kind, "strong-parameters");
        assert!(report.issues[0].recommendation.is_some());
    }

    #[test]
    fn test_get_examples_unsupported_combination_fails() {
        let err = execute_get_examples(json!({"framework": "rails", "component_type": "hook"}))
            .unwrap_err();
        assert!(err.to_string().contains("No examples"));
    }

    #[test]
    fn test_get_examples_supported() {
        let out =
            execute_get_examples(json!({"framework": "graphql", "component_type": "mutation"}))
                .unwrap();
        assert_eq!(out["framework"], "graphql");
        assert!(out["example"].as_str().unwrap().contains("current_user"));
    }

    #[test]
    fn test_suggest_optimizations_with_code() {
        let out = execute_suggest_optimizations(json!({
            "framework": "react-native",
            "code": "<FlatList data={items} />"
        }))
        .unwrap();
        assert_eq!(out["suggestions"][0]["applied"], true);
    }

    #[test]
    fn test_register_tools() {
        let mut reg = Registry::new();
        register_tools(&mut reg).unwrap();
        assert_eq!(reg.tool_count(), 3);
    }
}
