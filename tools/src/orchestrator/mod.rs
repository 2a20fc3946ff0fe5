//! Orchestrator: runs a subset of agents over one snippet and merges their reports
//!
//! Agents run sequentially. Reports are kept sorted by agent kind, so the
//! merged result does not depend on the order agents were requested in.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use crate::agent::{AgentKind, AgentReport};
use crate::error::RegistryError;
use crate::findings::{severity_counts, Finding, SeverityCounts};
use crate::framework::Framework;
use crate::registry::{make_tool, Registry};
use crate::schema::{parse_input, serialize_output, InputSchema, PropertySchema, ValueKind};

pub const BLOCKING_RECOMMENDATION: &str =
    "Address the critical and high severity issues before deploying";
pub const PASSING_RECOMMENDATION: &str =
    "No blocking issues found; review the remaining suggestions as part of normal refactoring";

/// Collects agent reports and derives the merged summary
#[derive(Default)]
pub struct ResultAggregator {
    reports: Vec<AgentReport>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one agent's report, keeping reports ordered by agent kind
    pub fn record(&mut self, report: AgentReport) {
        info!(
            "Agent {} reported (score: {:?}, issues: {})",
            report.agent,
            report.score,
            report.issues.len()
        );
        let at = self.reports.partition_point(|r| r.agent <= report.agent);
        self.reports.insert(at, report);
    }

    /// Rounded mean of the agents that report a score; 100 when none do
    pub fn overall_score(&self) -> u32 {
        let scores: Vec<u32> = self.reports.iter().filter_map(|r| r.score).collect();
        if scores.is_empty() {
            return 100;
        }
        let sum: u32 = scores.iter().sum();
        (f64::from(sum) / scores.len() as f64).round() as u32
    }

    pub fn issues(&self) -> Vec<Finding> {
        self.reports.iter().flat_map(|r| r.issues.clone()).collect()
    }

    pub fn critical_issues(&self) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.issues)
            .filter(|f| f.severity.is_blocking())
            .count()
    }

    pub fn summary(self, framework: Framework) -> FullAnalysis {
        let issues = self.issues();
        let critical_issues = self.critical_issues();
        FullAnalysis {
            framework,
            agents_run: self.reports.iter().map(|r| r.agent).collect(),
            overall_score: self.overall_score(),
            total_issues: issues.len(),
            critical_issues,
            severity: severity_counts(&issues),
            recommendation: if critical_issues > 0 {
                BLOCKING_RECOMMENDATION
            } else {
                PASSING_RECOMMENDATION
            },
            reports: self.reports,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Merged result of a full analysis
#[derive(Debug, Clone, Serialize)]
pub struct FullAnalysis {
    pub framework: Framework,
    pub agents_run: Vec<AgentKind>,
    pub overall_score: u32,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub severity: SeverityCounts,
    pub recommendation: &'static str,
    pub reports: Vec<AgentReport>,
    pub generated_at: String,
}

/// Run each distinct agent in `agents` over `code`
pub fn run(code: &str, framework: Framework, agents: &[AgentKind]) -> FullAnalysis {
    let distinct: BTreeSet<AgentKind> = agents.iter().copied().collect();
    info!(
        "Running full analysis: framework={} agents={}",
        framework,
        distinct.len()
    );

    let mut aggregator = ResultAggregator::new();
    for agent in distinct {
        aggregator.record(agent.review(code, framework));
    }
    aggregator.summary(framework)
}

#[derive(Deserialize)]
struct AnalysisInput {
    code: String,
    #[serde(default)]
    framework: Option<Framework>,
    #[serde(default)]
    agents: Option<Vec<AgentKind>>,
}

/// Register `run_full_analysis`. Calls without an explicit agent list run
/// `enabled`; calls without a framework use `default_framework`.
pub fn register_tools(
    reg: &mut Registry,
    enabled: Vec<AgentKind>,
    default_framework: Framework,
) -> Result<(), RegistryError> {
    reg.register_tool(
        make_tool(
            "run_full_analysis",
            "Run several agents over the same code and merge their findings into one scored report",
            InputSchema::object()
                .required("code", PropertySchema::string("Source code to analyze"))
                .optional(
                    "framework",
                    PropertySchema::string("Application framework").one_of(&Framework::NAMES),
                )
                .optional(
                    "agents",
                    PropertySchema::array_of(
                        PropertySchema::element(ValueKind::String).one_of(&AgentKind::NAMES),
                        "Agents to run; defaults to every enabled agent",
                    ),
                ),
        ),
        move |input| execute_full_analysis(input, &enabled, default_framework),
    )
}

fn execute_full_analysis(
    input: serde_json::Value,
    enabled: &[AgentKind],
    default_framework: Framework,
) -> Result<serde_json::Value> {
    let input: AnalysisInput = parse_input(input)?;
    let agents = input.agents.as_deref().unwrap_or(enabled);
    let framework = input.framework.unwrap_or(default_framework);
    serialize_output(&run(&input.code, framework, agents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::Severity;
    use serde_json::json;

    const CONTROLLER: &str = "class UsersController < ApplicationController\n  def show\n    User.where(\"id = \" + params[:id])\n  end\nend";

    fn report(agent: AgentKind, score: Option<u32>, severities: &[Severity]) -> AgentReport {
        AgentReport {
            agent,
            score,
            issues: severities
                .iter()
                .map(|&s| Finding::new("test", s, "msg"))
                .collect(),
        }
    }

    #[test]
    fn test_overall_score_is_rounded_mean() {
        let mut agg = ResultAggregator::new();
        agg.record(report(AgentKind::Security, Some(90), &[]));
        agg.record(report(AgentKind::CleanCode, Some(85), &[]));
        agg.record(report(AgentKind::TestGenerator, None, &[]));
        assert_eq!(agg.overall_score(), 88);
    }

    #[test]
    fn test_overall_score_without_scores() {
        let mut agg = ResultAggregator::new();
        agg.record(report(AgentKind::TestGenerator, None, &[Severity::Info]));
        assert_eq!(agg.overall_score(), 100);
        assert_eq!(ResultAggregator::new().overall_score(), 100);
    }

    #[test]
    fn test_critical_issues_count_critical_and_high() {
        let mut agg = ResultAggregator::new();
        agg.record(report(
            AgentKind::Security,
            Some(50),
            &[Severity::Critical, Severity::High, Severity::Medium],
        ));
        let summary = agg.summary(Framework::Rails);
        assert_eq!(summary.critical_issues, 2);
        assert_eq!(summary.total_issues, 3);
        assert_eq!(summary.recommendation, BLOCKING_RECOMMENDATION);
    }

    #[test]
    fn test_passing_recommendation() {
        let summary = run("", Framework::Rails, &[AgentKind::Documentation]);
        assert_eq!(summary.critical_issues, 0);
        assert_eq!(summary.recommendation, PASSING_RECOMMENDATION);
        assert_eq!(summary.overall_score, 100);
    }

    #[test]
    fn test_order_independent() {
        let forward = run(
            CONTROLLER,
            Framework::Rails,
            &[AgentKind::Security, AgentKind::CleanCode, AgentKind::BestPractices],
        );
        let reverse = run(
            CONTROLLER,
            Framework::Rails,
            &[AgentKind::BestPractices, AgentKind::CleanCode, AgentKind::Security],
        );
        assert_eq!(forward.reports, reverse.reports);
        assert_eq!(forward.overall_score, reverse.overall_score);
        assert_eq!(forward.agents_run, reverse.agents_run);
    }

    #[test]
    fn test_duplicate_agents_run_once() {
        let summary = run(
            CONTROLLER,
            Framework::Rails,
            &[AgentKind::Security, AgentKind::Security],
        );
        assert_eq!(summary.agents_run, vec![AgentKind::Security]);
    }

    #[test]
    fn test_record_keeps_kind_order() {
        let mut agg = ResultAggregator::new();
        agg.record(report(AgentKind::Documentation, Some(1), &[]));
        agg.record(report(AgentKind::Security, Some(2), &[]));
        agg.record(report(AgentKind::CleanCode, Some(3), &[]));
        let kinds: Vec<_> = agg.summary(Framework::Rails).agents_run;
        assert_eq!(
            kinds,
            vec![AgentKind::Security, AgentKind::CleanCode, AgentKind::Documentation]
        );
    }

    #[test]
    fn test_tool_uses_enabled_agents_and_default_framework() {
        let mut reg = Registry::new();
        register_tools(&mut reg, vec![AgentKind::Security], Framework::Rails).unwrap();
        assert!(reg.get_tool("run_full_analysis").is_some());

        let out = execute_full_analysis(
            json!({"code": CONTROLLER}),
            &[AgentKind::Security],
            Framework::Rails,
        )
        .unwrap();
        assert_eq!(out["framework"], "rails");
        assert_eq!(out["agents_run"], json!(["security"]));
        assert!(out["critical_issues"].as_u64().unwrap() >= 1);
        assert!(out["generated_at"].as_str().is_some());
    }

    #[test]
    fn test_tool_explicit_agents_override() {
        let out = execute_full_analysis(
            json!({"code": "", "agents": ["clean_code"], "framework": "graphql"}),
            &[AgentKind::Security],
            Framework::Rails,
        )
        .unwrap();
        assert_eq!(out["agents_run"], json!(["clean_code"]));
        assert_eq!(out["framework"], "graphql");
    }
}
