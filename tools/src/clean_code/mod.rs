//! Clean-code agent: size metrics, smells, a quality score and SOLID judgments.

pub mod metrics;
pub mod similarity;
pub mod smells;
pub mod solid;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentReport};
use crate::error::RegistryError;
use crate::registry::{make_tool, Registry};
use crate::schema::{parse_input, serialize_output, InputSchema, PropertySchema};

pub use metrics::{measure, Metrics};
pub use similarity::similarity;
pub use smells::{Smell, SmellKind};
pub use solid::SolidReport;

const MAX_COMPLEXITY_PENALTY: u32 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub metrics: Metrics,
    pub smells: Vec<Smell>,
    pub quality_score: u32,
    pub grade: char,
}

/// `100 - min(2 * complexity, 30) - smell penalties`, floored at 0
pub fn quality_score(metrics: &Metrics, smells: &[Smell]) -> u32 {
    let complexity_penalty = (2 * metrics.complexity).min(MAX_COMPLEXITY_PENALTY);
    let smell_penalty: u32 = smells.iter().map(|s| s.severity.smell_penalty()).sum();
    100u32
        .saturating_sub(complexity_penalty)
        .saturating_sub(smell_penalty)
}

pub fn grade(score: u32) -> char {
    match score {
        90.. => 'A',
        80..=89 => 'B',
        70..=79 => 'C',
        60..=69 => 'D',
        _ => 'F',
    }
}

pub fn analyze(code: &str) -> QualityReport {
    let metrics = measure(code);
    let smells = smells::detect(code, &metrics);
    let quality_score = quality_score(&metrics, &smells);
    QualityReport {
        metrics,
        smells,
        quality_score,
        grade: grade(quality_score),
    }
}

pub fn review(code: &str) -> AgentReport {
    let report = analyze(code);
    AgentReport {
        agent: AgentKind::CleanCode,
        score: Some(report.quality_score),
        issues: report.smells.iter().map(Smell::to_finding).collect(),
    }
}

#[derive(Deserialize)]
struct CodeInput {
    code: String,
}

#[derive(Serialize)]
struct SmellsOutput {
    count: usize,
    smells: Vec<Smell>,
}

fn code_schema() -> InputSchema {
    InputSchema::object().required("code", PropertySchema::string("Source code to analyze"))
}

pub fn register_tools(reg: &mut Registry) -> Result<(), RegistryError> {
    reg.register_tool(
        make_tool(
            "analyze_code_quality",
            "Measure lines and complexity, detect smells and grade overall code quality",
            code_schema(),
        ),
        execute_analyze,
    )?;

    reg.register_tool(
        make_tool(
            "detect_code_smells",
            "Detect long methods, large classes, duplication, magic numbers and dead code",
            code_schema(),
        ),
        execute_detect_smells,
    )?;

    reg.register_tool(
        make_tool(
            "check_solid_principles",
            "Judge adherence to the SOLID principles",
            code_schema(),
        ),
        execute_check_solid,
    )?;

    Ok(())
}

fn execute_analyze(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: CodeInput = parse_input(input)?;
    serialize_output(&analyze(&input.code))
}

fn execute_detect_smells(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: CodeInput = parse_input(input)?;
    let smells = smells::detect(&input.code, &measure(&input.code));
    serialize_output(&SmellsOutput {
        count: smells.len(),
        smells,
    })
}

fn execute_check_solid(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: CodeInput = parse_input(input)?;
    serialize_output(&solid::check(&measure(&input.code)))
}
