//! Documentation agent: extract declarations with their comments, render
//! them, and stub out missing comments.

pub mod annotate;
pub mod extract;
pub mod render;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentReport};
use crate::error::RegistryError;
use crate::findings::{Finding, Severity};
use crate::framework::Language;
use crate::registry::{make_tool, Registry};
use crate::schema::{parse_input, serialize_output, InputSchema, PropertySchema};

pub use annotate::{add_missing_comments, Annotated};
pub use extract::{extract_units, Unit, UnitKind};
pub use render::DocFormat;

/// Percentage of units with a description; 100 when there is nothing to document
pub fn coverage(units: &[Unit]) -> u32 {
    if units.is_empty() {
        return 100;
    }
    let documented = units.iter().filter(|u| u.is_documented()).count();
    (documented * 100 / units.len()) as u32
}

pub fn review(code: &str) -> AgentReport {
    let units = extract_units(code, Language::detect(code));
    let issues = units
        .iter()
        .filter(|u| !u.is_documented())
        .map(|u| {
            Finding::new(
                "missing-documentation",
                Severity::Info,
                format!("{} `{}` has no description", u.kind.as_str(), u.name),
            )
            .at_line(u.line)
        })
        .collect();

    AgentReport {
        agent: AgentKind::Documentation,
        score: Some(coverage(&units)),
        issues,
    }
}

#[derive(Deserialize)]
struct GenerateInput {
    code: String,
    #[serde(default)]
    format: DocFormat,
    #[serde(default)]
    language: Option<Language>,
}

#[derive(Serialize)]
struct GenerateOutput {
    format: DocFormat,
    language: Language,
    units: usize,
    documented: usize,
    coverage: u32,
    documentation: serde_json::Value,
}

#[derive(Deserialize)]
struct AnnotateInput {
    code: String,
    #[serde(default)]
    language: Option<Language>,
}

fn language_property() -> PropertySchema {
    PropertySchema::string("Source language; detected when omitted").one_of(&Language::NAMES)
}

pub fn register_tools(reg: &mut Registry) -> Result<(), RegistryError> {
    reg.register_tool(
        make_tool(
            "generate_documentation",
            "Generate documentation for classes, modules, methods and functions from their comments",
            InputSchema::object()
                .required("code", PropertySchema::string("Source code to document"))
                .optional(
                    "format",
                    PropertySchema::string("Output format (default markdown)")
                        .one_of(&DocFormat::NAMES),
                )
                .optional("language", language_property()),
        ),
        execute_generate,
    )?;

    reg.register_tool(
        make_tool(
            "add_missing_comments",
            "Insert stub comments above declarations that have no description",
            InputSchema::object()
                .required("code", PropertySchema::string("Source code to annotate"))
                .optional("language", language_property()),
        ),
        execute_add_missing_comments,
    )?;

    Ok(())
}

fn execute_generate(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: GenerateInput = parse_input(input)?;
    let language = input.language.unwrap_or_else(|| Language::detect(&input.code));
    let units = extract_units(&input.code, language);

    serialize_output(&GenerateOutput {
        format: input.format,
        language,
        units: units.len(),
        documented: units.iter().filter(|u| u.is_documented()).count(),
        coverage: coverage(&units),
        documentation: render::render(&units, input.format)?,
    })
}

fn execute_add_missing_comments(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: AnnotateInput = parse_input(input)?;
    let language = input.language.unwrap_or_else(|| Language::detect(&input.code));
    serialize_output(&add_missing_comments(&input.code, language))
}
