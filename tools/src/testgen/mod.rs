//! Test generator agent: rspec, minitest and jest skeletons plus case suggestions.

pub mod cases;
pub mod generate;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentKind, AgentReport};
use crate::error::RegistryError;
use crate::findings::{Finding, Severity};
use crate::framework::{Framework, Language};
use crate::registry::{make_tool, Registry};
use crate::schema::{parse_input, serialize_output, InputSchema, PropertySchema};

pub use cases::{CaseKind, TestCase};
pub use generate::{generate, GeneratedTests, TestFramework};

/// Generative agent: contributes no score, only a note on untested error paths
pub fn review(code: &str, framework: Framework) -> AgentReport {
    let language = match framework {
        Framework::ReactNative => Language::detect(code),
        _ => framework.language(),
    };
    let issues = cases::suggest(code, language)
        .into_iter()
        .filter(|c| c.kind == CaseKind::RaisesError)
        .map(|c| {
            Finding::new(
                "untested-error-path",
                Severity::Info,
                format!("`{}` can raise; cover the failure with a test", c.unit),
            )
        })
        .collect();

    AgentReport {
        agent: AgentKind::TestGenerator,
        score: None,
        issues,
    }
}

#[derive(Deserialize)]
struct GenerateInput {
    code: String,
    framework: Framework,
    #[serde(default)]
    test_framework: Option<TestFramework>,
}

#[derive(Deserialize)]
struct SuggestInput {
    code: String,
    #[serde(default)]
    language: Option<Language>,
}

#[derive(Serialize)]
struct SuggestOutput {
    total: usize,
    cases: Vec<TestCase>,
}

pub fn register_tools(reg: &mut Registry) -> Result<(), RegistryError> {
    reg.register_tool(
        make_tool(
            "generate_tests",
            "Generate rspec, minitest or jest test skeletons for the functions in a snippet",
            InputSchema::object()
                .required("code", PropertySchema::string("Source code to test"))
                .required(
                    "framework",
                    PropertySchema::string("Application framework").one_of(&Framework::NAMES),
                )
                .optional(
                    "test_framework",
                    PropertySchema::string(
                        "Test framework; rspec for Ruby, jest for React Native by default",
                    )
                    .one_of(&TestFramework::NAMES),
                ),
        ),
        execute_generate_tests,
    )?;

    reg.register_tool(
        make_tool(
            "suggest_test_cases",
            "Suggest happy-path, empty-input and error cases for each function",
            InputSchema::object()
                .required("code", PropertySchema::string("Source code to analyze"))
                .optional(
                    "language",
                    PropertySchema::string("Source language; detected when omitted")
                        .one_of(&Language::NAMES),
                ),
        ),
        execute_suggest_test_cases,
    )?;

    Ok(())
}

fn execute_generate_tests(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: GenerateInput = parse_input(input)?;
    serialize_output(&generate(&input.code, input.framework, input.test_framework))
}

fn execute_suggest_test_cases(input: serde_json::Value) -> Result<serde_json::Value> {
    let input: SuggestInput = parse_input(input)?;
    let language = input.language.unwrap_or_else(|| Language::detect(&input.code));
    let cases = cases::suggest(&input.code, language);
    serialize_output(&SuggestOutput {
        total: cases.len(),
        cases,
    })
}
