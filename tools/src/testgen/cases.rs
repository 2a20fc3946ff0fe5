//! Test case suggestions per function

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::docs::{extract_units, Unit, UnitKind};
use crate::framework::Language;

static RAISES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:raise|throw)\b").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    HappyPath,
    EmptyInput,
    RaisesError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub unit: String,
    pub kind: CaseKind,
    pub description: String,
}

/// Callable units (methods and functions) with the text of their bodies
pub fn callables(code: &str, language: Language) -> Vec<(Unit, String)> {
    let lines: Vec<&str> = code.lines().collect();
    let units = extract_units(code, language);

    units
        .iter()
        .enumerate()
        .filter(|(_, u)| matches!(u.kind, UnitKind::Method | UnitKind::Function))
        .map(|(i, unit)| {
            let end = units.get(i + 1).map_or(lines.len(), |next| next.line - 1);
            let body = lines[unit.line - 1..end].join("\n");
            (unit.clone(), body)
        })
        .collect()
}

pub fn suggest_for(unit: &Unit, body: &str) -> Vec<TestCase> {
    let mut cases = vec![TestCase {
        unit: unit.name.clone(),
        kind: CaseKind::HappyPath,
        description: format!("returns the expected result for valid input to {}", unit.name),
    }];

    if !unit.params.is_empty() {
        cases.push(TestCase {
            unit: unit.name.clone(),
            kind: CaseKind::EmptyInput,
            description: format!("handles nil or empty {}", unit.params.join(", ")),
        });
    }

    if RAISES.is_match(body) {
        cases.push(TestCase {
            unit: unit.name.clone(),
            kind: CaseKind::RaisesError,
            description: format!("raises an error when {} fails", unit.name),
        });
    }

    cases
}

pub fn suggest(code: &str, language: Language) -> Vec<TestCase> {
    callables(code, language)
        .iter()
        .flat_map(|(unit, body)| suggest_for(unit, body))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cases_per_function() {
        let code = "def charge(amount)\n  raise ArgumentError if amount.negative?\nend\n\ndef ping\n  :pong\nend";
        let cases = suggest(code, Language::Ruby);
        let kinds: Vec<_> = cases.iter().map(|c| (c.unit.as_str(), c.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("charge", CaseKind::HappyPath),
                ("charge", CaseKind::EmptyInput),
                ("charge", CaseKind::RaisesError),
                ("ping", CaseKind::HappyPath),
            ]
        );
    }

    #[test]
    fn test_error_case_scoped_to_body() {
        let code = "function load(id) {\n  return db.get(id);\n}\nfunction fail() {\n  throw new Error('x');\n}";
        let cases = suggest(code, Language::JavaScript);
        assert!(!cases
            .iter()
            .any(|c| c.unit == "load" && c.kind == CaseKind::RaisesError));
        assert!(cases
            .iter()
            .any(|c| c.unit == "fail" && c.kind == CaseKind::RaisesError));
    }

    #[test]
    fn test_classes_are_not_callables() {
        assert!(suggest("class Empty\nend", Language::Ruby).is_empty());
    }
}
