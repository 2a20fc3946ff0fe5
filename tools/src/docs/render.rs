//! Markdown and JSON rendering of extracted units

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

use super::extract::Unit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    #[default]
    Markdown,
    Json,
}

impl DocFormat {
    pub const NAMES: [&'static str; 2] = ["markdown", "json"];
}

/// Render units as `format`; markdown is a string, JSON the unit array
pub fn render(units: &[Unit], format: DocFormat) -> anyhow::Result<Value> {
    match format {
        DocFormat::Markdown => Ok(Value::String(markdown(units))),
        DocFormat::Json => Ok(serde_json::to_value(units)?),
    }
}

pub fn markdown(units: &[Unit]) -> String {
    let mut out = String::from("# Documentation\n");

    if units.is_empty() {
        out.push_str("\nNo documentable declarations found.\n");
        return out;
    }

    for unit in units {
        // writing to a String cannot fail
        let _ = write!(out, "\n## {} `{}`\n\n", unit.kind.as_str(), unit.name);
        match &unit.description {
            Some(description) => {
                let _ = writeln!(out, "{description}");
            }
            None => out.push_str("_No description._\n"),
        }
        if !unit.params.is_empty() {
            out.push_str("\n**Parameters:**\n\n");
            for param in &unit.params {
                let _ = writeln!(out, "- `{param}`");
            }
        }
        let _ = writeln!(out, "\n_Defined at line {}_", unit.line);
    }

    out
}
