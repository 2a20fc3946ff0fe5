//! Declaration extraction and backward comment scanning

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::framework::Language;

/// How far above a declaration a description may start
const DESCRIPTION_WINDOW: usize = 5;

static RUBY_CONTAINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(class|module)\s+([A-Z][\w:]*)").expect("valid regex"));

static RUBY_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)def\s+(self\.)?([A-Za-z_]\w*[?!=]?)(?:\s*\(([^)]*)\)|[ \t]+([^#\n]+))?")
        .expect("valid regex")
});

static JS_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(class|interface)\s+([A-Za-z_$][\w$]*)")
        .expect("valid regex")
});

static JS_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\(([^)]*)\)")
        .expect("valid regex")
});

static JS_ARROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:\(([^)]*)\)|([A-Za-z_$][\w$]*))\s*(?::[^=]+)?=>")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Class,
    Module,
    Method,
    Interface,
    Function,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Class => "class",
            UnitKind::Module => "module",
            UnitKind::Method => "method",
            UnitKind::Interface => "interface",
            UnitKind::Function => "function",
        }
    }
}

/// A documentable declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub name: String,
    /// 1-based
    pub line: usize,
    pub params: Vec<String>,
    pub description: Option<String>,
    #[serde(skip)]
    pub indent: String,
}

impl Unit {
    pub fn is_documented(&self) -> bool {
        self.description.is_some()
    }
}

/// Find every declaration in `code` and attach the comment block above it
pub fn extract_units(code: &str, language: Language) -> Vec<Unit> {
    let lines: Vec<&str> = code.lines().collect();
    let mut units = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let declared = match language {
            Language::Ruby => ruby_declaration(line),
            Language::JavaScript | Language::TypeScript => js_declaration(line),
        };
        if let Some((kind, name, params, indent)) = declared {
            units.push(Unit {
                kind,
                name,
                line: index + 1,
                params,
                description: description_above(&lines, index),
                indent,
            });
        }
    }

    units
}

type Declaration = (UnitKind, String, Vec<String>, String);

fn ruby_declaration(line: &str) -> Option<Declaration> {
    if let Some(c) = RUBY_CONTAINER.captures(line) {
        let kind = if &c[2] == "module" {
            UnitKind::Module
        } else {
            UnitKind::Class
        };
        return Some((kind, c[3].to_string(), Vec::new(), c[1].to_string()));
    }

    let c = RUBY_METHOD.captures(line)?;
    let name = match c.get(2) {
        Some(_) => format!("self.{}", &c[3]),
        None => c[3].to_string(),
    };
    let params = c
        .get(4)
        .or_else(|| c.get(5))
        .map(|m| split_params(m.as_str()))
        .unwrap_or_default();
    Some((UnitKind::Method, name, params, c[1].to_string()))
}

fn js_declaration(line: &str) -> Option<Declaration> {
    if let Some(c) = JS_CLASS.captures(line) {
        let kind = if &c[2] == "interface" {
            UnitKind::Interface
        } else {
            UnitKind::Class
        };
        return Some((kind, c[3].to_string(), Vec::new(), c[1].to_string()));
    }

    if let Some(c) = JS_FUNCTION.captures(line) {
        return Some((
            UnitKind::Function,
            c[2].to_string(),
            split_params(&c[3]),
            c[1].to_string(),
        ));
    }

    let c = JS_ARROW.captures(line)?;
    let params = c
        .get(3)
        .or_else(|| c.get(4))
        .map(|m| split_params(m.as_str()))
        .unwrap_or_default();
    Some((UnitKind::Function, c[2].to_string(), params, c[1].to_string()))
}

/// Parameter names with defaults, type annotations and splats removed
fn split_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|param| {
            let name = param
                .split(['=', ':'])
                .next()
                .unwrap_or_default()
                .trim()
                .trim_start_matches(['*', '&', '.'])
                .trim_end_matches('?');
            (!name.is_empty() && !name.contains(['{', '}', '[', ']'])).then(|| name.to_string())
        })
        .collect()
}

fn is_comment(trimmed: &str) -> bool {
    ["#", "//", "/*", "*"].iter().any(|m| trimmed.starts_with(m))
}

fn strip_comment_markers(trimmed: &str) -> &str {
    let text = trimmed
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_start_matches("*/")
        .trim_start_matches("//")
        .trim_start_matches('#')
        .trim_start_matches('*');
    text.trim_end_matches("*/").trim()
}

/// Scan up to five lines above `index`. Blank lines are skipped, comment
/// lines collected, and the first other line ends the scan.
pub fn description_above(lines: &[&str], index: usize) -> Option<String> {
    let mut collected = Vec::new();

    for line in lines[..index].iter().rev().take(DESCRIPTION_WINDOW) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !is_comment(trimmed) {
            break;
        }
        let text = strip_comment_markers(trimmed);
        if !text.is_empty() {
            collected.push(text);
        }
    }

    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    Some(collected.join(" "))
}
