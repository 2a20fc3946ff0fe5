//! Code smell detectors

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::metrics::{is_comment_line, Metrics};
use super::similarity::similarity;
use crate::findings::{line_of, Finding, Severity};

pub const LONG_METHOD_COMPLEXITY: u32 = 10;
pub const LARGE_CLASS_LINES: usize = 200;
const DUPLICATE_MIN_CHARS: usize = 10;
const DUPLICATE_THRESHOLD: f64 = 0.8;
const MAX_DUPLICATES: usize = 5;
const MAX_MAGIC_NUMBERS: usize = 10;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));

static JS_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:let|const|var)\s+([A-Za-z_]\w*)").expect("valid regex"));

static RUBY_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*([a-z_][a-z0-9_]*)[ \t]*=[^=~>]").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmellKind {
    LongMethod,
    LargeClass,
    Duplication,
    MagicNumbers,
    DeadCode,
}

impl SmellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmellKind::LongMethod => "long-method",
            SmellKind::LargeClass => "large-class",
            SmellKind::Duplication => "duplication",
            SmellKind::MagicNumbers => "magic-numbers",
            SmellKind::DeadCode => "dead-code",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SmellKind::LongMethod => Severity::High,
            SmellKind::LargeClass | SmellKind::Duplication => Severity::Medium,
            SmellKind::MagicNumbers | SmellKind::DeadCode => Severity::Low,
        }
    }
}

impl fmt::Display for SmellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A near-identical pair of lines (1-based)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub first_line: usize,
    pub second_line: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Smell {
    #[serde(rename = "type")]
    pub kind: SmellKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Smell {
    fn new(kind: SmellKind, message: String, line: Option<usize>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message,
            line,
        }
    }

    pub fn to_finding(&self) -> Finding {
        let finding = Finding::new(self.kind.as_str(), self.severity, self.message.clone());
        match self.line {
            Some(line) => finding.at_line(line),
            None => finding,
        }
    }
}

/// Run every detector. Size smells are reported once; the others once per occurrence.
pub fn detect(code: &str, metrics: &Metrics) -> Vec<Smell> {
    let mut smells = Vec::new();

    if metrics.complexity > LONG_METHOD_COMPLEXITY {
        smells.push(Smell::new(
            SmellKind::LongMethod,
            format!(
                "Complexity {} exceeds {LONG_METHOD_COMPLEXITY}; split into smaller methods",
                metrics.complexity
            ),
            None,
        ));
    }

    if metrics.code_lines > LARGE_CLASS_LINES {
        smells.push(Smell::new(
            SmellKind::LargeClass,
            format!(
                "{} lines of code exceed {LARGE_CLASS_LINES}; extract cohesive parts",
                metrics.code_lines
            ),
            None,
        ));
    }

    smells.extend(duplicate_lines(code).into_iter().map(|pair| {
        Smell::new(
            SmellKind::Duplication,
            format!(
                "Lines {} and {} are {:.0}% similar",
                pair.first_line,
                pair.second_line,
                pair.similarity * 100.0
            ),
            Some(pair.first_line),
        )
    }));

    smells.extend(magic_numbers(code).into_iter().map(|(line, value)| {
        Smell::new(
            SmellKind::MagicNumbers,
            format!("Magic number {value}; name it as a constant"),
            Some(line),
        )
    }));

    smells.extend(unused_bindings(code).into_iter().map(|(line, name)| {
        Smell::new(
            SmellKind::DeadCode,
            format!("`{name}` is assigned but never used"),
            Some(line),
        )
    }));

    smells
}

/// Top near-duplicate line pairs by similarity, ties broken by position
pub fn duplicate_lines(code: &str) -> Vec<DuplicatePair> {
    let candidates: Vec<(usize, &str)> = code
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| l.chars().count() >= DUPLICATE_MIN_CHARS && !is_comment_line(l))
        .collect();

    let mut pairs = Vec::new();
    for (i, &(first_line, a)) in candidates.iter().enumerate() {
        let a_len = a.chars().count();
        for &(second_line, b) in &candidates[i + 1..] {
            let b_len = b.chars().count();
            // similarity can never exceed shorter / longer
            if (a_len.min(b_len) as f64) / (a_len.max(b_len) as f64) <= DUPLICATE_THRESHOLD {
                continue;
            }
            let score = similarity(a, b);
            if score > DUPLICATE_THRESHOLD {
                pairs.push(DuplicatePair {
                    first_line,
                    second_line,
                    similarity: score,
                });
            }
        }
    }

    pairs.sort_by(|x, y| {
        y.similarity
            .total_cmp(&x.similarity)
            .then(x.first_line.cmp(&y.first_line))
            .then(x.second_line.cmp(&y.second_line))
    });
    pairs.truncate(MAX_DUPLICATES);
    pairs
}

/// First distinct bare integers in 2..=999 with their lines, skipping comments and decimals
pub fn magic_numbers(code: &str) -> Vec<(usize, u32)> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for (index, line) in code.lines().enumerate() {
        if is_comment_line(line) {
            continue;
        }
        let bytes = line.as_bytes();
        for m in INTEGER.find_iter(line) {
            let before = m.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(m.end()).copied();
            if before == Some(b'.') || after == Some(b'.') {
                continue;
            }
            let Ok(value) = m.as_str().parse::<u32>() else {
                continue;
            };
            if (2..=999).contains(&value) && seen.insert(value) {
                found.push((index + 1, value));
                if found.len() == MAX_MAGIC_NUMBERS {
                    return found;
                }
            }
        }
    }

    found
}

/// Local bindings whose name appears exactly once in the whole text, by name
pub fn unused_bindings(code: &str) -> Vec<(usize, String)> {
    let names: BTreeMap<&str, usize> = JS_BINDING
        .captures_iter(code)
        .chain(RUBY_ASSIGNMENT.captures_iter(code))
        .filter_map(|c| c.get(1))
        .filter(|m| !m.as_str().starts_with('_'))
        .map(|m| (m.as_str(), line_of(code, m.start())))
        .collect();

    names
        .into_iter()
        .filter(|(name, _)| occurrences(code, name) == 1)
        .map(|(name, line)| (line, name.to_string()))
        .collect()
}

fn occurrences(code: &str, name: &str) -> usize {
    match Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
        Ok(re) => re.find_iter(code).count(),
        Err(_) => 0,
    }
}
