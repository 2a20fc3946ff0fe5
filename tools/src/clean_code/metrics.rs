//! Line counts and the keyword-count complexity proxy

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static CONTROL_FLOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:if|elsif|else|unless|case|when|for|while|until|switch|catch|rescue)\b|&&|\|\|")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub complexity: u32,
}

/// True for lines that are entirely a comment in Ruby or JS/TS
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    ["#", "//", "/*", "*"].iter().any(|m| trimmed.starts_with(m))
}

/// Count lines and control-flow branches. Comment lines do not add complexity.
pub fn measure(code: &str) -> Metrics {
    let mut metrics = Metrics {
        complexity: 1,
        ..Metrics::default()
    };

    for line in code.lines() {
        metrics.total_lines += 1;
        if line.trim().is_empty() {
            metrics.blank_lines += 1;
        } else if is_comment_line(line) {
            metrics.comment_lines += 1;
        } else {
            metrics.code_lines += 1;
            metrics.complexity += CONTROL_FLOW.find_iter(line).count() as u32;
        }
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_lines() {
        let code = "# header\ndef run\n\n  work\nend\n";
        let m = measure(code);
        assert_eq!(m.total_lines, 5);
        assert_eq!(m.comment_lines, 1);
        assert_eq!(m.blank_lines, 1);
        assert_eq!(m.code_lines, 3);
    }

    #[test]
    fn test_complexity_counts_keywords_and_operators() {
        let code = "if a && b\n  x\nelsif c || d\n  y\nelse\n  z\nend";
        // 1 + if + && + elsif + || + else
        assert_eq!(measure(code).complexity, 6);
    }

    #[test]
    fn test_complexity_ignores_identifiers_and_comments() {
        let code = "# if while for\nverify_iffy = forward\n";
        assert_eq!(measure(code).complexity, 1);
    }

    #[test]
    fn test_empty_input() {
        let m = measure("");
        assert_eq!(m.total_lines, 0);
        assert_eq!(m.complexity, 1);
    }
}
