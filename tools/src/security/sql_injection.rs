//! SQL injection heuristic: string building inside query calls

use once_cell::sync::Lazy;
use regex::Regex;

use crate::findings::{line_of, Finding, Severity};

static QUERY_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(where|find_by_sql|execute|exec_query|select_all|select|order|joins|group|having|query|raw)\s*\(([^)]*)\)",
    )
    .expect("valid regex")
});

/// Flag query-building calls whose argument list concatenates or
/// interpolates strings. Purely syntactic; safe concatenation is flagged too.
pub fn detect(code: &str) -> Vec<Finding> {
    QUERY_CALL
        .captures_iter(code)
        .filter_map(|caps| {
            let call = caps.get(1)?.as_str();
            let args = caps.get(2)?.as_str();
            let concatenated = args.contains('+') && (args.contains('"') || args.contains('\''));
            let interpolated = args.contains("#{") || args.contains("${");
            if !(concatenated || interpolated) {
                return None;
            }

            let offset = caps.get(0)?.start();
            Some(
                Finding::new(
                    "sql-injection",
                    Severity::Critical,
                    format!("Possible SQL injection: query built with string concatenation in `{call}`"),
                )
                .with_recommendation(
                    "Use parameterized queries or the query interface, e.g. where(\"id = ?\", id)",
                )
                .at_line(line_of(code, offset)),
            )
        })
        .collect()
}
