//! XSS heuristic: escaping bypasses without a sanitizer

use once_cell::sync::Lazy;
use regex::Regex;

use crate::findings::{line_of, Finding, Severity};

static UNSAFE_HTML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.html_safe\b|\braw\s*\(|dangerouslySetInnerHTML|\.innerHTML\s*=|\bv-html\b|<%==")
        .expect("valid regex")
});

static SANITIZER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(sanitize|DOMPurify|strip_tags|escape_html|escapeHtml)\b").expect("valid regex")
});

/// Flag every raw-HTML idiom, unless a sanitizer call appears anywhere in the text
pub fn detect(code: &str) -> Vec<Finding> {
    if SANITIZER.is_match(code) {
        return Vec::new();
    }

    UNSAFE_HTML
        .find_iter(code)
        .map(|m| {
            Finding::new(
                "xss",
                Severity::High,
                format!("Possible XSS: `{}` renders unescaped HTML", m.as_str().trim()),
            )
            .with_recommendation("Sanitize user content before marking it safe (sanitize / DOMPurify)")
            .at_line(line_of(code, m.start()))
        })
        .collect()
}
