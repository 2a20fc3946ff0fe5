//! Findings shared by every scanner, plus severity-weighted scoring

use serde::{Deserialize, Serialize};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Weight used by the security risk score
    pub fn risk_weight(&self) -> u32 {
        match self {
            Severity::Critical => 10,
            Severity::High => 7,
            Severity::Medium => 4,
            Severity::Low => 1,
            Severity::Info => 0,
        }
    }

    /// Points a code smell of this severity costs the quality score
    pub fn smell_penalty(&self) -> u32 {
        match self {
            Severity::Critical | Severity::High => 15,
            Severity::Medium => 10,
            Severity::Low => 5,
            Severity::Info => 0,
        }
    }

    /// Critical and high findings block a release
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

/// A single issue reported by a scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Finding {
    pub fn new(kind: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            severity,
            message: message.into(),
            recommendation: None,
            line: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Sum of severity weights, capped at 100
pub fn risk_score(findings: &[Finding]) -> u32 {
    findings
        .iter()
        .map(|f| f.severity.risk_weight())
        .sum::<u32>()
        .min(100)
}

/// Count findings per severity, in descending severity order
pub fn severity_counts(findings: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for finding in findings {
        match finding.severity {
            Severity::Critical => counts.critical += 1,
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
            Severity::Info => counts.info += 1,
        }
    }
    counts
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

/// 1-based line number of a byte offset
pub fn line_of(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> Finding {
        Finding::new("test", severity, "msg")
    }

    #[test]
    fn test_risk_score_weights() {
        let findings = vec![
            finding(Severity::Critical),
            finding(Severity::High),
            finding(Severity::Medium),
            finding(Severity::Low),
            finding(Severity::Info),
        ];
        assert_eq!(risk_score(&findings), 22);
    }

    #[test]
    fn test_risk_score_caps_at_100() {
        let findings: Vec<_> = (0..20).map(|_| finding(Severity::Critical)).collect();
        assert_eq!(risk_score(&findings), 100);
    }

    #[test]
    fn test_risk_score_monotonic_in_critical_findings() {
        let mut findings = vec![finding(Severity::Low), finding(Severity::High)];
        for _ in 0..15 {
            let before = risk_score(&findings);
            findings.push(finding(Severity::Critical));
            let after = risk_score(&findings);
            assert!(after > before || after == 100, "{before} -> {after}");
        }
    }

    #[test]
    fn test_risk_score_empty() {
        assert_eq!(risk_score(&[]), 0);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_value(finding(Severity::Critical)).unwrap();
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["type"], "test");
        assert!(json.get("line").is_none());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low > Severity::Info);
        assert!(Severity::High.is_blocking());
        assert!(!Severity::Medium.is_blocking());
    }

    #[test]
    fn test_severity_counts() {
        let counts = severity_counts(&[
            finding(Severity::Critical),
            finding(Severity::Critical),
            finding(Severity::Low),
        ]);
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.high, 0);
    }

    #[test]
    fn test_line_of() {
        let text = "a\nb\nc";
        assert_eq!(line_of(text, 0), 1);
        assert_eq!(line_of(text, 2), 2);
        assert_eq!(line_of(text, 4), 3);
        assert_eq!(line_of(text, 999), 3);
    }
}
