//! SOLID adherence; only single responsibility is actually measured

use serde::Serialize;

use super::metrics::Metrics;
use super::smells::LONG_METHOD_COMPLEXITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Principle {
    SingleResponsibility,
    OpenClosed,
    LiskovSubstitution,
    InterfaceSegregation,
    DependencyInversion,
}

const UNMEASURED: [Principle; 4] = [
    Principle::OpenClosed,
    Principle::LiskovSubstitution,
    Principle::InterfaceSegregation,
    Principle::DependencyInversion,
];

#[derive(Debug, Clone, Serialize)]
pub struct Judgment {
    pub principle: Principle,
    pub adhered: bool,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolidReport {
    pub principles: Vec<Judgment>,
    pub score: u32,
}

pub fn check(metrics: &Metrics) -> SolidReport {
    let single = metrics.complexity <= LONG_METHOD_COMPLEXITY;
    let mut principles = vec![Judgment {
        principle: Principle::SingleResponsibility,
        adhered: single,
        note: if single {
            format!("Complexity {} suggests a single responsibility", metrics.complexity)
        } else {
            format!(
                "Complexity {} suggests more than one responsibility",
                metrics.complexity
            )
        },
    }];

    principles.extend(UNMEASURED.iter().map(|&principle| Judgment {
        principle,
        adhered: true,
        note: "Requires deeper analysis than text heuristics allow".to_string(),
    }));

    let score = 20 * principles.iter().filter(|j| j.adhered).count() as u32;
    SolidReport { principles, score }
}
