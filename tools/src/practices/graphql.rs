//! GraphQL (graphql-ruby) conventions

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Outcome, Rule};
use crate::findings::Severity;

static FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*field\s+:\w+[^\n]*").expect("valid regex"));

static LIST_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"field\s+:\w+\s*,\s*\[").expect("valid regex"));

static QUERY_IN_RESOLVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(?:where|find|find_by)\b").expect("valid regex"));

static BATCH_LOADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"dataloader|BatchLoader|GraphQL::Batch|Loaders::").expect("valid regex")
});

static SCHEMA_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)<\s*GraphQL::Schema[ \t]*$").expect("valid regex"));

static MUTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*(?:Mutations::)?BaseMutation\b").expect("valid regex"));

pub const RULES: &[Rule] = &[
    Rule {
        id: "query-limits",
        check: query_limits,
    },
    Rule {
        id: "batch-loading",
        check: batch_loading,
    },
    Rule {
        id: "field-descriptions",
        check: field_descriptions,
    },
    Rule {
        id: "mutation-errors",
        check: mutation_errors,
    },
    Rule {
        id: "connection-pagination",
        check: connection_pagination,
    },
];

fn query_limits(code: &str) -> Outcome {
    if !SCHEMA_CLASS.is_match(code) {
        Outcome::NotApplicable
    } else if code.contains("max_complexity") || code.contains("max_depth") {
        Outcome::Followed("Schema limits query depth or complexity")
    } else {
        Outcome::Violation {
            severity: Severity::High,
            message: "Schema has no max_depth or max_complexity limit",
            recommendation: "Set max_depth and max_complexity on the schema class",
        }
    }
}

fn batch_loading(code: &str) -> Outcome {
    if BATCH_LOADER.is_match(code) {
        Outcome::Followed("Associations resolved through a batch loader")
    } else if code.contains("def ") && FIELD.is_match(code) && QUERY_IN_RESOLVER.is_match(code) {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Field resolvers query the database per object (N+1)",
            recommendation: "Resolve associations with dataloader sources or GraphQL::Batch",
        }
    } else {
        Outcome::NotApplicable
    }
}

fn field_descriptions(code: &str) -> Outcome {
    let fields: Vec<_> = FIELD.find_iter(code).collect();
    if fields.is_empty() {
        Outcome::NotApplicable
    } else if fields.iter().all(|f| f.as_str().contains("description")) {
        Outcome::Followed("Every field is described")
    } else {
        Outcome::Violation {
            severity: Severity::Low,
            message: "Some fields have no description",
            recommendation: "Add description: to fields so the schema documents itself",
        }
    }
}

fn mutation_errors(code: &str) -> Outcome {
    if !MUTATION.is_match(code) {
        Outcome::NotApplicable
    } else if code.contains("field :errors") {
        Outcome::Followed("Mutation returns user-facing errors")
    } else {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Mutation does not expose an errors field",
            recommendation: "Return `field :errors, [String], null: false` alongside the payload",
        }
    }
}

fn connection_pagination(code: &str) -> Outcome {
    if code.contains("connection_type") {
        Outcome::Followed("Lists are exposed as paginated connections")
    } else if LIST_FIELD.is_match(code) {
        Outcome::Violation {
            severity: Severity::Low,
            message: "List fields return unbounded arrays",
            recommendation: "Use Types::X.connection_type for collections",
        }
    } else {
        Outcome::NotApplicable
    }
}
