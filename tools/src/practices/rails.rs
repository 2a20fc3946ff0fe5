//! Rails conventions

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Outcome, Rule};
use crate::findings::Severity;

static RAW_PARAMS_WRITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(?:create!?|update!?|new|assign_attributes)\s*\(\s*params\b").expect("valid regex")
});

static EACH_OVER_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(?:all|where\([^)]*\))\.each\b").expect("valid regex"));

static EAGER_LOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(?:includes|preload|eager_load)\s*\(").expect("valid regex"));

static MODEL_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"class\s+\w+\s*<\s*(?:ApplicationRecord|ActiveRecord::Base)").expect("valid regex")
});

static METHOD_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*def\s+\w").expect("valid regex"));

static RAW_SQL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfind_by_sql\b|\bexec_query\b|connection\.execute\b").expect("valid regex")
});

static RESCUE_EXCEPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\brescue\s+Exception\b").expect("valid regex"));

const MAX_CONTROLLER_ACTIONS: usize = 7;
const MAX_CONTROLLER_LINES: usize = 100;

pub const RULES: &[Rule] = &[
    Rule {
        id: "strong-parameters",
        check: strong_parameters,
    },
    Rule {
        id: "n-plus-one-query",
        check: n_plus_one,
    },
    Rule {
        id: "model-validations",
        check: model_validations,
    },
    Rule {
        id: "skinny-controller",
        check: skinny_controller,
    },
    Rule {
        id: "raw-sql",
        check: raw_sql,
    },
    Rule {
        id: "rescue-exception",
        check: rescue_exception,
    },
];

fn strong_parameters(code: &str) -> Outcome {
    if code.contains(".permit(") {
        Outcome::Followed("Strong parameters whitelist attributes with permit")
    } else if RAW_PARAMS_WRITE.is_match(code) {
        Outcome::Violation {
            severity: Severity::High,
            message: "Model written directly from params (mass assignment)",
            recommendation: "Use params.require(:model).permit(...) in a private *_params method",
        }
    } else {
        Outcome::NotApplicable
    }
}

fn n_plus_one(code: &str) -> Outcome {
    if EAGER_LOAD.is_match(code) {
        Outcome::Followed("Associations are eager loaded")
    } else if EACH_OVER_QUERY.is_match(code) {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Iterating a query without eager loading may cause N+1 queries",
            recommendation: "Preload associations with includes(:association)",
        }
    } else {
        Outcome::NotApplicable
    }
}

fn model_validations(code: &str) -> Outcome {
    if !MODEL_CLASS.is_match(code) {
        Outcome::NotApplicable
    } else if code.contains("validates") || code.contains("validate ") {
        Outcome::Followed("Model declares validations")
    } else {
        Outcome::Violation {
            severity: Severity::Low,
            message: "Model has no validations",
            recommendation: "Validate required attributes with validates :attr, presence: true",
        }
    }
}

fn skinny_controller(code: &str) -> Outcome {
    if !code.contains("Controller") {
        return Outcome::NotApplicable;
    }
    let actions = METHOD_DEF.find_iter(code).count();
    let lines = code.lines().filter(|l| !l.trim().is_empty()).count();
    if actions > MAX_CONTROLLER_ACTIONS || lines > MAX_CONTROLLER_LINES {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Controller is too large",
            recommendation: "Move business logic into models, service objects or concerns",
        }
    } else {
        Outcome::Followed("Controller stays thin")
    }
}

fn raw_sql(code: &str) -> Outcome {
    if RAW_SQL.is_match(code) {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Raw SQL bypasses the ActiveRecord query interface",
            recommendation: "Prefer where/joins/select with bound parameters",
        }
    } else {
        Outcome::NotApplicable
    }
}

fn rescue_exception(code: &str) -> Outcome {
    if RESCUE_EXCEPTION.is_match(code) {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Rescuing Exception swallows signals and system errors",
            recommendation: "Rescue StandardError or a specific error class",
        }
    } else {
        Outcome::NotApplicable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_parameters() {
        assert!(strong_parameters("User.create(params[:user])").is_violation());
        assert!(matches!(
            strong_parameters("params.require(:user).permit(:name)"),
            Outcome::Followed(_)
        ));
        assert!(matches!(strong_parameters("x = 1"), Outcome::NotApplicable));
    }

    #[test]
    fn test_n_plus_one() {
        assert!(n_plus_one("Post.all.each { |p| p.author.name }").is_violation());
        assert!(!n_plus_one("Post.includes(:author).each { |p| p.author.name }").is_violation());
    }

    #[test]
    fn test_model_validations() {
        assert!(model_validations("class User < ApplicationRecord\nend").is_violation());
        let validated = "class User < ApplicationRecord\n  validates :email, presence: true\nend";
        assert!(matches!(model_validations(validated), Outcome::Followed(_)));
    }

    #[test]
    fn test_skinny_controller() {
        let mut fat = String::from("class PostsController < ApplicationController\n");
        for i in 0..8 {
            fat.push_str(&format!("  def action_{i}\n  end\n"));
        }
        fat.push_str("end\n");
        assert!(skinny_controller(&fat).is_violation());
        let slim = "class PostsController < ApplicationController\n  def index\n  end\nend";
        assert!(!skinny_controller(slim).is_violation());
    }

    #[test]
    fn test_rescue_exception() {
        assert!(rescue_exception("begin\n  x\nrescue Exception => e\nend").is_violation());
        assert!(!rescue_exception("rescue StandardError => e").is_violation());
    }
}
