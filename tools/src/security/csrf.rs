//! Missing forgery protection on controllers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::findings::{line_of, Finding, Severity};

static CLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*class\s+[A-Z]").expect("valid regex"));

/// A class whose name or body mentions `Controller`
pub fn is_controller(code: &str) -> bool {
    CLASS_DECL.is_match(code) && code.contains("Controller")
}

/// Flag controllers that never declare `protect_from_forgery`.
/// API-only controllers are exempt since they do not use cookies.
pub fn detect(code: &str) -> Option<Finding> {
    if !is_controller(code)
        || code.contains("protect_from_forgery")
        || code.contains("ActionController::API")
    {
        return None;
    }

    let line = CLASS_DECL
        .find(code)
        .map(|m| line_of(code, m.start()))
        .unwrap_or(1);

    Some(
        Finding::new(
            "missing-csrf-protection",
            Severity::Medium,
            "Controller does not declare CSRF protection",
        )
        .with_recommendation("Add `protect_from_forgery with: :exception` to the controller")
        .at_line(line),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_unprotected_controller() {
        let code = "# users\nclass UsersController < ApplicationController\n  def create; end\nend";
        let finding = detect(code).unwrap();
        assert_eq!(finding.kind, "missing-csrf-protection");
        assert_eq!(finding.line, Some(2));
    }

    #[test]
    fn test_protected_controller_is_clean() {
        let code = "class ApplicationController < ActionController::Base\n  protect_from_forgery with: :exception\nend";
        assert!(detect(code).is_none());
    }

    #[test]
    fn test_api_controller_is_exempt() {
        let code = "class Api::UsersController < ActionController::API\nend";
        assert!(detect(code).is_none());
    }

    #[test]
    fn test_plain_class_is_clean() {
        assert!(detect("class Widget < Base\nend").is_none());
        assert!(!is_controller("UsersController.new"));
    }
}
