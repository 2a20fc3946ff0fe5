//! Test skeleton rendering for rspec, minitest and jest

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::cases::{callables, suggest_for, TestCase};
use crate::docs::UnitKind;
use crate::framework::{Framework, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    Rspec,
    Minitest,
    Jest,
}

impl TestFramework {
    pub const NAMES: [&'static str; 3] = ["rspec", "minitest", "jest"];

    pub fn default_for(framework: Framework) -> Self {
        match framework {
            Framework::Rails | Framework::Graphql => TestFramework::Rspec,
            Framework::ReactNative => TestFramework::Jest,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedTests {
    pub test_framework: TestFramework,
    pub file_name: String,
    pub subject: String,
    pub cases: usize,
    pub code: String,
}

/// Render one skeleton test per suggested case for every function in `code`
pub fn generate(
    code: &str,
    framework: Framework,
    test_framework: Option<TestFramework>,
) -> GeneratedTests {
    let test_framework = test_framework.unwrap_or_else(|| TestFramework::default_for(framework));
    let language = match framework {
        Framework::ReactNative => Language::detect(code),
        _ => framework.language(),
    };

    let callables = callables(code, language);
    let subject = crate::docs::extract_units(code, language)
        .into_iter()
        .find(|u| matches!(u.kind, UnitKind::Class | UnitKind::Module))
        .map(|u| u.name)
        .unwrap_or_else(|| "Subject".to_string());

    let groups: Vec<(String, Vec<TestCase>)> = callables
        .iter()
        .map(|(unit, body)| (unit.name.clone(), suggest_for(unit, body)))
        .collect();
    let cases = groups.iter().map(|(_, c)| c.len()).sum();

    let rendered = match test_framework {
        TestFramework::Rspec => rspec(&subject, framework, &groups),
        TestFramework::Minitest => minitest(&subject, &groups),
        TestFramework::Jest => jest(&subject, &groups),
    };

    GeneratedTests {
        file_name: file_name(&subject, test_framework, language),
        test_framework,
        subject,
        cases,
        code: rendered,
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::new();
    for (i, ch) in name.replace("::", "/").chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('/') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn file_name(subject: &str, test_framework: TestFramework, language: Language) -> String {
    let base = snake_case(subject);
    match test_framework {
        TestFramework::Rspec => format!("spec/{base}_spec.rb"),
        TestFramework::Minitest => format!("test/{base}_test.rb"),
        TestFramework::Jest => {
            let ext = if language == Language::TypeScript { "ts" } else { "js" };
            format!("__tests__/{subject}.test.{ext}")
        }
    }
}

fn rspec(subject: &str, framework: Framework, groups: &[(String, Vec<TestCase>)]) -> String {
    let spec_type = if framework == Framework::Graphql {
        ", type: :graphql"
    } else if subject.ends_with("Controller") {
        ", type: :request"
    } else {
        ""
    };

    let mut out = format!("require 'rails_helper'\n\nRSpec.describe {subject}{spec_type} do\n");
    for (i, (method, cases)) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "  describe '#{method}' do");
        for case in cases {
            let _ = writeln!(out, "    it '{}' do", case.description);
            let _ = writeln!(out, "      pending 'write expectations for {method}'");
            out.push_str("    end\n");
        }
        out.push_str("  end\n");
    }
    out.push_str("end\n");
    out
}

fn minitest(subject: &str, groups: &[(String, Vec<TestCase>)]) -> String {
    let class = subject.replace("::", "");
    let mut out = format!("require 'test_helper'\n\nclass {class}Test < ActiveSupport::TestCase\n");
    for (method, cases) in groups {
        for case in cases {
            let _ = writeln!(out, "  test '{method} {}' do", case.description);
            let _ = writeln!(out, "    skip 'write assertions for {method}'");
            out.push_str("  end\n");
        }
    }
    out.push_str("end\n");
    out
}

fn jest(subject: &str, groups: &[(String, Vec<TestCase>)]) -> String {
    let imports: Vec<&str> = groups.iter().map(|(name, _)| name.as_str()).collect();
    let mut out = String::new();
    if !imports.is_empty() {
        let _ = writeln!(out, "import {{ {} }} from '../{subject}';\n", imports.join(", "));
    }
    let _ = writeln!(out, "describe('{subject}', () => {{");
    for (method, cases) in groups {
        let _ = writeln!(out, "  describe('{method}', () => {{");
        for case in cases {
            let _ = writeln!(out, "    it('{}', () => {{", case.description);
            let _ = writeln!(out, "      expect({method}).toBeDefined();");
            out.push_str("    });\n");
        }
        out.push_str("  });\n");
    }
    out.push_str("});\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "class Billing::Invoice\n  def total(items)\n    raise 'empty' if items.empty?\n  end\nend";

    #[test]
    fn test_rspec_skeleton() {
        let out = generate(MODEL, Framework::Rails, None);
        assert_eq!(out.test_framework, TestFramework::Rspec);
        assert_eq!(out.file_name, "spec/billing/invoice_spec.rb");
        assert_eq!(out.cases, 3);
        assert!(out.code.starts_with("require 'rails_helper'"));
        assert!(out.code.contains("RSpec.describe Billing::Invoice do"));
        assert!(out.code.contains("describe '#total' do"));
        assert_eq!(out.code.matches("    it '").count(), 3);
    }

    #[test]
    fn test_minitest_skeleton() {
        let out = generate(MODEL, Framework::Rails, Some(TestFramework::Minitest));
        assert_eq!(out.file_name, "test/billing/invoice_test.rb");
        assert!(out.code.contains("class BillingInvoiceTest < ActiveSupport::TestCase"));
        assert_eq!(out.code.matches("skip '").count(), 3);
    }

    #[test]
    fn test_jest_default_for_react_native() {
        let code = "export function formatPrice(amount) {\n  return `$${amount}`;\n}";
        let out = generate(code, Framework::ReactNative, None);
        assert_eq!(out.test_framework, TestFramework::Jest);
        assert_eq!(out.file_name, "__tests__/Subject.test.js");
        assert!(out.code.contains("import { formatPrice } from '../Subject';"));
        assert!(out.code.contains("describe('formatPrice', () => {"));
    }

    #[test]
    fn test_graphql_spec_type() {
        let code = "class Mutations::CreatePost\n  def resolve(title:)\n  end\nend";
        let out = generate(code, Framework::Graphql, None);
        assert!(out.code.contains("type: :graphql"));
    }

    #[test]
    fn test_no_functions_still_renders_describe() {
        let out = generate("", Framework::Rails, None);
        assert_eq!(out.cases, 0);
        assert!(out.code.contains("RSpec.describe Subject do"));
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("UsersController"), "users_controller");
        assert_eq!(snake_case("Api::V1::Posts"), "api/v1/posts");
    }
}
