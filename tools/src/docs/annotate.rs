//! Stub comments for undocumented declarations

use serde::Serialize;

use super::extract::extract_units;
use crate::framework::Language;

#[derive(Debug, Clone, Serialize)]
pub struct Annotated {
    pub code: String,
    pub added: usize,
}

/// Insert a stub comment above every declaration without a description.
/// Documented declarations and all other lines are left as they were.
pub fn add_missing_comments(code: &str, language: Language) -> Annotated {
    let marker = language.comment_marker();
    let undocumented: Vec<_> = extract_units(code, language)
        .into_iter()
        .filter(|u| !u.is_documented())
        .collect();

    let newline = if code.contains("\r\n") { "\r\n" } else { "\n" };
    let mut out = String::with_capacity(code.len() + 48 * undocumented.len());
    let mut pending = undocumented.iter().peekable();

    for (index, line) in code.split_inclusive('\n').enumerate() {
        if let Some(unit) = pending.next_if(|u| u.line == index + 1) {
            let ending = match line.strip_suffix('\n') {
                Some(rest) if rest.ends_with('\r') => "\r\n",
                Some(_) => "\n",
                None => newline,
            };
            out.push_str(&format!(
                "{}{marker} TODO: describe {} `{}`{ending}",
                unit.indent,
                unit.kind.as_str(),
                unit.name
            ));
        }
        out.push_str(line);
    }

    Annotated {
        code: out,
        added: undocumented.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_stub_with_indentation() {
        let code = "class Cart\n  # Sums items\n  def total\n  end\n\n  def empty?\n  end\nend\n";
        let result = add_missing_comments(code, Language::Ruby);
        assert_eq!(result.added, 2);
        assert_eq!(
            result.code,
            "# TODO: describe class `Cart`\nclass Cart\n  # Sums items\n  def total\n  end\n\n  # TODO: describe method `empty?`\n  def empty?\n  end\nend\n"
        );
    }

    #[test]
    fn test_js_marker() {
        let result = add_missing_comments("function go() {}", Language::JavaScript);
        assert_eq!(result.code, "// TODO: describe function `go`\nfunction go() {}");
    }

    #[test]
    fn test_fully_documented_is_unchanged() {
        let code = "# Runs\ndef run\nend";
        let result = add_missing_comments(code, Language::Ruby);
        assert_eq!(result.added, 0);
        assert_eq!(result.code, code);
    }

    #[test]
    fn test_crlf_line_endings_preserved() {
        let code = "# Runs\r\ndef run\r\nend\r\n";
        let result = add_missing_comments(code, Language::Ruby);
        assert_eq!(result.added, 0);
        assert_eq!(result.code, code);

        let bare = add_missing_comments("def run\r\nend\r\n", Language::Ruby);
        assert_eq!(bare.added, 1);
        assert_eq!(bare.code, "# TODO: describe method `run`\r\ndef run\r\nend\r\n");
    }

    #[test]
    fn test_annotated_code_is_fully_documented() {
        let code = "def a\nend\ndef b\nend";
        let once = add_missing_comments(code, Language::Ruby);
        let twice = add_missing_comments(&once.code, Language::Ruby);
        assert_eq!(twice.added, 0);
    }
}
