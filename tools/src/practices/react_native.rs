//! React Native conventions

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Outcome, Rule};
use crate::findings::Severity;

static INLINE_STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"style=\{\{").expect("valid regex"));

static EFFECT_WITH_DEPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\}\s*,\s*\[[^\]]*\]\s*\)").expect("valid regex"));

static INLINE_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"on[A-Z]\w*=\{\s*\([^)]*\)\s*=>").expect("valid regex"));

static CONSOLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bconsole\.(?:log|debug|info)\s*\(").expect("valid regex"));

pub const RULES: &[Rule] = &[
    Rule {
        id: "stylesheet",
        check: stylesheet,
    },
    Rule {
        id: "flatlist-for-lists",
        check: flatlist,
    },
    Rule {
        id: "list-keys",
        check: list_keys,
    },
    Rule {
        id: "effect-dependencies",
        check: effect_dependencies,
    },
    Rule {
        id: "memoized-handlers",
        check: memoized_handlers,
    },
    Rule {
        id: "console-statements",
        check: console_statements,
    },
];

fn stylesheet(code: &str) -> Outcome {
    if INLINE_STYLE.is_match(code) {
        Outcome::Violation {
            severity: Severity::Low,
            message: "Inline style objects are recreated on every render",
            recommendation: "Move styles into StyleSheet.create",
        }
    } else if code.contains("StyleSheet.create") {
        Outcome::Followed("Styles defined with StyleSheet.create")
    } else {
        Outcome::NotApplicable
    }
}

fn flatlist(code: &str) -> Outcome {
    if code.contains("<ScrollView") && code.contains(".map(") {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Mapping items inside ScrollView renders the whole list at once",
            recommendation: "Use FlatList or SectionList for long lists",
        }
    } else if code.contains("<FlatList") || code.contains("<SectionList") {
        Outcome::Followed("Virtualized list used for collections")
    } else {
        Outcome::NotApplicable
    }
}

fn list_keys(code: &str) -> Outcome {
    if !(code.contains(".map(") && code.contains('<')) {
        Outcome::NotApplicable
    } else if code.contains("key=") {
        Outcome::Followed("Mapped elements carry a key prop")
    } else {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "Elements rendered from .map() have no key prop",
            recommendation: "Pass a stable key={item.id} to each mapped element",
        }
    }
}

fn effect_dependencies(code: &str) -> Outcome {
    if !code.contains("useEffect(") {
        Outcome::NotApplicable
    } else if EFFECT_WITH_DEPS.is_match(code) {
        Outcome::Followed("Effects declare dependency arrays")
    } else {
        Outcome::Violation {
            severity: Severity::Medium,
            message: "useEffect without a dependency array runs after every render",
            recommendation: "Pass the dependency array as the second argument of useEffect",
        }
    }
}

fn memoized_handlers(code: &str) -> Outcome {
    if code.contains("useCallback") || code.contains("React.memo") || code.contains("useMemo") {
        Outcome::Followed("Handlers or components are memoized")
    } else if INLINE_HANDLER.is_match(code) {
        Outcome::Violation {
            severity: Severity::Low,
            message: "Inline arrow handlers create new functions on every render",
            recommendation: "Wrap handlers in useCallback and pure children in React.memo",
        }
    } else {
        Outcome::NotApplicable
    }
}

fn console_statements(code: &str) -> Outcome {
    if CONSOLE.is_match(code) {
        Outcome::Violation {
            severity: Severity::Low,
            message: "console statements left in component code",
            recommendation: "Remove console calls or strip them in release builds",
        }
    } else {
        Outcome::NotApplicable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet() {
        assert!(stylesheet("<View style={{ flex: 1 }} />").is_violation());
        assert!(matches!(
            stylesheet("const styles = StyleSheet.create({})"),
            Outcome::Followed(_)
        ));
    }

    #[test]
    fn test_flatlist() {
        let code = "<ScrollView>{items.map(i => <Row key={i.id} />)}</ScrollView>";
        assert!(flatlist(code).is_violation());
        assert!(!flatlist("<FlatList data={items} />").is_violation());
    }

    #[test]
    fn test_list_keys() {
        assert!(list_keys("items.map(i => <Row item={i} />)").is_violation());
        assert!(!list_keys("items.map(i => <Row key={i.id} />)").is_violation());
    }

    #[test]
    fn test_effect_dependencies() {
        assert!(effect_dependencies("useEffect(() => {\n  load();\n});").is_violation());
        assert!(matches!(
            effect_dependencies("useEffect(() => {\n  load();\n}, [id]);"),
            Outcome::Followed(_)
        ));
    }

    #[test]
    fn test_memoized_handlers() {
        assert!(memoized_handlers("<Button onPress={() => save()} />").is_violation());
        let memoized = "const onPress = useCallback(() => save(), []);";
        assert!(!memoized_handlers(memoized).is_violation());
    }

    #[test]
    fn test_console_statements() {
        assert!(console_statements("console.log(data)").is_violation());
        assert!(!console_statements("logger.info(data)").is_violation());
    }
}
