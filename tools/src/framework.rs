//! Framework and language tags accepted by the agents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application framework a snippet belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "rails")]
    Rails,
    #[serde(rename = "react-native")]
    ReactNative,
    #[serde(rename = "graphql")]
    Graphql,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::Rails, Framework::ReactNative, Framework::Graphql];

    /// Wire names, for schema enums
    pub const NAMES: [&'static str; 3] = ["rails", "react-native", "graphql"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Rails => "rails",
            Framework::ReactNative => "react-native",
            Framework::Graphql => "graphql",
        }
    }

    /// Language snippets of this framework are usually written in
    pub fn language(&self) -> Language {
        match self {
            Framework::Rails | Framework::Graphql => Language::Ruby,
            Framework::ReactNative => Language::JavaScript,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "rails" | "ruby-on-rails" => Ok(Framework::Rails),
            "react-native" | "reactnative" => Ok(Framework::ReactNative),
            "graphql" => Ok(Framework::Graphql),
            other => Err(format!("Unsupported framework: {other}")),
        }
    }
}

/// Source language, used to pick comment markers and patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ruby,
    JavaScript,
    TypeScript,
}

impl Language {
    pub const NAMES: [&'static str; 3] = ["ruby", "javascript", "typescript"];

    /// Guess the language of a snippet from surface syntax
    pub fn detect(code: &str) -> Language {
        let ts_markers = [": string", ": number", ": boolean", "interface ", "<Props>"];
        let js_markers = ["const ", "let ", "function ", "=>", "import ", "export "];
        let ruby_markers = ["def ", "end\n", "require ", "attr_", "do |", "module "];

        let score = |markers: &[&str]| markers.iter().filter(|m| code.contains(*m)).count();

        let ruby = score(&ruby_markers) + usize::from(code.trim_end().ends_with("end"));
        let js = score(&js_markers);
        if ruby > js {
            Language::Ruby
        } else if score(&ts_markers) > 0 {
            Language::TypeScript
        } else if js > 0 {
            Language::JavaScript
        } else {
            Language::Ruby
        }
    }

    /// Marker for a single-line comment
    pub fn comment_marker(&self) -> &'static str {
        match self {
            Language::Ruby => "#",
            Language::JavaScript | Language::TypeScript => "//",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Ruby => "ruby",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        })
    }
}
