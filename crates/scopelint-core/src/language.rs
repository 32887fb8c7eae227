//! Source languages understood by the analyzer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// A source language with its own tree-sitter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JavaScript (`.js`, `.mjs`, `.cjs`, `.jsx`).
    JavaScript,
    /// TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`).
    TypeScript,
    /// Python (`.py`, `.pyi`).
    Python,
}

impl Language {
    /// Every supported language.
    pub const ALL: &'static [Self] = &[Self::JavaScript, Self::TypeScript, Self::Python];

    /// The JavaScript family (shares one token model).
    pub const ECMASCRIPT: &'static [Self] = &[Self::JavaScript, Self::TypeScript];

    /// Detects the language from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "py" | "pyi" => Some(Self::Python),
            _ => None,
        }
    }

    /// Returns true for JavaScript and TypeScript.
    #[must_use]
    pub fn is_ecmascript(self) -> bool {
        matches!(self, Self::JavaScript | Self::TypeScript)
    }

    /// Line comment marker used for allow directives.
    #[must_use]
    pub fn comment_marker(self) -> &'static str {
        match self {
            Self::JavaScript | Self::TypeScript => "//",
            Self::Python => "#",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JavaScript => write!(f, "javascript"),
            Self::TypeScript => write!(f, "typescript"),
            Self::Python => write!(f, "python"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "python" | "py" => Ok(Self::Python),
            other => Err(format!(
                "unknown language `{other}`. Valid values: javascript, typescript, python"
            )),
        }
    }
}
