//! # scopelint-core
//!
//! Core framework for syntax-aware source linting.
//!
//! This crate provides the foundational traits and types for the scopelint
//! rules. It includes:
//!
//! - [`syntax`] parsing JavaScript, TypeScript and Python with tree-sitter
//!   and flattening the trees into tokens
//! - [`Rule`] trait for per-file rules over a [`FileContext`]
//! - [`Analyzer`] for orchestrating lint execution over files or raw text
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use scopelint_core::{Analyzer, Language};
//! use std::path::Path;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./web")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! let inline = analyzer.check_source(Path::new("snippet.js"), Language::JavaScript, "var x = 1;");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod language;
mod rule;
mod types;

pub mod syntax;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, SourceLine};
pub use language::Language;
pub use syntax::{Token, TokenKind};
pub use rule::{Rule, RuleBox};
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
