//! # scopelint-rules
//!
//! Built-in lint rules for scopelint.
//!
//! ## Available Rules
//!
//! | Code | Name | Languages | Description |
//! |------|------|-----------|-------------|
//! | SL001 | `no-var` | JS, TS | Forbids function-scoped `var` declarations |
//! | SL002 | `prefer-const` | JS, TS | Requires `const` for `let` bindings never reassigned |
//! | SL003 | `eqeqeq` | JS, TS | Requires `===` / `!==` instead of `==` / `!=` |
//! | SL101 | `unused-import` | Python | Detects imports that are never used |
//! | SL102 | `line-too-long` | all | Limits characters per line |
//! | SL103 | `unused-variable` | Python | Detects locals assigned but never used |
//!
//! ## Usage
//!
//! ```ignore
//! use scopelint_core::Analyzer;
//! use scopelint_rules::{Eqeqeq, NoVar};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./web")
//!     .rule(NoVar::new())
//!     .rule(Eqeqeq::new().allow_null(true))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod eqeqeq;
pub mod line_too_long;
pub mod no_var;
pub mod prefer_const;
mod presets;
pub mod unused_import;
pub mod unused_variable;

pub use eqeqeq::Eqeqeq;
pub use line_too_long::LineTooLong;
pub use no_var::NoVar;
pub use prefer_const::PreferConst;
pub use presets::{
    all_rules, minimal_rules, recommended_rules, resolve_rule_name, select_rules, strict_rules,
    Preset,
};
pub use unused_import::UnusedImport;
pub use unused_variable::UnusedVariable;

/// Re-export core types for convenience.
pub use scopelint_core::{Rule, Severity, Violation};
