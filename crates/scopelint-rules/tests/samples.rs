//! End-to-end checks of the built-in rules through the analyzer.
//!
//! The sample files under `tests/fixtures/` carry comments naming the
//! findings they are expected to produce.

use scopelint_core::{Analyzer, Config, Language, Severity, Violation};
use scopelint_rules::{recommended_rules, select_rules, Preset};
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn analyzer_for(root: &Path, config: Config) -> Analyzer {
    let mut builder = Analyzer::builder().root(root).config(config);
    for rule in recommended_rules() {
        builder = builder.rule_box(rule);
    }
    builder.build().expect("analyzer should build")
}

fn inline_analyzer() -> Analyzer {
    analyzer_for(&fixture_root(), Config::default())
}

fn summary(violations: &[Violation]) -> Vec<(&str, usize)> {
    violations
        .iter()
        .map(|v| (v.rule.as_str(), v.location.line))
        .collect()
}

fn compact(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::compact)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Behaviour on raw snippets ──

#[test]
fn var_declaration_yields_one_violation() {
    let violations =
        inline_analyzer().check_source(Path::new("snippet.js"), Language::JavaScript, "var x = 1;");
    assert_eq!(summary(&violations), vec![("no-var", 1)]);
}

#[test]
fn unreassigned_let_and_loose_equality() {
    let violations = inline_analyzer().check_source(
        Path::new("snippet.js"),
        Language::JavaScript,
        "let y = 2;\nif (y == 2) {}",
    );
    assert_eq!(summary(&violations), vec![("prefer-const", 1), ("eqeqeq", 2)]);
}

#[test]
fn reassigned_let_is_clean() {
    let violations = inline_analyzer().check_source(
        Path::new("snippet.js"),
        Language::JavaScript,
        "let z = 3;\nz = 4;",
    );
    assert!(violations.is_empty(), "unexpected: {violations:#?}");
}

#[test]
fn empty_input_is_clean() {
    for language in Language::ALL {
        let violations = inline_analyzer().check_source(Path::new("empty"), *language, "");
        assert!(violations.is_empty());
    }
}

#[test]
fn lines_matching_no_pattern_are_clean() {
    let code = "const a = 1;\nif (a === 1) {\n  console.log(a);\n}\n";
    let violations =
        inline_analyzer().check_source(Path::new("clean.ts"), Language::TypeScript, code);
    assert!(violations.is_empty());
}

#[test]
fn same_line_violations_keep_rule_order() {
    let violations = inline_analyzer().check_source(
        Path::new("snippet.js"),
        Language::JavaScript,
        "var a = 1; let b = 2; if (a == b) {}",
    );
    assert_eq!(
        summary(&violations),
        vec![("no-var", 1), ("prefer-const", 1), ("eqeqeq", 1)]
    );
}

#[test]
fn shadowed_reassignment_leaves_outer_binding_flagged() {
    let code = "let count = 0;\nfunction tick() {\n  let count = 1;\n  count += 1;\n}\n";
    let violations =
        inline_analyzer().check_source(Path::new("snippet.js"), Language::JavaScript, code);
    assert_eq!(summary(&violations), vec![("prefer-const", 1)]);
}

#[test]
fn operators_in_literals_and_comments_are_ignored() {
    let code = "const s = 'a == b';\nconst t = `x != ${s}`;\n// if (a == b)\n/* c != d */\nconst r = /==/;\n";
    let violations =
        inline_analyzer().check_source(Path::new("snippet.js"), Language::JavaScript, code);
    assert!(violations.is_empty(), "unexpected: {violations:#?}");
}

// ── Sample files ──

#[test]
fn typescript_sample() {
    let root = fixture_root().join("example.ts");
    let result = analyzer_for(&root, Config::default())
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.files_checked, 1);
    assert!(result.violations.iter().all(|v| v.severity == Severity::Error));
    insta::assert_snapshot!(compact(&result.violations), @r"
    example.ts:4:1: error [SL001] Unexpected var, use let or const instead
    example.ts:5:1: error [SL001] Unexpected var, use let or const instead
    example.ts:8:5: error [SL002] 'greeting' is never reassigned. Use 'const' instead
    example.ts:11:10: error [SL003] Expected '===' and instead saw '=='
    example.ts:16:1: error [SL001] Unexpected var, use let or const instead
    example.ts:17:11: error [SL003] Expected '!==' and instead saw '!='
    ");
}

#[test]
fn python_sample() {
    let root = fixture_root().join("utils.py");
    let result = analyzer_for(&root, Config::default())
        .analyze()
        .expect("analysis should succeed");

    assert!(result.violations.iter().all(|v| v.severity == Severity::Warning));
    insta::assert_snapshot!(compact(&result.violations), @r"
    utils.py:4:8: warning [SL101] `os` imported but unused
    utils.py:5:8: warning [SL101] `sys` imported but unused
    utils.py:6:8: warning [SL101] `json` imported but unused
    utils.py:9:101: warning [SL102] Line too long (133 > 100)
    utils.py:13:5: warning [SL103] Local variable `unused_result` is assigned to but never used
    ");
}

#[test]
fn directory_walk_orders_by_file_then_line() {
    let result = inline_analyzer().analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 2);
    let files: Vec<String> = result
        .violations
        .iter()
        .map(|v| v.location.file.display().to_string())
        .collect();
    let first_py = files.iter().position(|f| f == "utils.py");
    assert_eq!(first_py, Some(6));
    assert_eq!(result.count_by_severity(), (6, 5, 0));
}

// ── Configuration ──

#[test]
fn config_disables_rules_and_overrides_severity() {
    let config = Config::parse(
        r#"
[rules.no-var]
enabled = false

[rules.eqeqeq]
severity = "warning"
"#,
    )
    .expect("config should parse");
    let root = fixture_root().join("example.ts");
    let result = analyzer_for(&root, config).analyze().expect("analysis should succeed");

    assert!(result.violations.iter().all(|v| v.rule != "no-var"));
    let eq: Vec<Severity> = result
        .violations
        .iter()
        .filter(|v| v.rule == "eqeqeq")
        .map(|v| v.severity)
        .collect();
    assert_eq!(eq, vec![Severity::Warning, Severity::Warning]);
}

#[test]
fn allow_directive_suppresses_with_reason() {
    let code = "// scopelint: allow(no-var) reason=\"legacy global\"\nvar legacy = 1;\nvar other = 2;\n";
    let violations =
        inline_analyzer().check_source(Path::new("snippet.js"), Language::JavaScript, code);
    assert_eq!(summary(&violations), vec![("no-var", 3)]);
}

#[test]
fn allow_directive_without_reason_warns_for_error_rules() {
    let code = "var legacy = 1; // scopelint: allow(no-var)\n";
    let violations =
        inline_analyzer().check_source(Path::new("snippet.js"), Language::JavaScript, code);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].severity, Severity::Warning);
    assert!(violations[0].message.contains("missing required reason"));
}

#[test]
fn python_allow_directive_uses_hash_comment() {
    let code = "import readline  # scopelint: allow(unused-import)\n";
    let violations = inline_analyzer().check_source(Path::new("m.py"), Language::Python, code);
    assert!(violations.is_empty());
}

#[test]
fn selection_by_alias_limits_rules() {
    let mut builder = Analyzer::builder().root(fixture_root().join("example.ts"));
    for rule in select_rules(Preset::Recommended.rules(), &["loose-equality"]) {
        builder = builder.rule_box(rule);
    }
    let result = builder
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed");
    assert_eq!(summary(&result.violations), vec![("eqeqeq", 11), ("eqeqeq", 17)]);
}
