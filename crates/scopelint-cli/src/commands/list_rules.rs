//! List rules command implementation.

use scopelint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    print!("{}", listing());
}

fn listing() -> String {
    let mut out = String::from("Available rules:\n\n");
    out.push_str(&format!(
        "{:<8} {:<17} {:<24} {:<9} Description\n",
        "Code", "Name", "Languages", "Severity"
    ));
    out.push_str(&"-".repeat(100));
    out.push('\n');

    for rule in all_rules() {
        let languages = rule
            .languages()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{:<8} {:<17} {:<24} {:<9} {}\n",
            rule.code(),
            rule.name(),
            languages,
            rule.default_severity().to_string(),
            rule.description()
        ));
    }

    out.push_str("\nPresets:\n");
    out.push_str("  recommended  - all rules, 100 character lines (default)\n");
    out.push_str("  strict       - all rules, 80 character lines\n");
    out.push_str("  minimal      - SL001, SL003 only (for gradual adoption)\n");

    out.push_str("\nAliases: unscoped-declaration (no-var), unnecessary-reassignable (prefer-const), loose-equality (eqeqeq)\n");

    out.push_str("\nUse --rules to filter specific rules, e.g.:\n");
    out.push_str("  scopelint check --rules no-var,eqeqeq\n");
    out.push_str("  SCOPELINT_RULES=SL101,SL103 scopelint check src/\n");
    out
}
