//! Rule to require `const` for `let` bindings that are never reassigned.
//!
//! # Rationale
//!
//! A `let` binding that is never reassigned tells the reader it might
//! change when it never does. `const` states the intent and lets tooling
//! catch accidental writes.
//!
//! # Detected Patterns
//!
//! - `let x = 1;` with no later `x = ...`, `x += ...`, `x++`, destructuring
//!   assignment, or `for (x of ...)` in the binding's scope
//! - `for (let item of items) {}` where `item` is never reassigned
//!
//! The rule walks the syntax tree. Functions, blocks, `for` heads, and
//! `catch` clauses open scopes, and `var` hoists to the enclosing function.
//! A write resolves to the innermost binding of its name visible from the
//! write's scope, so a write to a shadowing `let`, `const`, `var`, or
//! parameter does not count for the outer binding. `let x;` without an
//! initializer is never reported.

use scopelint_core::{FileContext, Language, Replacement, Rule, Severity, Suggestion, Violation};
use std::collections::HashMap;
use tree_sitter::Node;

/// Rule code for prefer-const.
pub const CODE: &str = "SL002";

/// Rule name for prefer-const.
pub const NAME: &str = "prefer-const";

/// Nodes whose parameters and body form a function scope.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

/// Requires `const` for `let` bindings that are never reassigned.
#[derive(Debug, Clone)]
pub struct PreferConst {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for PreferConst {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferConst {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for PreferConst {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires const for let bindings that are never reassigned"
    }

    fn languages(&self) -> &'static [Language] {
        Language::ECMASCRIPT
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let Some(tree) = ctx.tree.as_ref() else {
            return Vec::new();
        };

        let mut walker = ScopeWalker::new(ctx.content);
        let program = walker.push_scope(None, true);
        walker.visit(tree.root_node(), program);

        walker
            .never_reassigned()
            .into_iter()
            .map(|binding| {
                let message = format!(
                    "'{}' is never reassigned. Use 'const' instead",
                    binding.name
                );
                let suggestion = match binding.candidate {
                    Some(LetDecl {
                        keyword,
                        sole: true,
                    }) => Suggestion::with_fix(
                        "Declare it with `const`",
                        Replacement::new(ctx.location_of_node(&keyword), "const"),
                    ),
                    _ => Suggestion::new("Split the declaration and declare this binding with `const`"),
                };
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location_of_node(&binding.node),
                    message,
                )
                .with_suggestion(suggestion)
            })
            .collect()
    }
}

/// An initialized `let` binding that may be reported.
#[derive(Debug, Clone, Copy)]
struct LetDecl<'t> {
    /// The `let` keyword of the declaration.
    keyword: Node<'t>,
    /// Whether the declaration binds this name only.
    sole: bool,
}

#[derive(Debug)]
struct Binding<'t> {
    name: &'t str,
    node: Node<'t>,
    candidate: Option<LetDecl<'t>>,
    reassigned: bool,
}

#[derive(Debug)]
struct Scope<'t> {
    parent: Option<usize>,
    function: bool,
    names: HashMap<&'t str, usize>,
}

/// Collects bindings per scope and the writes made from each scope.
///
/// Writes are resolved once the whole tree has been visited, so a closure
/// that writes a binding declared further down still counts.
struct ScopeWalker<'t> {
    source: &'t str,
    scopes: Vec<Scope<'t>>,
    bindings: Vec<Binding<'t>>,
    writes: Vec<(&'t str, usize)>,
}

impl<'t> ScopeWalker<'t> {
    fn new(source: &'t str) -> Self {
        Self {
            source,
            scopes: Vec::new(),
            bindings: Vec::new(),
            writes: Vec::new(),
        }
    }

    fn text(&self, node: Node<'t>) -> &'t str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    fn push_scope(&mut self, parent: Option<usize>, function: bool) -> usize {
        self.scopes.push(Scope {
            parent,
            function,
            names: HashMap::new(),
        });
        self.scopes.len() - 1
    }

    /// Nearest function scope at or above `scope`, where `var` lands.
    fn function_scope(&self, mut scope: usize) -> usize {
        while !self.scopes[scope].function {
            match self.scopes[scope].parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        scope
    }

    /// Declares a name. The first declaration of a name in a scope wins.
    fn declare(&mut self, node: Node<'t>, scope: usize, candidate: Option<LetDecl<'t>>) {
        let name = self.text(node);
        if self.scopes[scope].names.contains_key(name) {
            return;
        }
        self.scopes[scope].names.insert(name, self.bindings.len());
        self.bindings.push(Binding {
            name,
            node,
            candidate,
            reassigned: false,
        });
    }

    fn write(&mut self, target: Node<'t>, scope: usize) {
        for node in binding_names(target) {
            let name = self.text(node);
            self.writes.push((name, scope));
        }
    }

    fn visit(&mut self, node: Node<'t>, scope: usize) {
        match node.kind() {
            kind if FUNCTION_KINDS.contains(&kind) => self.visit_function(node, scope),
            "statement_block" | "switch_body" | "for_statement" => {
                let inner = self.push_scope(Some(scope), false);
                self.visit_children(node, inner);
            }
            "for_in_statement" => self.visit_for_in(node, scope),
            "catch_clause" => {
                let inner = self.push_scope(Some(scope), false);
                if let Some(param) = node.child_by_field_name("parameter") {
                    for name in binding_names(param) {
                        self.declare(name, inner, None);
                    }
                }
                self.visit_children(node, inner);
            }
            "lexical_declaration" => self.visit_lexical(node, scope),
            "variable_declaration" => {
                let target = self.function_scope(scope);
                for name in declarator_names(node).into_iter().flat_map(|(_, names)| names) {
                    self.declare(name, target, None);
                }
                self.visit_children(node, scope);
            }
            "class_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, scope, None);
                }
                self.visit_children(node, scope);
            }
            "assignment_expression" | "augmented_assignment_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.write(left, scope);
                }
                self.visit_children(node, scope);
            }
            "update_expression" => {
                if let Some(argument) = node.child_by_field_name("argument") {
                    self.write(argument, scope);
                }
                self.visit_children(node, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    fn visit_children(&mut self, node: Node<'t>, scope: usize) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, scope);
        }
    }

    fn visit_function(&mut self, node: Node<'t>, scope: usize) {
        if matches!(
            node.kind(),
            "function_declaration" | "generator_function_declaration"
        ) {
            if let Some(name) = node.child_by_field_name("name") {
                self.declare(name, scope, None);
            }
        }

        let inner = self.push_scope(Some(scope), true);
        let params = node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"));
        if let Some(params) = params {
            for name in binding_names(params) {
                self.declare(name, inner, None);
            }
        }
        self.visit_children(node, inner);
    }

    fn visit_lexical(&mut self, node: Node<'t>, scope: usize) {
        let keyword = node
            .child_by_field_name("kind")
            .filter(|k| self.text(*k) == "let");
        let per_declarator = declarator_names(node);
        let sole = per_declarator.iter().map(|(_, names)| names.len()).sum::<usize>() == 1;

        for (initialized, names) in per_declarator {
            for name in names {
                let candidate = keyword
                    .filter(|_| initialized)
                    .map(|keyword| LetDecl { keyword, sole });
                self.declare(name, scope, candidate);
            }
        }
        self.visit_children(node, scope);
    }

    fn visit_for_in(&mut self, node: Node<'t>, scope: usize) {
        let inner = self.push_scope(Some(scope), false);

        if let Some(left) = node.child_by_field_name("left") {
            let kind = node.child_by_field_name("kind");
            match kind.map(|k| self.text(k)) {
                Some("var") => {
                    let target = self.function_scope(scope);
                    for name in binding_names(left) {
                        self.declare(name, target, None);
                    }
                }
                Some(keyword) => {
                    let names = binding_names(left);
                    let sole = names.len() == 1;
                    for name in names {
                        let candidate = kind
                            .filter(|_| keyword == "let")
                            .map(|kw| LetDecl { keyword: kw, sole });
                        self.declare(name, inner, candidate);
                    }
                }
                None => self.write(left, inner),
            }
        }

        self.visit_children(node, inner);
    }

    /// Resolves every write and returns the candidates nothing writes to,
    /// in source order.
    fn never_reassigned(mut self) -> Vec<Binding<'t>> {
        for (name, scope) in std::mem::take(&mut self.writes) {
            if let Some(index) = self.resolve(name, scope) {
                self.bindings[index].reassigned = true;
            }
        }

        let mut found: Vec<Binding<'t>> = self
            .bindings
            .into_iter()
            .filter(|b| b.candidate.is_some() && !b.reassigned)
            .collect();
        found.sort_by_key(|b| b.node.start_byte());
        found
    }

    fn resolve(&self, name: &str, scope: usize) -> Option<usize> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(&index) = self.scopes[id].names.get(name) {
                return Some(index);
            }
            current = self.scopes[id].parent;
        }
        None
    }
}

/// Names bound by each declarator of a declaration, with whether the
/// declarator has an initializer.
fn declarator_names(declaration: Node<'_>) -> Vec<(bool, Vec<Node<'_>>)> {
    let mut cursor = declaration.walk();
    declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .map(|declarator| {
            let names = declarator
                .child_by_field_name("name")
                .map(binding_names)
                .unwrap_or_default();
            (declarator.child_by_field_name("value").is_some(), names)
        })
        .collect()
}

/// Identifier nodes bound by a pattern, parameter list, or assignment target.
///
/// Member and subscript targets bind nothing.
fn binding_names(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    collect_names(node, &mut out);
    out
}

fn collect_names<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let field = match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            out.push(node);
            return;
        }
        "pair_pattern" => "value",
        "assignment_pattern" | "object_assignment_pattern" => "left",
        "required_parameter" | "optional_parameter" => "pattern",
        "object_pattern" | "array_pattern" | "rest_pattern" | "formal_parameters"
        | "parenthesized_expression" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_names(child, out);
            }
            return;
        }
        _ => return,
    };
    if let Some(child) = node.child_by_field_name(field) {
        collect_names(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("test.ts"), code, Path::new(""), Language::TypeScript);
        PreferConst::new().check(&ctx)
    }

    fn flagged(code: &str) -> Vec<(usize, String)> {
        check_code(code)
            .into_iter()
            .map(|v| {
                let name = v.message.split('\'').nth(1).unwrap_or_default().to_string();
                (v.location.line, name)
            })
            .collect()
    }

    #[test]
    fn never_reassigned_let_is_flagged() {
        let violations = check_code("let y = 2;\nif (y == 2) {}");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 1);
        assert_eq!(violations[0].location.column, 5);
        assert_eq!(
            violations[0].message,
            "'y' is never reassigned. Use 'const' instead"
        );
    }

    #[test]
    fn reassigned_let_is_fine() {
        assert!(check_code("let z = 3;\nz = 4;").is_empty());
    }

    #[test]
    fn compound_and_update_operators_count() {
        assert!(check_code("let a = 1; a += 2;").is_empty());
        assert!(check_code("let b = 1; b++;").is_empty());
        assert!(check_code("let c = 1; --c;").is_empty());
        assert!(check_code("let d = null; d ??= 4;").is_empty());
    }

    #[test]
    fn empty_input_and_const_are_fine() {
        assert!(check_code("").is_empty());
        assert!(check_code("const k = 1;\nvar v = 2;").is_empty());
    }

    #[test]
    fn uninitialized_let_is_not_flagged() {
        assert!(check_code("let x;\nx = compute();").is_empty());
        assert!(check_code("let y;").is_empty());
    }

    #[test]
    fn shadowing_write_does_not_count_for_outer_binding() {
        let code = "let x = 1;\n{\n  let x = 2;\n  x = 3;\n}\nconsole.log(x);";
        assert_eq!(flagged(code), vec![(1, "x".to_string())]);
    }

    #[test]
    fn parameter_shadows_outer_binding() {
        let code = "let n = 1;\nfunction f(n) {\n  n = 2;\n}";
        assert_eq!(flagged(code), vec![(1, "n".to_string())]);
    }

    #[test]
    fn arrow_and_catch_parameters_shadow() {
        let code = "let e = 1;\nlet g = 2;\ntry {} catch (e) { e = 0; }\nconst h = (g) => { g = 3; };";
        assert_eq!(
            flagged(code),
            vec![(1, "e".to_string()), (2, "g".to_string())]
        );
    }

    #[test]
    fn write_in_nested_closure_counts() {
        assert!(check_code("let count = 0;\nfunction inc() {\n  count += 1;\n}").is_empty());
    }

    #[test]
    fn write_before_declaration_in_closure_counts() {
        assert!(check_code("function reset() { state = 0; }\nlet state = 1;").is_empty());
    }

    #[test]
    fn condition_head_is_not_a_parameter_list() {
        assert!(check_code("let x = 1;\nif (x) {\n  x = 2;\n}").is_empty());
    }

    #[test]
    fn for_loop_counter_is_reassigned() {
        assert!(check_code("for (let i = 0; i < 3; i++) {}").is_empty());
    }

    #[test]
    fn for_of_binding_never_written_is_flagged() {
        assert_eq!(
            flagged("for (let item of items) {\n  use(item);\n}"),
            vec![(1, "item".to_string())]
        );
    }

    #[test]
    fn for_of_head_writes_outer_binding() {
        assert!(check_code("let cur = null;\nfor (cur of list) {}").is_empty());
    }

    #[test]
    fn destructuring_assignment_counts() {
        assert!(check_code("let a = 1, b = 2;\n[a, b] = [b, a];").is_empty());
        assert!(check_code("let p = 0;\n({ p } = obj);").is_empty());
    }

    #[test]
    fn member_writes_do_not_count() {
        let code = "let arr = [];\narr[0] = 1;\nlet o = {};\no.x = 2;";
        assert_eq!(
            flagged(code),
            vec![(1, "arr".to_string()), (3, "o".to_string())]
        );
    }

    #[test]
    fn destructuring_declaration_tracks_each_name() {
        let code = "let { a, b: renamed, c = 1 } = obj;\na = 2;";
        assert_eq!(
            flagged(code),
            vec![(1, "renamed".to_string()), (1, "c".to_string())]
        );
    }

    #[test]
    fn multiple_declarators_on_one_statement() {
        let code = "let a = 1, b = 2;\nb = 3;";
        let violations = check_code(code);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.starts_with("'a'"));
        let fix = violations[0].suggestion.as_ref().and_then(|s| s.replacement.as_ref());
        assert!(fix.is_none());
    }

    #[test]
    fn sole_declarator_gets_const_fix() {
        let violations = check_code("let greeting = \"Hello\";");
        let fix = violations[0]
            .suggestion
            .as_ref()
            .and_then(|s| s.replacement.as_ref())
            .unwrap();
        assert_eq!(fix.new_text, "const");
        assert_eq!((fix.location.column, fix.location.length), (1, 3));
    }

    #[test]
    fn type_annotations_are_skipped() {
        let code = "let m: Map<string, number> = new Map();\nlet t: number = 1;\nt = 2;";
        assert_eq!(flagged(code), vec![(1, "m".to_string())]);
    }

    #[test]
    fn statements_without_semicolons() {
        let code = "let a = 1\nlet b = 2\nb = 3\nfoo(a, b)";
        assert_eq!(flagged(code), vec![(1, "a".to_string())]);
    }

    #[test]
    fn default_parameter_value_is_not_a_write() {
        let code = "let limit = 10;\nfunction page(limit = 5) { return limit; }";
        assert_eq!(flagged(code), vec![(1, "limit".to_string())]);
    }

    #[test]
    fn property_named_let_is_not_a_declaration() {
        assert!(check_code("const o = { let: 1 };\nuse(o.let);").is_empty());
    }

    #[test]
    fn for_head_let_shadows_outer_binding() {
        let code = "let i = 0;\nfor (let i of xs) { use(i); }\ni = 5;";
        let violations = check_code(code);
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].location.line, violations[0].location.column), (2, 10));
        assert!(violations[0].message.starts_with("'i'"));
    }

    #[test]
    fn call_in_unbraced_branch_is_not_a_parameter_list() {
        let code = "let b = 1\nif (a) foo(b)\nelse { b = 2 }";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn write_inside_template_substitution_counts() {
        assert!(check_code("let n = 0;\nconst s = `${n++}`;").is_empty());
    }

    #[test]
    fn var_hoists_to_the_enclosing_function() {
        let code = "let x = 1;\nfunction f() {\n  if (c) { var x; }\n  x = 2;\n}";
        assert_eq!(flagged(code), vec![(1, "x".to_string())]);
    }

    #[test]
    fn var_in_for_head_hoists_out_of_the_loop() {
        let code = "let k = 1;\nfunction f() {\n  for (var k in o) {}\n  k = 2;\n}";
        assert_eq!(flagged(code), vec![(1, "k".to_string())]);
    }

    #[test]
    fn tsx_component_is_checked() {
        let code = "let label = 'x';\nconst el = <span>{label}</span>;";
        let ctx = FileContext::new(Path::new("view.tsx"), code, Path::new(""), Language::TypeScript);
        let violations = PreferConst::new().check(&ctx);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 1);
    }

    #[test]
    fn results_are_in_source_order() {
        let code = "let a = 1;\n{\n  let b = 2;\n}\nlet c = 3;";
        let lines: Vec<usize> = check_code(code).iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
    }
}
