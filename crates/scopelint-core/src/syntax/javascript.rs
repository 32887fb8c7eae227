//! Token view of JavaScript and TypeScript trees.

use super::{walk_leaves, Leaf, Token, TokenKind};
use tree_sitter::{Node, Tree};

fn classify(node: &Node<'_>) -> Leaf {
    if !node.is_named() {
        return Leaf::Descend;
    }
    match node.kind() {
        "comment" | "html_comment" | "hash_bang_line" => Leaf::Skip,
        "string" | "template_string" | "jsx_text" | "string_fragment" | "escape_sequence" => {
            Leaf::Atom(TokenKind::Str)
        }
        "regex" => Leaf::Atom(TokenKind::Regex),
        "number" => Leaf::Atom(TokenKind::Number),
        _ => Leaf::Descend,
    }
}

/// Tokens of a JavaScript or TypeScript tree.
///
/// Comments are dropped. String and template literals (including their
/// `${...}` substitutions) become a single [`TokenKind::Str`] token.
#[must_use]
pub fn tokens<'a>(tree: &Tree, source: &'a str) -> Vec<Token<'a>> {
    let mut out = Vec::new();
    walk_leaves(tree, source, classify, |_, token| out.extend(token));
    out
}
