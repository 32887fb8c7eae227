//! Tree-sitter parsing and the token view derived from it.
//!
//! Each file is parsed once with the grammar for its language. Rules that
//! care about structure walk the [`Tree`]; rules that only match keywords
//! and operators use the flat [`Token`] list made from the tree's leaves.
//! String, template, and regex literals are single tokens, so operators
//! inside them (including `${...}` substitutions) are never seen, and
//! comments produce no tokens at all.

pub mod javascript;
pub mod python;

use crate::language::Language;
use std::path::Path;
use tracing::warn;
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric literal.
    Number,
    /// String or template literal, quotes and prefixes included.
    Str,
    /// Regular expression literal (JavaScript only).
    Regex,
    /// Operator or punctuation.
    Punct,
    /// End of a logical line (Python only).
    Newline,
}

/// A token with its position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token kind.
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub text: &'a str,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset from the start of the source.
    pub offset: usize,
}

impl Token<'_> {
    /// Returns true if this is punctuation with exactly this text.
    #[must_use]
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// Returns true if this is an identifier or keyword with exactly this text.
    #[must_use]
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }
}

/// Grammar for a file. `.tsx` files need the TSX dialect of TypeScript.
fn grammar(language: Language, path: &Path) -> tree_sitter::Language {
    match language {
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => {
            if path.extension().is_some_and(|ext| ext == "tsx") {
                tree_sitter_typescript::LANGUAGE_TSX.into()
            } else {
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
            }
        }
        Language::Python => tree_sitter_python::LANGUAGE.into(),
    }
}

/// Parses `source` with the grammar for `language`.
///
/// Syntax errors do not fail the parse; tree-sitter recovers and marks them
/// with `ERROR` and missing nodes. `None` means the grammar could not be
/// loaded at all.
#[must_use]
pub fn parse(language: Language, path: &Path, source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&grammar(language, path)) {
        warn!(file = %path.display(), error = %e, "Failed to load grammar");
        return None;
    }
    let tree = parser.parse(source, None);
    if tree.is_none() {
        warn!(file = %path.display(), "Parser returned no tree");
    }
    tree
}

/// Flattens the leaves of `tree` into tokens.
#[must_use]
pub fn tokenize<'a>(language: Language, tree: &Tree, source: &'a str) -> Vec<Token<'a>> {
    if language.is_ecmascript() {
        javascript::tokens(tree, source)
    } else {
        python::tokens(tree, source)
    }
}

#[cfg(test)]
pub(crate) fn tokenize_source<'a>(language: Language, path: &Path, source: &'a str) -> Vec<Token<'a>> {
    parse(language, path, source).map_or_else(Vec::new, |tree| tokenize(language, &tree, source))
}

/// What to do with a node during leaf flattening.
pub(crate) enum Leaf {
    /// Not a token; descend into children if there are any.
    Descend,
    /// Skip the node and everything under it.
    Skip,
    /// Emit the whole node as one token of this kind.
    Atom(TokenKind),
}

/// Visits the tokens of a tree in source order.
///
/// `classify` decides per node whether it is atomic, skipped, or walked
/// into. A childless node that is neither skipped nor atomic becomes an
/// identifier or punctuation token depending on its text. Missing and
/// zero-length nodes are dropped.
pub(crate) fn walk_leaves<'a>(
    tree: &Tree,
    source: &'a str,
    classify: impl Fn(&Node<'_>) -> Leaf,
    mut emit: impl FnMut(&Node<'_>, Option<Token<'a>>),
) {
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        let descend = match classify(&node) {
            Leaf::Skip => {
                emit(&node, None);
                false
            }
            Leaf::Atom(kind) => {
                emit(&node, make_token(&node, source, kind));
                false
            }
            Leaf::Descend if node.child_count() == 0 => {
                emit(&node, make_token(&node, source, leaf_kind(&node, source)));
                false
            }
            Leaf::Descend => true,
        };
        if descend && cursor.goto_first_child() {
            continue;
        }
        if !advance(&mut cursor) {
            break;
        }
    }
}

/// Moves to the next sibling, climbing as needed. False at the end of the tree.
fn advance(cursor: &mut TreeCursor<'_>) -> bool {
    loop {
        if cursor.goto_next_sibling() {
            return true;
        }
        if !cursor.goto_parent() {
            return false;
        }
    }
}

fn leaf_kind(node: &Node<'_>, source: &str) -> TokenKind {
    let starts_word = source
        .get(node.start_byte()..)
        .and_then(|s| s.chars().next())
        .is_some_and(is_word_start);
    if starts_word || node.kind().ends_with("identifier") {
        TokenKind::Ident
    } else {
        TokenKind::Punct
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn make_token<'a>(node: &Node<'_>, source: &'a str, kind: TokenKind) -> Option<Token<'a>> {
    if node.is_missing() || node.start_byte() == node.end_byte() {
        return None;
    }
    let text = source.get(node.start_byte()..node.end_byte())?;
    let position = node.start_position();
    Some(Token {
        kind,
        text,
        line: position.row + 1,
        column: char_column(source, node.start_byte()),
        offset: node.start_byte(),
    })
}

/// 1-indexed character column of a byte offset.
pub(crate) fn char_column(source: &str, offset: usize) -> usize {
    let before = source.get(..offset).unwrap_or(source);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    before[line_start..].chars().count() + 1
}
