//! Token view of Python trees, with logical-line grouping.

use super::{char_column, walk_leaves, Leaf, Token, TokenKind};
use tree_sitter::{Node, Tree};

fn classify(node: &Node<'_>) -> Leaf {
    if !node.is_named() {
        return Leaf::Descend;
    }
    match node.kind() {
        "comment" | "line_continuation" => Leaf::Skip,
        "string" => Leaf::Atom(TokenKind::Str),
        "integer" | "float" => Leaf::Atom(TokenKind::Number),
        _ => Leaf::Descend,
    }
}

/// Tokens of a Python tree.
///
/// Comments are dropped. A [`TokenKind::Newline`] token ends every logical
/// line; line breaks inside brackets or after a `\` continuation do not.
#[must_use]
pub fn tokens<'a>(tree: &Tree, source: &'a str) -> Vec<Token<'a>> {
    let mut out: Vec<Token<'a>> = Vec::new();
    let mut depth = 0usize;
    let mut continued = false;

    walk_leaves(tree, source, classify, |node, token| {
        if node.kind() == "line_continuation" {
            continued = true;
        }
        let Some(token) = token else {
            return;
        };
        if let Some(prev) = out.last().copied() {
            let prev_end_line = prev.line + prev.text.matches('\n').count();
            if token.line > prev_end_line && depth == 0 && !continued {
                out.push(newline_after(&prev, source));
            }
        }
        continued = false;
        if token.kind == TokenKind::Punct {
            match token.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        out.push(token);
    });

    if let Some(prev) = out.last().copied() {
        out.push(newline_after(&prev, source));
    }
    out
}

/// The line break ending the line `prev` finishes on, or an empty token at
/// the end of the file when there is none.
fn newline_after<'a>(prev: &Token<'a>, source: &'a str) -> Token<'a> {
    let end = prev.offset + prev.text.len();
    let offset = source
        .get(end..)
        .and_then(|rest| rest.find('\n'))
        .map_or(source.len(), |i| end + i);
    let text = source.get(offset..).map_or("", |rest| {
        if rest.starts_with('\n') {
            &rest[..1]
        } else {
            ""
        }
    });
    Token {
        kind: TokenKind::Newline,
        text,
        line: prev.line + prev.text.matches('\n').count(),
        column: char_column(source, offset),
        offset,
    }
}

/// Returns true if a string token is an f-string.
#[must_use]
pub fn is_fstring(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Str
        && token
            .text
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .any(|c| c.eq_ignore_ascii_case(&'f'))
}

/// Identifiers referenced inside the `{...}` substitutions of an f-string.
///
/// Attribute names after `.` and format specs after `:` are not names.
#[must_use]
pub fn fstring_names<'a>(token: &Token<'a>) -> Vec<&'a str> {
    let text = token.text;
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut in_spec = false;
    let mut in_attr = false;
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let name_char = c.is_alphanumeric() || c == '_';
        if let Some(s) = start {
            if name_char {
                continue;
            }
            names.push(&text[s..i]);
            start = None;
        }
        match c {
            '{' => {
                depth += 1;
                in_spec = false;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                in_spec = false;
            }
            ':' if depth == 1 => in_spec = true,
            '.' => in_attr = true,
            _ if name_char => {
                if !in_attr && depth > 0 && !in_spec && !c.is_ascii_digit() {
                    start = Some(i);
                }
                continue;
            }
            _ => {}
        }
        if c != '.' {
            in_attr = false;
        }
    }

    names
}

/// A logical line: the tokens of one statement and its indentation.
#[derive(Debug, Clone)]
pub struct LogicalLine<'t, 'a> {
    /// Tokens of the statement, without the trailing newline.
    pub tokens: &'t [Token<'a>],
    /// Indentation width (column of the first token minus one).
    pub indent: usize,
}

impl LogicalLine<'_, '_> {
    /// Returns true if the statement starts with the given keyword.
    #[must_use]
    pub fn starts_with(&self, keyword: &str) -> bool {
        self.tokens.first().is_some_and(|t| t.is_ident(keyword))
    }

    /// Line number of the statement's first token.
    #[must_use]
    pub fn line(&self) -> usize {
        self.tokens.first().map_or(0, |t| t.line)
    }
}

/// Splits a Python token stream into logical lines.
#[must_use]
pub fn logical_lines<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<LogicalLine<'t, 'a>> {
    tokens
        .split(|t| t.kind == TokenKind::Newline)
        .filter(|line| !line.is_empty())
        .map(|line| LogicalLine {
            tokens: line,
            indent: line[0].column - 1,
        })
        .collect()
}
