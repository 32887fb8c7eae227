//! Context types for rule execution.

use crate::language::Language;
use crate::syntax::{self, Token};
use crate::types::Location;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// One physical line of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Line number (1-indexed).
    pub number: usize,
    /// Raw text of the line, without the line terminator.
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// Splits content into numbered lines.
    ///
    /// Handles both `\n` and `\r\n` terminators.
    #[must_use]
    pub fn split(content: &'a str) -> Vec<Self> {
        content
            .lines()
            .enumerate()
            .map(|(i, text)| Self { number: i + 1, text })
            .collect()
    }

    /// Length of the line in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Context provided to per-file rules.
///
/// Holds the source split into lines, the syntax tree for the file's
/// language, and the token stream flattened from that tree, so each rule
/// works from the same view.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Language the file is parsed as.
    pub language: Language,
    /// Path relative to the analyzed root, used in violation locations.
    pub relative_path: PathBuf,
    /// The source split into lines.
    pub lines: Vec<SourceLine<'a>>,
    /// Syntax tree, or `None` if the grammar could not be loaded.
    pub tree: Option<Tree>,
    /// Tokens of the whole file.
    pub tokens: Vec<Token<'a>>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context, parsing `content` as `language`.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, base: &Path, language: Language) -> Self {
        let relative_path = path
            .strip_prefix(base)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf);

        let tree = syntax::parse(language, path, content);
        let tokens = tree
            .as_ref()
            .map_or_else(Vec::new, |t| syntax::tokenize(language, t, content));

        Self {
            path,
            content,
            language,
            relative_path,
            lines: SourceLine::split(content),
            tree,
            tokens,
        }
    }

    /// Location of a token, with its byte span attached.
    #[must_use]
    pub fn location_of(&self, token: &Token<'_>) -> Location {
        Location::new(self.relative_path.clone(), token.line, token.column)
            .with_span(token.offset, token.text.len())
    }

    /// Location of a syntax node, with its byte span attached.
    #[must_use]
    pub fn location_of_node(&self, node: &Node<'_>) -> Location {
        Location::new(
            self.relative_path.clone(),
            node.start_position().row + 1,
            syntax::char_column(self.content, node.start_byte()),
        )
        .with_span(node.start_byte(), node.end_byte() - node.start_byte())
    }

    /// Source text of a syntax node.
    #[must_use]
    pub fn node_text(&self, node: &Node<'_>) -> &'a str {
        self.content
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Returns the text of a 1-indexed line, if it exists.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(|l| l.text)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number, in characters
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or the end of the content if
    /// out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        let Some(text) = self.line_text(line) else {
            return self.content.len();
        };
        // `text` borrows from `content`, so pointer distance is its start offset.
        let line_start = text.as_ptr() as usize - self.content.as_ptr() as usize;
        let within = text
            .char_indices()
            .nth(column.saturating_sub(1))
            .map_or(text.len(), |(i, _)| i);
        line_start + within
    }
}
