//! Indentation-sensitive reader for configuration text.
//!
//! Every non-blank line becomes a [`TokenGroup`]; lines indented one level
//! deeper become its children.

use std::iter::Peekable;

use crate::error::ReadError;

/// A tokenized line and its indented child lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenGroup {
    pub tokens: Vec<String>,
    pub children: Vec<TokenGroup>,
}

impl TokenGroup {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TokenGroup>) -> Self {
        self.children = children;
        self
    }

    /// Borrowed tokens, as the matcher takes them
    pub fn token_refs(&self) -> Vec<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }
}

struct Line {
    level: usize,
    tokens: Vec<String>,
}

/// Read configuration text into token groups.
///
/// The first indented line below a top-level line fixes the indentation
/// unit for that block; deeper lines must use whole multiples of it.
pub fn read(text: &str) -> Result<Vec<TokenGroup>, ReadError> {
    let mut lines = Vec::new();
    let mut unit: Option<&str> = None;
    let mut previous = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let content = raw.trim_start_matches([' ', '\t']);
        let indentation = &raw[..raw.len() - content.len()];
        let level = indentation_level(indentation, &mut unit, line)?;

        // the first line has no parent to be indented under
        if level > previous.map_or(0, |previous: usize| previous + 1) {
            return Err(ReadError::IndentationJump { line });
        }

        lines.push(Line {
            level,
            tokens: content.split_whitespace().map(str::to_string).collect(),
        });
        previous = Some(level);
    }

    Ok(group(&mut lines.into_iter().peekable(), 0))
}

fn indentation_level<'a>(
    indentation: &'a str,
    unit: &mut Option<&'a str>,
    line: usize,
) -> Result<usize, ReadError> {
    let Some(first) = indentation.chars().next() else {
        *unit = None;
        return Ok(0);
    };

    let expected = unit.and_then(|unit| unit.chars().next()).unwrap_or(first);
    if indentation.chars().any(|c| c != expected) {
        return Err(ReadError::MixedIndentation { line });
    }

    let Some(unit) = *unit else {
        *unit = Some(indentation);
        return Ok(1);
    };

    if indentation.len() % unit.len() != 0 {
        return Err(ReadError::UnevenIndentation { line });
    }
    Ok(indentation.len() / unit.len())
}

fn group<I: Iterator<Item = Line>>(lines: &mut Peekable<I>, level: usize) -> Vec<TokenGroup> {
    let mut groups = Vec::new();
    while let Some(line) = lines.next_if(|line| line.level == level) {
        let children = group(lines, level + 1);
        groups.push(TokenGroup::new(line.tokens).with_children(children));
    }
    groups
}
