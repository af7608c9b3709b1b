//! Significant tokens of a single statement
//!
//! DDL forms that sqlparser cannot parse for MySQL (view headers with
//! `ALGORITHM`/`DEFINER`, routines, triggers, events, table option tails)
//! are read from this flat token list instead.

use std::ops::Range;

use sl_core::normalize_identifier;

use crate::splitter::scan::{scan, RawKind};

/// Kind of a significant token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    /// Keyword or unquoted identifier
    Word,
    /// Backtick-quoted identifier
    QuotedIdent,
    /// String literal
    Literal,
    /// `;` or an active custom delimiter
    Terminator,
    /// Any other single character
    Punct,
}

/// A token that is neither whitespace nor a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: LexemeKind,
    pub text: &'a str,
    /// Byte range in the scanned text
    pub range: Range<usize>,
}

impl Lexeme<'_> {
    /// Case-insensitive keyword test
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == LexemeKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == LexemeKind::Punct && self.text.starts_with(c)
    }

    /// Identifier value with quoting removed
    pub fn ident(&self) -> Option<String> {
        match self.kind {
            LexemeKind::Word | LexemeKind::QuotedIdent => Some(normalize_identifier(self.text)),
            _ => None,
        }
    }
}

/// Significant tokens of `text`, in order
pub fn lexemes(text: &str) -> Vec<Lexeme<'_>> {
    scan(text)
        .into_iter()
        .filter_map(|t| {
            let kind = match t.kind {
                RawKind::Whitespace | RawKind::Comment | RawKind::Directive(_) => return None,
                RawKind::Word => LexemeKind::Word,
                RawKind::QuotedIdent => LexemeKind::QuotedIdent,
                RawKind::Literal => LexemeKind::Literal,
                RawKind::Semicolon | RawKind::Delimiter => LexemeKind::Terminator,
                RawKind::Punct => LexemeKind::Punct,
            };
            Some(Lexeme {
                kind,
                text: &text[t.range.clone()],
                range: t.range,
            })
        })
        .collect()
}

/// Read a dotted name (`a`, `a.b`) starting at `at`.
///
/// Returns the normalized parts and the index just past the name.
pub fn dotted_name(lexemes: &[Lexeme<'_>], at: usize) -> Option<(Vec<String>, usize)> {
    let mut parts = vec![lexemes.get(at)?.ident()?];
    let mut i = at + 1;
    while lexemes.get(i).is_some_and(|l| l.is_punct('.')) {
        let part = lexemes.get(i + 1).and_then(|l| l.ident())?;
        parts.push(part);
        i += 2;
    }
    Some((parts, i))
}

/// Index of the `)` matching the `(` at `open`
pub fn matching_paren(lexemes: &[Lexeme<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, l) in lexemes.iter().enumerate().skip(open) {
        if l.is_punct('(') {
            depth += 1;
        } else if l.is_punct(')') {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
