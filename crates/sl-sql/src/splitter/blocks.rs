//! Compound-block tracking
//!
//! Semicolons inside `BEGIN ... END`, `IF ... END IF`, `LOOP ... END LOOP`,
//! `WHILE ... END WHILE`, `REPEAT ... END REPEAT` and `CASE ... END [CASE]`
//! do not terminate a statement. Each block kind keeps its own stack of
//! open positions; closing a block discards the semicolons recorded after
//! its opener.

use std::ops::Range;

/// Significant (non-trivia) token kinds seen by the splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CodeKind {
    Word { upper: String, quoted: bool },
    Semicolon,
    Delimiter,
    Directive,
    OpenParen,
    Other,
}

/// A significant token with its byte range in the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeToken {
    pub kind: CodeKind,
    pub range: Range<usize>,
    /// Scanned while a custom delimiter was active
    pub custom: bool,
}

impl CodeToken {
    /// Uppercased unquoted word, if this token is one
    pub fn keyword(&self) -> Option<&str> {
        match &self.kind {
            CodeKind::Word {
                upper,
                quoted: false,
            } => Some(upper.as_str()),
            _ => None,
        }
    }

    /// Whether this token ends a statement
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, CodeKind::Semicolon | CodeKind::Delimiter)
    }

    /// Whether this token is SQL rather than a client directive
    pub fn is_code(&self) -> bool {
        self.kind != CodeKind::Directive
    }

    /// Whether this token starts a region the block tracker must not see
    pub fn breaks_default_run(&self) -> bool {
        self.custom || self.kind == CodeKind::Directive
    }
}

#[derive(Debug, Clone, Copy)]
enum Block {
    BeginOrCase = 0,
    If = 1,
    Loop = 2,
    While = 3,
    Repeat = 4,
}

/// Indices of the semicolons in `tokens` that terminate top-level statements
pub(crate) fn top_level_semicolons(tokens: &[CodeToken]) -> Vec<usize> {
    let mut stacks: [Vec<usize>; 5] = Default::default();
    let mut semicolons = Vec::new();

    let keyword_at = |i: usize| tokens.get(i).and_then(CodeToken::keyword);

    for (i, token) in tokens.iter().enumerate() {
        if token.kind == CodeKind::Semicolon {
            semicolons.push(i);
            continue;
        }
        let Some(word) = token.keyword() else {
            continue;
        };
        let prev = i.checked_sub(1).and_then(keyword_at);
        let next = keyword_at(i + 1);
        // IF(...) and REPEAT(...) are function calls
        let call = tokens
            .get(i + 1)
            .is_some_and(|t| t.kind == CodeKind::OpenParen);

        let block = match word {
            "BEGIN" => {
                let begin_work = next == Some("WORK")
                    || tokens
                        .get(i + 1)
                        .map_or(true, |t| t.kind == CodeKind::Semicolon);
                if begin_work || prev == Some("XA") {
                    continue;
                }
                Block::BeginOrCase
            }
            "CASE" if prev != Some("END") => Block::BeginOrCase,
            "IF" => {
                let if_exists = next == Some("EXISTS")
                    || (next == Some("NOT") && keyword_at(i + 2) == Some("EXISTS"));
                if prev == Some("END") || if_exists || call {
                    continue;
                }
                Block::If
            }
            "LOOP" if prev != Some("END") => Block::Loop,
            "WHILE" if prev != Some("END") => Block::While,
            "REPEAT" if prev != Some("END") && prev != Some("UNTIL") && !call => Block::Repeat,
            "END" => {
                if prev == Some("XA") {
                    continue;
                }
                let closes = match next {
                    Some("IF") => Block::If,
                    Some("LOOP") => Block::Loop,
                    Some("WHILE") => Block::While,
                    Some("REPEAT") => Block::Repeat,
                    _ => Block::BeginOrCase,
                };
                match stacks[closes as usize].pop() {
                    Some(open) => semicolons.retain(|&s| s < open),
                    None => log::debug!("END at byte {} closes no open {:?}", token.range.start, closes),
                }
                continue;
            }
            _ => continue,
        };
        stacks[block as usize].push(i);
    }

    semicolons
}

#[cfg(test)]
#[path = "blocks_test.rs"]
mod tests;
