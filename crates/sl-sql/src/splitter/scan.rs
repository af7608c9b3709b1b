//! Raw, delimiter-aware scanner
//!
//! A small quote- and comment-aware lexer that runs over the whole script
//! before sqlparser sees it. It is the only pass that understands the
//! client-side `DELIMITER` directive, and it doubles as the token source
//! when sqlparser's tokenizer rejects a region.

use std::ops::Range;

/// Kind of a raw token
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawKind {
    Whitespace,
    Comment,
    Word,
    QuotedIdent,
    Literal,
    Semicolon,
    Punct,
    /// The active custom delimiter
    Delimiter,
    /// `DELIMITER <tok>`, carrying the new delimiter
    Directive(String),
}

/// A raw token and the delimiter mode it was scanned in
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub kind: RawKind,
    pub range: Range<usize>,
    /// True when a custom delimiter was active
    pub custom: bool,
}

impl RawToken {
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, RawKind::Whitespace | RawKind::Comment)
    }
}

const DEFAULT_DELIMITER: &str = ";";

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    delimiter: String,
    at_statement_start: bool,
}

/// Scan `text` into raw tokens covering every byte
pub(crate) fn scan(text: &str) -> Vec<RawToken> {
    let mut scanner = Scanner {
        text,
        pos: 0,
        delimiter: DEFAULT_DELIMITER.to_string(),
        at_statement_start: true,
    };
    let mut tokens = Vec::new();
    while scanner.pos < text.len() {
        tokens.push(scanner.next_token());
    }
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

impl Scanner<'_> {
    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn custom(&self) -> bool {
        self.delimiter != DEFAULT_DELIMITER
    }

    fn next_token(&mut self) -> RawToken {
        let start = self.pos;
        let custom = self.custom();
        let kind = self.next_kind();
        match kind {
            RawKind::Whitespace | RawKind::Comment => {}
            RawKind::Semicolon | RawKind::Delimiter | RawKind::Directive(_) => {
                self.at_statement_start = true
            }
            _ => self.at_statement_start = false,
        }
        RawToken {
            kind,
            range: start..self.pos,
            custom,
        }
    }

    fn next_kind(&mut self) -> RawKind {
        let rest = self.rest();
        if self.custom() && rest.starts_with(self.delimiter.as_str()) {
            self.pos += self.delimiter.len();
            return RawKind::Delimiter;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            return RawKind::Whitespace;
        };
        let next = chars.next();

        match c {
            c if c.is_whitespace() => {
                self.advance_while(|c| c.is_whitespace());
                RawKind::Whitespace
            }
            '#' => {
                self.advance_line_comment();
                RawKind::Comment
            }
            '-' if next == Some('-')
                && rest[2..].chars().next().map_or(true, char::is_whitespace) =>
            {
                self.advance_line_comment();
                RawKind::Comment
            }
            '/' if next == Some('*') => {
                match rest[2..].find("*/") {
                    Some(i) => self.pos += i + 4,
                    None => self.pos = self.text.len(),
                }
                RawKind::Comment
            }
            '\'' | '"' => {
                self.advance_quoted(c, true);
                RawKind::Literal
            }
            '`' => {
                self.advance_quoted(c, false);
                RawKind::QuotedIdent
            }
            ';' if !self.custom() => {
                self.pos += 1;
                RawKind::Semicolon
            }
            c if is_word_char(c) => {
                let word_start = self.pos;
                self.advance_word();
                let word = &self.text[word_start..self.pos];
                if self.at_statement_start && word.eq_ignore_ascii_case("DELIMITER") {
                    if let Some(delimiter) = self.try_directive() {
                        return RawKind::Directive(delimiter);
                    }
                }
                RawKind::Word
            }
            c => {
                self.pos += c.len_utf8();
                RawKind::Punct
            }
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        let len = self
            .rest()
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        self.pos += len;
    }

    /// Word characters up to, not including, an active custom delimiter.
    fn advance_word(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if !is_word_char(c) || (self.custom() && self.rest().starts_with(self.delimiter.as_str()))
            {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn advance_line_comment(&mut self) {
        self.advance_while(|c| c != '\n');
    }

    /// Consume a quoted run; an unterminated quote runs to the end of text.
    fn advance_quoted(&mut self, quote: char, backslash_escapes: bool) {
        let body_start = self.pos + quote.len_utf8();
        let mut iter = self.text[body_start..].char_indices().peekable();
        while let Some((i, c)) = iter.next() {
            if backslash_escapes && c == '\\' {
                iter.next();
            } else if c == quote {
                if matches!(iter.peek(), Some((_, n)) if *n == quote) {
                    iter.next();
                } else {
                    self.pos = body_start + i + c.len_utf8();
                    return;
                }
            }
        }
        self.pos = self.text.len();
    }

    /// After a `DELIMITER` word: spaces, then a non-whitespace run.
    fn try_directive(&mut self) -> Option<String> {
        let rest = self.rest();
        let spaces = rest
            .char_indices()
            .find(|(_, c)| *c != ' ' && *c != '\t')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if spaces == 0 {
            return None;
        }
        let value_len = rest[spaces..]
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, _)| i)
            .unwrap_or(rest.len() - spaces);
        if value_len == 0 {
            return None;
        }
        let delimiter = rest[spaces..spaces + value_len].to_string();
        self.pos += spaces + value_len;
        if delimiter == self.delimiter {
            log::debug!("Ignoring redundant DELIMITER {}", delimiter);
        } else {
            self.delimiter = delimiter.clone();
        }
        Some(delimiter)
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
