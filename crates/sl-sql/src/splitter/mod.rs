//! Statement splitting
//!
//! [`split`] cuts a MySQL script into statements. Client-side `DELIMITER`
//! directives switch the terminator; while the default `;` is active,
//! sqlparser's tokenizer feeds the compound-block tracker so semicolons
//! inside procedure and trigger bodies stay inside their statement.

mod blocks;
pub(crate) mod scan;

use std::ops::Range;

use serde::Serialize;
use sqlparser::tokenizer::{Location, Token, Whitespace};

use crate::dialect::{MySqlDialect, SqlDialect};
use crate::position::{LineIndex, Position};
use blocks::{top_level_semicolons, CodeKind, CodeToken};
use scan::{RawKind, RawToken};

/// One statement of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// Statement text. A `DELIMITER` directive inside the range is rewritten
    /// to a comment and a custom terminator is replaced by `;`.
    pub text: String,
    /// Byte range in the original script
    pub range: Range<usize>,
    /// Position of the first significant token
    pub start: Position,
    /// Position of the last character of the statement (inclusive)
    pub end: Position,
    /// True when the statement holds no SQL beyond comments and terminators
    pub is_empty: bool,
}

/// Split a script into statements.
///
/// Byte ranges of the returned statements are contiguous and cover the whole
/// input. Leading comments and whitespace belong to the statement that
/// follows them; trailing ones belong to the last statement. Whitespace-only
/// input yields no statements.
pub fn split(text: &str) -> Vec<Statement> {
    let raw = scan::scan(text);
    if raw.iter().all(|t| t.kind == RawKind::Whitespace) {
        return Vec::new();
    }

    let code = code_tokens(text, &raw);
    let index = LineIndex::new(text);

    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut prev = 0;
    for cut in cut_points(&code) {
        ranges.push(prev..cut);
        prev = cut;
    }
    if prev < text.len() {
        let tail_has_code = code
            .iter()
            .any(|t| t.range.start >= prev && t.is_code());
        match ranges.last_mut() {
            Some(last) if !tail_has_code => last.end = text.len(),
            _ => ranges.push(prev..text.len()),
        }
    }

    ranges
        .into_iter()
        .map(|range| build_statement(text, &index, &raw, &code, range))
        .collect()
}

/// Significant tokens of the whole script, in order.
///
/// Directives and custom-delimiter regions come from the raw scanner.
/// Default regions go through sqlparser's tokenizer, falling back to the
/// raw tokens when the tokenizer rejects the region.
fn code_tokens(text: &str, raw: &[RawToken]) -> Vec<CodeToken> {
    let is_default = |t: &RawToken| !t.custom && !matches!(t.kind, RawKind::Directive(_));

    let mut out = Vec::new();
    let mut i = 0;
    while i < raw.len() {
        if !is_default(&raw[i]) {
            out.extend(code_from_raw(text, &raw[i..=i]));
            i += 1;
            continue;
        }
        let j = raw[i..]
            .iter()
            .position(|t| !is_default(t))
            .map_or(raw.len(), |n| i + n);
        let region = raw[i].range.start..raw[j - 1].range.end;
        match tokenize_region(text, region) {
            Some(tokens) => out.extend(tokens),
            None => out.extend(code_from_raw(text, &raw[i..j])),
        }
        i = j;
    }
    out
}

fn tokenize_region(text: &str, region: Range<usize>) -> Option<Vec<CodeToken>> {
    let sql = &text[region.clone()];
    let tokens = match MySqlDialect::new().tokenize(sql) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::debug!(
                "Tokenizer rejected bytes {}..{} ({}), using raw scanner",
                region.start,
                region.end,
                e
            );
            return None;
        }
    };
    if tokens.iter().any(|t| is_bare_dash_comment(&t.token)) {
        log::debug!(
            "`--` without trailing space in bytes {}..{}, using raw scanner",
            region.start,
            region.end
        );
        return None;
    }

    let index = LineIndex::new(sql);
    let offset =
        |loc: Location| region.start + index.offset(loc.line as usize, loc.column as usize);
    Some(
        tokens
            .into_iter()
            .filter_map(|t| {
                let kind = match t.token {
                    Token::Whitespace(_) | Token::EOF => return None,
                    Token::SemiColon => CodeKind::Semicolon,
                    Token::LParen => CodeKind::OpenParen,
                    Token::Word(w) => CodeKind::Word {
                        upper: w.value.to_uppercase(),
                        quoted: w.quote_style.is_some(),
                    },
                    _ => CodeKind::Other,
                };
                Some(CodeToken {
                    kind,
                    range: offset(t.span.start)..offset(t.span.end),
                    custom: false,
                })
            })
            .collect(),
    )
}

/// MySQL only starts a `--` comment when whitespace follows the dashes
fn is_bare_dash_comment(token: &Token) -> bool {
    match token {
        Token::Whitespace(Whitespace::SingleLineComment { comment, prefix }) => {
            prefix == "--" && comment.chars().next().is_some_and(|c| !c.is_whitespace())
        }
        _ => false,
    }
}

fn code_from_raw(text: &str, raw: &[RawToken]) -> Vec<CodeToken> {
    raw.iter()
        .filter_map(|t| {
            let kind = match &t.kind {
                RawKind::Whitespace | RawKind::Comment => return None,
                RawKind::Directive(_) => CodeKind::Directive,
                RawKind::Word => CodeKind::Word {
                    upper: text[t.range.clone()].to_uppercase(),
                    quoted: false,
                },
                RawKind::QuotedIdent => CodeKind::Word {
                    upper: text[t.range.clone()].trim_matches('`').to_uppercase(),
                    quoted: true,
                },
                RawKind::Semicolon => CodeKind::Semicolon,
                RawKind::Delimiter => CodeKind::Delimiter,
                RawKind::Punct if &text[t.range.clone()] == "(" => CodeKind::OpenParen,
                RawKind::Literal | RawKind::Punct => CodeKind::Other,
            };
            Some(CodeToken {
                kind,
                range: t.range.clone(),
                custom: t.custom,
            })
        })
        .collect()
}

/// Byte offsets where statements end, in ascending order.
fn cut_points(code: &[CodeToken]) -> Vec<usize> {
    let mut cuts = Vec::new();
    let mut i = 0;
    while i < code.len() {
        if code[i].breaks_default_run() {
            if code[i].kind == CodeKind::Delimiter {
                cuts.push(code[i].range.end);
            }
            i += 1;
            continue;
        }

        let j = code[i..]
            .iter()
            .position(CodeToken::breaks_default_run)
            .map_or(code.len(), |n| i + n);
        let run = &code[i..j];
        let semicolons = top_level_semicolons(run);
        cuts.extend(semicolons.iter().map(|&k| run[k].range.end));

        // unterminated code right before a directive still ends there
        if j < code.len() {
            let tail = semicolons.last().map_or(0, |&k| k + 1);
            if let Some(last) = run[tail..].last() {
                cuts.push(last.range.end);
            }
        }
        i = j;
    }
    cuts
}

fn build_statement(
    text: &str,
    index: &LineIndex<'_>,
    raw: &[RawToken],
    code: &[CodeToken],
    range: Range<usize>,
) -> Statement {
    let inside: Vec<&CodeToken> = code
        .iter()
        .filter(|t| t.is_code() && t.range.start >= range.start && t.range.start < range.end)
        .collect();
    let start = inside.first().map_or(range.start, |t| t.range.start);
    let end = inside.last().map_or(range.end, |t| t.range.end);

    Statement {
        text: rewrite(text, raw, &range),
        start: index.position(start),
        end: index.last_char_position(end),
        is_empty: inside.iter().all(|t| t.is_terminator()),
        range,
    }
}

/// Slice `range` out of `text`, neutralizing directives and custom terminators.
fn rewrite(text: &str, raw: &[RawToken], range: &Range<usize>) -> String {
    let mut out = String::with_capacity(range.len());
    let mut pos = range.start;
    for token in raw
        .iter()
        .filter(|t| t.range.start >= range.start && t.range.end <= range.end)
    {
        let replacement = match &token.kind {
            RawKind::Directive(delimiter) => format!("/* DELIMITER {} */", delimiter),
            RawKind::Delimiter => ";".to_string(),
            _ => continue,
        };
        out.push_str(&text[pos..token.range.start]);
        out.push_str(&replacement);
        pos = token.range.end;
    }
    out.push_str(&text[pos..range.end]);
    out
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
