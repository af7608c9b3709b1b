//! Lexeme helpers shared by the DDL readers

use sl_sql::lexeme::{lexemes, matching_paren, Lexeme, LexemeKind};

/// Source text spanned by `lx`, empty for an empty slice
pub(crate) fn slice_text<'s>(sql: &'s str, lx: &[Lexeme<'_>]) -> &'s str {
    match (lx.first(), lx.last()) {
        (Some(first), Some(last)) => &sql[first.range.start..last.range.end],
        _ => "",
    }
}

/// Lexemes of a statement without its trailing terminators
pub(crate) fn trimmed(lx: &[Lexeme<'_>]) -> usize {
    let mut end = lx.len();
    while end > 0 && lx[end - 1].kind == LexemeKind::Terminator {
        end -= 1;
    }
    end
}

/// Whitespace- and comment-insensitive form of a definition, used for
/// equality checks
pub(crate) fn canonical(text: &str) -> String {
    let lx = lexemes(text);
    let end = trimmed(&lx);
    lx[..end]
        .iter()
        .map(|l| l.text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on `sep` at parenthesis depth zero
pub(crate) fn split_top_level<'l, 'a>(lx: &'l [Lexeme<'a>], sep: char) -> Vec<&'l [Lexeme<'a>]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, l) in lx.iter().enumerate() {
        if l.is_punct('(') {
            depth += 1;
        } else if l.is_punct(')') {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && l.is_punct(sep) {
            parts.push(&lx[start..i]);
            start = i + 1;
        }
    }
    if start < lx.len() {
        parts.push(&lx[start..]);
    }
    parts
}

/// Index just past the token or parenthesized group starting at `at`
pub(crate) fn skip_group(lx: &[Lexeme<'_>], at: usize) -> usize {
    if lx[at].is_punct('(') {
        matching_paren(lx, at).map_or(lx.len(), |close| close + 1)
    } else {
        at + 1
    }
}

/// Key columns of a parenthesized list at `open`.
///
/// Plain key parts yield their column name; expression parts keep their
/// text. Returns the keys and the index of the closing parenthesis.
pub(crate) fn key_list(
    sql: &str,
    lx: &[Lexeme<'_>],
    open: usize,
) -> Option<(Vec<String>, usize)> {
    let close = matching_paren(lx, open)?;
    let keys = split_top_level(&lx[open + 1..close], ',')
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(|part| match part[0].kind {
            LexemeKind::Word | LexemeKind::QuotedIdent => {
                part[0].ident().unwrap_or_default()
            }
            _ => slice_text(sql, part).to_string(),
        })
        .collect();
    Some((keys, close))
}

/// Position of the first `(` at or after `from`
pub(crate) fn find_open_paren(lx: &[Lexeme<'_>], from: usize) -> Option<usize> {
    (from..lx.len()).find(|&i| lx[i].is_punct('('))
}

/// String literal contents without quotes or escaped quote doubling
pub(crate) fn unquote_literal(raw: &str) -> String {
    let Some(quote) = raw.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        return raw.to_string();
    };
    if raw.len() < 2 || !raw.ends_with(quote) {
        return raw.to_string();
    }
    let doubled: String = [quote, quote].iter().collect();
    raw[1..raw.len() - 1].replace(&doubled, &quote.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_ignores_layout() {
        assert_eq!(
            canonical("a  INT\n  NOT NULL /* c */ ;"),
            canonical("a INT NOT NULL")
        );
        assert_ne!(canonical("a INT"), canonical("a BIGINT"));
    }

    #[test]
    fn test_split_top_level() {
        let lx = lexemes("a INT, b DECIMAL(10, 2), KEY (a, b)");
        let parts = split_top_level(&lx, ',');
        assert_eq!(parts.len(), 3);
        let sql = "a INT, b DECIMAL(10, 2), KEY (a, b)";
        assert_eq!(slice_text(sql, parts[1]), "b DECIMAL(10, 2)");
    }

    #[test]
    fn test_key_list() {
        let sql = "(`a`, b(10) DESC, (lower(c)))";
        let lx = lexemes(sql);
        let (keys, close) = key_list(sql, &lx, 0).unwrap();
        assert_eq!(keys, vec!["a", "b", "(lower(c))"]);
        assert_eq!(close, lx.len() - 1);
    }

    #[test]
    fn test_unquote_literal() {
        assert_eq!(unquote_literal("'it''s'"), "it's");
        assert_eq!(unquote_literal("plain"), "plain");
    }
}
