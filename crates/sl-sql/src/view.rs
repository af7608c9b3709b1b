//! `CREATE VIEW` header parsing
//!
//! sqlparser rejects MySQL's `ALGORITHM=`, `DEFINER=` and `SQL SECURITY`
//! view clauses, so the header is read from lexemes and only the `SELECT`
//! body is handed to the parser.

use crate::lexeme::{dotted_name, lexemes, matching_paren, Lexeme, LexemeKind};

/// A parsed `CREATE VIEW` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDefinition {
    pub or_replace: bool,
    pub algorithm: Option<String>,
    /// Definer text as written, e.g. `` `root`@`%` ``
    pub definer: Option<String>,
    pub security: Option<String>,
    /// Database qualifier, if any
    pub database: Option<String>,
    pub name: String,
    /// Explicit column list
    pub columns: Vec<String>,
    /// Query text after `AS`, without check option or terminator
    pub body: String,
    /// `CHECK OPTION`, `CASCADED CHECK OPTION` or `LOCAL CHECK OPTION`
    pub check_option: Option<String>,
}

impl ViewDefinition {
    /// Parse `sql` if it is a `CREATE VIEW` statement
    pub fn parse(sql: &str) -> Option<Self> {
        let lx = lexemes(sql);
        let mut i = 0;
        if !lx.first()?.is_keyword("CREATE") {
            return None;
        }
        i += 1;

        let mut view = ViewDefinition {
            or_replace: false,
            algorithm: None,
            definer: None,
            security: None,
            database: None,
            name: String::new(),
            columns: Vec::new(),
            body: String::new(),
            check_option: None,
        };

        if lx.get(i)?.is_keyword("OR") && lx.get(i + 1)?.is_keyword("REPLACE") {
            view.or_replace = true;
            i += 2;
        }
        if lx.get(i)?.is_keyword("ALGORITHM") && lx.get(i + 1)?.is_punct('=') {
            view.algorithm = Some(lx.get(i + 2)?.text.to_uppercase());
            i += 3;
        }
        if lx.get(i)?.is_keyword("DEFINER") && lx.get(i + 1)?.is_punct('=') {
            let start = i + 2;
            let end = (start..lx.len())
                .find(|&j| lx[j].is_keyword("SQL") || lx[j].is_keyword("VIEW"))?;
            if end == start {
                return None;
            }
            view.definer = Some(sql[lx[start].range.start..lx[end - 1].range.end].to_string());
            i = end;
        }
        if lx.get(i)?.is_keyword("SQL") && lx.get(i + 1)?.is_keyword("SECURITY") {
            view.security = Some(lx.get(i + 2)?.text.to_uppercase());
            i += 3;
        }
        if !lx.get(i)?.is_keyword("VIEW") {
            return None;
        }
        i += 1;
        if lx.get(i)?.is_keyword("IF") {
            // IF NOT EXISTS
            i += 3;
        }

        let (mut parts, next) = dotted_name(&lx, i)?;
        i = next;
        view.name = parts.pop()?;
        view.database = parts.pop();

        if lx.get(i)?.is_punct('(') {
            let close = matching_paren(&lx, i)?;
            view.columns = lx[i + 1..close].iter().filter_map(Lexeme::ident).collect();
            i = close + 1;
        }
        if !lx.get(i)?.is_keyword("AS") {
            return None;
        }
        let body_start = lx[i].range.end;

        let mut end = lx.len();
        while end > i + 1 && lx[end - 1].kind == LexemeKind::Terminator {
            end -= 1;
        }
        let mut body_end = lx.get(end - 1)?.range.end;
        if let Some((option, with_at)) = trailing_check_option(&lx[..end]) {
            view.check_option = Some(option);
            body_end = lx[with_at].range.start;
        }
        view.body = sql[body_start..body_end].trim().to_string();
        if view.body.is_empty() {
            return None;
        }
        Some(view)
    }
}

fn trailing_check_option(lx: &[Lexeme<'_>]) -> Option<(String, usize)> {
    let n = lx.len();
    if n < 3 || !lx[n - 1].is_keyword("OPTION") || !lx[n - 2].is_keyword("CHECK") {
        return None;
    }
    if lx[n - 3].is_keyword("WITH") {
        return Some(("CHECK OPTION".to_string(), n - 3));
    }
    let scope = &lx[n - 3];
    if n >= 4
        && lx[n - 4].is_keyword("WITH")
        && (scope.is_keyword("CASCADED") || scope.is_keyword("LOCAL"))
    {
        return Some((format!("{} CHECK OPTION", scope.text.to_uppercase()), n - 4));
    }
    None
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
