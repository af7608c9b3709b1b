//! MySQL dialect over sqlparser
//!
//! Parsing and tokenizing both go through [`SqlDialect`], so the splitter
//! and the parser agree on what a token is.

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, MySqlDialect as SqlParserMySql};
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{TokenWithSpan, Tokenizer, TokenizerError};

use crate::error::{SqlError, SqlResult};
use crate::position::Position;

/// A sqlparser dialect plus the MySQL conventions layered on top of it
pub trait SqlDialect: Send + Sync {
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements.
    ///
    /// Syntax errors carry the 1-based position sqlparser reports, or
    /// line 0 when the message has none.
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let message = e.to_string();
            let at = error_position(&message).unwrap_or_default();
            SqlError::ParseError {
                message,
                line: at.line,
                column: at.column,
            }
        })
    }

    /// Tokens of `sql` with their spans, whitespace included
    fn tokenize(&self, sql: &str) -> Result<Vec<TokenWithSpan>, TokenizerError> {
        Tokenizer::new(self.parser_dialect(), sql).tokenize_with_location()
    }

    fn quote_ident(&self, ident: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Position from the `Line: N, Column: M` suffix of a sqlparser error
pub(crate) fn error_position(message: &str) -> Option<Position> {
    let tail = &message[message.rfind("Line: ")? + "Line: ".len()..];
    let (line, rest) = tail.split_once(',')?;
    let rest = rest.trim_start().strip_prefix("Column: ")?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    Some(Position {
        line: line.trim().parse().ok()?,
        column: digits.parse().ok()?,
    })
}

/// MySQL: backtick identifiers, `#` comments, no `$$` quoting
#[derive(Debug)]
pub struct MySqlDialect {
    inner: SqlParserMySql,
}

impl MySqlDialect {
    pub fn new() -> Self {
        Self {
            inner: SqlParserMySql {},
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MySqlDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.inner
    }

    fn quote_ident(&self, ident: &str) -> String {
        sl_core::quote_identifier(ident)
    }

    fn name(&self) -> &'static str {
        "mysql"
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
