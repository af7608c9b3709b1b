//! SQL parser wrapper

use crate::dialect::{MySqlDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use crate::splitter::{self, Statement as SplitStatement};
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

/// A split statement together with its parsed AST
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    /// The statement as returned by the splitter
    pub source: SplitStatement,
    /// Parsed AST nodes (usually exactly one)
    pub ast: Vec<Statement>,
}

impl SqlParser {
    /// Create a new parser with the MySQL dialect
    pub fn mysql() -> Self {
        Self {
            dialect: Box::new(MySqlDialect::new()),
        }
    }

    /// Create a parser from a dialect implementation
    pub fn with_dialect(dialect: Box<dyn SqlDialect>) -> Self {
        Self { dialect }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Parse SQL and return the first statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let stmts = self.parse(sql)?;
        stmts.into_iter().next().ok_or(SqlError::EmptySql)
    }

    /// Split a script and parse every non-empty statement.
    ///
    /// Syntax error positions are reported in script coordinates.
    pub fn parse_script(&self, script: &str) -> SqlResult<Vec<ParsedStatement>> {
        let mut parsed = Vec::new();
        for source in splitter::split(script) {
            if source.is_empty {
                continue;
            }
            // untrimmed so error positions line up with the statement range
            let ast = self.dialect.parse(&source.text).map_err(|e| {
                let line_index = crate::position::LineIndex::new(script);
                let origin = line_index.position(source.range.start);
                e.offset_by(origin.line, origin.column)
            })?;
            parsed.push(ParsedStatement { source, ast });
        }
        Ok(parsed)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Quote an identifier for the current dialect
    pub fn quote_ident(&self, ident: &str) -> String {
        self.dialect.quote_ident(ident)
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::mysql()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
