//! Error types for sl-sql

use thiserror::Error;

/// SQL parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Unsupported SQL statement (S003)
    #[error("[S003] Unsupported SQL statement type: {0}")]
    UnsupportedStatement(String),
}

impl SqlError {
    /// Shift a parse error located inside one statement into script coordinates.
    ///
    /// `start` is the position of the statement's first character in the script.
    pub fn offset_by(self, start_line: usize, start_column: usize) -> Self {
        match self {
            SqlError::ParseError {
                message,
                line,
                column,
            } if line > 0 => {
                let column = if line == 1 {
                    column + start_column - 1
                } else {
                    column
                };
                SqlError::ParseError {
                    message,
                    line: line + start_line - 1,
                    column,
                }
            }
            other => other,
        }
    }
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
