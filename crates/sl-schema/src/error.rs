//! Error types for sl-schema

use sl_analysis::AnalysisError;
use sl_core::CoreError;
use thiserror::Error;

/// Schema model and diff errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// SC001: CREATE statements name more than one database
    #[error("[SC001] multiple database names found: {first}, {second}")]
    MultipleDatabases { first: String, second: String },

    /// SC002: Table created twice
    #[error("[SC002] multiple table names found: {0}")]
    DuplicateTable(String),

    /// SC003: Column declared twice in one table
    #[error("[SC003] multiple column names found: {column} in table {table}")]
    DuplicateColumn { column: String, table: String },

    /// SC004: Foreign key declared twice in one table
    #[error("[SC004] multiple foreign keys found: {0}")]
    DuplicateForeignKey(String),

    /// SC005: CREATE INDEX on a table the script never creates
    #[error("[SC005] Try to create index `{index}` on table `{table}`, but table not found")]
    IndexTableNotFound { index: String, table: String },

    /// SC006: CREATE INDEX reusing an existing index name
    #[error("[SC006] Try to create index `{index}` on table `{table}`, but index already exists")]
    DuplicateIndex { index: String, table: String },

    /// SC007: View whose query projects nothing
    #[error("[SC007] no columns found for view {view}, def: {definition}")]
    ViewWithoutColumns { view: String, definition: String },

    /// SC008: CREATE statement whose shape could not be read
    #[error("[SC008] malformed definition of {object}: {message}")]
    Malformed { object: String, message: String },

    /// SC009: Core error
    #[error("[SC009] {0}")]
    Core(#[from] CoreError),

    /// SC010: View column resolution failed
    #[error("[SC010] {0}")]
    Analysis(#[from] AnalysisError),
}

impl SchemaError {
    pub(crate) fn malformed(object: &str, message: &str) -> Self {
        SchemaError::Malformed {
            object: object.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for SchemaError
pub type SchemaResult<T> = Result<T, SchemaError>;
