//! Error types for sl-analysis

use thiserror::Error;

/// Semantic errors raised while extracting lineage.
///
/// Any of these aborts extraction for the statement; no partial field list
/// is returned.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// AE001: Table or view not found in CTEs or the catalog
    #[error("[AE001] Table or view `{database}`.`{table}` not found")]
    TableNotFound { database: String, table: String },

    /// AE002: UNION/INTERSECT/EXCEPT branches differ in width
    #[error("[AE002] Set operation branches have different column counts: {left} and {right}")]
    SetOperationArity { left: usize, right: usize },

    /// AE003: Explicit column list does not match the query width
    #[error("[AE003] Column list of '{object}' has {expected} names but the query returns {actual} columns")]
    ColumnListArity {
        object: String,
        expected: usize,
        actual: usize,
    },

    /// AE004: Recursive CTE column count mismatch
    #[error("[AE004] The common table expression and column names list have different column counts ('{cte}')")]
    RecursiveCteArity { cte: String },

    /// AE005: Recursive CTE did not reach a fixpoint
    #[error("[AE005] Recursive CTE '{cte}' did not converge within {limit} iterations")]
    FixpointLimit { cte: String, limit: usize },

    /// AE006: Statement kind cannot be analyzed
    #[error("[AE006] Unsupported statement: {0}")]
    UnsupportedStatement(String),

    /// AE007: Query construct cannot be analyzed
    #[error("[AE007] Unsupported SQL construct: {0}")]
    UnsupportedConstruct(String),

    /// AE008: More than one statement in the input
    #[error("[AE008] Expected exactly one statement, found {0}")]
    MultipleStatements(usize),

    /// AE009: A view's definition refers back to itself
    #[error("[AE009] View '{0}' refers to itself")]
    ViewCycle(String),

    /// AE010: Core error propagation
    #[error("[AE010] Core error: {0}")]
    Core(#[from] sl_core::CoreError),

    /// AE011: SQL crate error propagation
    #[error("[AE011] SQL error: {0}")]
    Sql(#[from] sl_sql::SqlError),
}

/// Result type alias for AnalysisError
pub type AnalysisResult<T> = Result<T, AnalysisError>;
