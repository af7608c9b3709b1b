//! sl-analysis: sensitivity lineage for MySQL queries
//!
//! Given a `SELECT` (or `CREATE VIEW`) statement and a schema catalog whose
//! columns carry masking levels, the extractor computes the masking level of
//! every projected column by walking joins, set operations, subqueries,
//! views and recursive CTEs.

pub(crate) mod context;
pub(crate) mod error;
pub mod field;
pub(crate) mod lineage;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{AnalysisError, AnalysisResult};
pub use field::{FieldInfo, PseudoTable};
pub use lineage::{extract, LineageExtractor};
