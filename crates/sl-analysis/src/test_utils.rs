//! Shared test utilities for sl-analysis

use sl_core::{
    ColumnMetadata, DatabaseMetadata, MaskingLevel, StaticCatalog, TableMetadata, ViewMetadata,
};

/// Shorthand for a catalog column
pub fn col(name: &str, masking: MaskingLevel) -> ColumnMetadata {
    ColumnMetadata::new(name, masking)
}

/// Shorthand for a catalog table
pub fn table(name: &str, columns: Vec<ColumnMetadata>) -> TableMetadata {
    TableMetadata::new(name, columns)
}

/// A catalog holding one database named `db`
pub fn catalog_with(tables: Vec<TableMetadata>, views: Vec<ViewMetadata>) -> StaticCatalog {
    StaticCatalog::new().with_database(DatabaseMetadata::single_schema("db", tables, views))
}

/// `db` with `t(a FULL, b NONE)`, `t1(a NONE, b PARTIAL)` and
/// `t2(a FULL, c NONE)`
pub fn sample_catalog() -> StaticCatalog {
    catalog_with(
        vec![
            table(
                "t",
                vec![col("a", MaskingLevel::Full), col("b", MaskingLevel::None)],
            ),
            table(
                "t1",
                vec![col("a", MaskingLevel::None), col("b", MaskingLevel::Partial)],
            ),
            table(
                "t2",
                vec![col("a", MaskingLevel::Full), col("c", MaskingLevel::None)],
            ),
        ],
        vec![],
    )
}
