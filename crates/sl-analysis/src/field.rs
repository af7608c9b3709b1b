//! Column values flowing through lineage evaluation

use serde::Serialize;
use sl_core::{MaskingAttributes, MaskingLevel};

/// One output column with its origin and masking attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    /// Output column name
    pub name: String,
    /// Table (or alias) the column is reachable through, empty for expressions
    pub table: String,
    /// Database of that table, empty for CTEs and expressions
    pub database: String,
    /// Masking attributes
    pub masking: MaskingAttributes,
}

impl FieldInfo {
    /// An expression column not bound to any table
    pub fn new(name: impl Into<String>, masking: MaskingAttributes) -> Self {
        Self {
            name: name.into(),
            table: String::new(),
            database: String::new(),
            masking,
        }
    }

    /// A column bound to `database`.`table`
    pub fn in_table(
        name: impl Into<String>,
        table: impl Into<String>,
        database: impl Into<String>,
        masking: MaskingAttributes,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            database: database.into(),
            masking,
        }
    }

    pub fn level(&self) -> MaskingLevel {
        self.masking.level()
    }
}

/// A table-shaped intermediate value: a CTE, derived table, view result or
/// catalog table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoTable {
    pub name: String,
    pub columns: Vec<FieldInfo>,
}

impl PseudoTable {
    pub fn new(name: impl Into<String>, columns: Vec<FieldInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Columns as seen through `table` in `database`
    pub(crate) fn fields_as(&self, table: &str, database: &str) -> Vec<FieldInfo> {
        self.columns
            .iter()
            .map(|c| FieldInfo::in_table(c.name.clone(), table, database, c.masking))
            .collect()
    }
}
