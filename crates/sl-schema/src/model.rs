//! In-memory schema model
//!
//! Built from the CREATE statements of a schema dump. Definitions keep their
//! source text so the writer can replay them verbatim; the structural fields
//! drive equality checks in the differ.

use std::collections::BTreeMap;

use sl_core::{
    ColumnMetadata, DatabaseMetadata, MaskingLevel, StaticCatalog, TableMetadata, ViewMetadata,
};
use sl_sql::ViewDefinition;

/// All objects of one database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaModel {
    /// Database name taken from qualified CREATE statements, if any
    pub database: Option<String>,
    /// Tables keyed by their folded name
    pub tables: BTreeMap<String, TableDef>,
    pub views: BTreeMap<String, ViewDef>,
    pub functions: BTreeMap<String, RoutineDef>,
    pub procedures: BTreeMap<String, RoutineDef>,
    pub events: BTreeMap<String, RoutineDef>,
    pub triggers: BTreeMap<String, RoutineDef>,
}

impl SchemaModel {
    /// True when the model holds no objects
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.views.is_empty()
            && self.functions.is_empty()
            && self.procedures.is_empty()
            && self.events.is_empty()
            && self.triggers.is_empty()
    }

    /// Catalog view of the model for lineage extraction.
    ///
    /// Every column carries the lowest masking level; only names matter.
    pub fn to_catalog(&self) -> StaticCatalog {
        let tables = self
            .tables
            .values()
            .map(|t| {
                let columns = t
                    .columns
                    .iter()
                    .map(|c| {
                        ColumnMetadata::new(c.name.clone(), MaskingLevel::None)
                            .with_type(c.column_type.clone())
                    })
                    .collect();
                TableMetadata::new(t.name.clone(), columns)
            })
            .collect();
        let views = self
            .views
            .values()
            .map(|v| ViewMetadata {
                name: v.name.clone(),
                definition: v.header.body.clone(),
                columns: v.header.columns.clone(),
            })
            .collect();
        StaticCatalog::new().with_database(DatabaseMetadata::single_schema(
            self.database.clone().unwrap_or_default(),
            tables,
            views,
        ))
    }
}

/// A base table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    /// Creation order within the script
    pub id: usize,
    pub name: String,
    /// Columns in declaration order; `ColumnDef::id` is the index
    pub columns: Vec<ColumnDef>,
    /// Indexes from CREATE INDEX statements, keyed by lowercase name
    pub indexes: BTreeMap<String, IndexDef>,
    /// Inline KEY / INDEX / UNIQUE / FULLTEXT / SPATIAL, keyed by lowercase name
    pub index_constraints: BTreeMap<String, IndexConstraintDef>,
    pub foreign_keys: BTreeMap<String, ForeignKeyDef>,
    pub checks: BTreeMap<String, CheckDef>,
    /// Table options keyed by option name
    pub options: BTreeMap<String, TableOptionDef>,
    pub primary_key: Option<PrimaryKeyDef>,
    /// `PARTITION BY ...` tail, kept verbatim
    pub partition: Option<String>,
    /// Full CREATE TABLE text without terminator
    pub definition: String,
}

impl TableDef {
    pub fn new(id: usize, name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            columns: Vec::new(),
            indexes: BTreeMap::new(),
            index_constraints: BTreeMap::new(),
            foreign_keys: BTreeMap::new(),
            checks: BTreeMap::new(),
            options: BTreeMap::new(),
            primary_key: None,
            partition: None,
            definition: definition.into(),
        }
    }

    /// Column by name; column names are case-insensitive
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Position within the table
    pub id: usize,
    pub name: String,
    pub table: String,
    /// Declared type text, e.g. `varchar(255)`
    pub column_type: String,
    pub nullable: bool,
    pub visible: bool,
    /// Default expression text
    pub default: Option<String>,
    pub comment: Option<String>,
    /// Column definition as written, used for ADD / MODIFY COLUMN
    pub definition: String,
    /// Layout-insensitive definition used for equality
    pub canonical: String,
}

/// Where an added or moved column goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    First,
    After(String),
}

/// A standalone CREATE INDEX
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub id: usize,
    pub name: String,
    pub table: String,
    /// `UNIQUE`, `FULLTEXT` or `SPATIAL`
    pub kind: Option<String>,
    pub keys: Vec<String>,
    /// The CREATE INDEX statement as written
    pub definition: String,
    pub canonical: String,
}

/// An index declared inside CREATE TABLE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConstraintDef {
    pub name: String,
    pub table: String,
    /// `UNIQUE`, `FULLTEXT` or `SPATIAL`; plain keys have none
    pub category: Option<String>,
    /// `USING BTREE` / `USING HASH` written before the key list
    pub index_type: Option<String>,
    /// Parenthesized key list as written
    pub key_list: String,
    pub keys: Vec<String>,
    /// Index options after the key list
    pub options: String,
    pub canonical: String,
}

/// A table's primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyDef {
    pub table: String,
    pub columns: Vec<String>,
    pub key_list: String,
    pub options: String,
    pub canonical: String,
}

/// A foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    /// Constraint text as written
    pub definition: String,
    pub canonical: String,
}

/// A CHECK constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDef {
    pub name: String,
    pub table: String,
    pub enforced: bool,
    pub definition: String,
    pub canonical: String,
}

/// One table option such as `ENGINE=InnoDB`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptionDef {
    /// Option name, e.g. `ENGINE` or `DEFAULT CHARACTER SET`
    pub option: String,
    pub table: String,
    /// Value text; compared for equality
    pub value: String,
    /// Option as written
    pub text: String,
}

/// A view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDef {
    pub name: String,
    pub header: ViewDefinition,
    /// Output column names resolved from the query
    pub columns: Vec<String>,
    pub canonical: String,
}

/// Kind of stored program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    Function,
    Procedure,
    Event,
    Trigger,
}

impl RoutineKind {
    pub fn keyword(self) -> &'static str {
        match self {
            RoutineKind::Function => "FUNCTION",
            RoutineKind::Procedure => "PROCEDURE",
            RoutineKind::Event => "EVENT",
            RoutineKind::Trigger => "TRIGGER",
        }
    }
}

/// A function, procedure, event or trigger, kept as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDef {
    pub kind: RoutineKind,
    pub name: String,
    /// Full CREATE statement without terminator
    pub definition: String,
    pub canonical: String,
}
