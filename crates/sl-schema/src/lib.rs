//! sl-schema - schema model builder and DDL differ for Sluice
//!
//! A schema dump (CREATE statements only) is folded into a [`SchemaModel`].
//! Two models are compared into a [`DiffNode`] whose lists follow a
//! dependency-safe order, and the writer renders that node as a migration
//! script.

pub mod builder;
pub(crate) mod ddl;
pub mod differ;
pub mod error;
pub mod model;
pub(crate) mod table;
pub(crate) mod table_options;
pub mod writer;

pub use builder::build_schema;
pub use differ::{
    diff, diff_with_config, ColumnChange, DiffNode, PartitionChange, TableOptionChange,
};
pub use error::{SchemaError, SchemaResult};
pub use model::{
    CheckDef, ColumnDef, ColumnPosition, ForeignKeyDef, IndexConstraintDef, IndexDef,
    PrimaryKeyDef, RoutineDef, RoutineKind, SchemaModel, TableDef, TableOptionDef, ViewDef,
};
pub use writer::write_script;
