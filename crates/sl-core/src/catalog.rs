//! Schema catalog provider
//!
//! Lineage extraction needs table columns and view definitions. Callers hand
//! them in through [`SchemaCatalog`]; the core never loads metadata itself.
//! [`CachedCatalog`] memoizes lookups for the duration of one analysis call.

use crate::error::{CoreError, CoreResult};
use crate::masking::MaskingLevel;
use crate::name_cmp::NameComparison;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// A column in a catalog table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Declared type text (informational)
    #[serde(default, rename = "type")]
    pub column_type: String,

    /// Sensitivity of the stored values
    #[serde(default)]
    pub masking: MaskingLevel,
}

impl ColumnMetadata {
    /// Create a column with the given masking level
    pub fn new(name: impl Into<String>, masking: MaskingLevel) -> Self {
        Self {
            name: name.into(),
            column_type: String::new(),
            masking,
        }
    }

    /// Set the declared type
    pub fn with_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }
}

/// A base table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableMetadata {
    /// Table name
    pub name: String,

    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Create a table from its columns
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// A view, resolved by re-analyzing its definition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewMetadata {
    /// View name
    pub name: String,

    /// The `SELECT` text after `AS`
    pub definition: String,

    /// Explicit column list, empty when the view has none
    #[serde(default)]
    pub columns: Vec<String>,
}

impl ViewMetadata {
    /// Create a view without an explicit column list
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            columns: Vec::new(),
        }
    }
}

/// A schema inside a database. MySQL has exactly one, named `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaMetadata {
    /// Schema name
    #[serde(default)]
    pub name: String,

    /// Base tables
    #[serde(default)]
    pub tables: Vec<TableMetadata>,

    /// Views
    #[serde(default)]
    pub views: Vec<ViewMetadata>,
}

/// Metadata for one database
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseMetadata {
    /// Database name
    pub name: String,

    /// Schemas in this database
    #[serde(default)]
    pub schemas: Vec<SchemaMetadata>,
}

impl DatabaseMetadata {
    /// Create a database with a single unnamed schema
    pub fn single_schema(
        name: impl Into<String>,
        tables: Vec<TableMetadata>,
        views: Vec<ViewMetadata>,
    ) -> Self {
        Self {
            name: name.into(),
            schemas: vec![SchemaMetadata {
                name: String::new(),
                tables,
                views,
            }],
        }
    }

    /// Find a base table by name in any schema
    pub fn find_table(&self, name: &str, names: NameComparison) -> Option<&TableMetadata> {
        self.schemas
            .iter()
            .flat_map(|s| s.tables.iter())
            .find(|t| names.matches(&t.name, name))
    }

    /// Find a view by name in any schema
    pub fn find_view(&self, name: &str, names: NameComparison) -> Option<&ViewMetadata> {
        self.schemas
            .iter()
            .flat_map(|s| s.views.iter())
            .find(|v| names.matches(&v.name, name))
    }
}

/// Source of database metadata for lineage extraction.
///
/// Implementations are treated as side-effect-free lookups.
pub trait SchemaCatalog {
    /// Metadata for `name`, or `None` if the database is unknown
    fn get_database_metadata(&self, name: &str) -> CoreResult<Option<DatabaseMetadata>>;

    /// Names of every database the catalog knows
    fn list_database_names(&self) -> CoreResult<Vec<String>>;
}

/// In-memory catalog, loadable from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticCatalog {
    /// Databases in this catalog
    #[serde(default)]
    pub databases: Vec<DatabaseMetadata>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a database
    pub fn with_database(mut self, database: DatabaseMetadata) -> Self {
        self.databases.push(database);
        self
    }

    /// Parse a catalog from YAML text
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a catalog from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }
}

impl SchemaCatalog for StaticCatalog {
    fn get_database_metadata(&self, name: &str) -> CoreResult<Option<DatabaseMetadata>> {
        Ok(self.databases.iter().find(|d| d.name == name).cloned())
    }

    fn list_database_names(&self) -> CoreResult<Vec<String>> {
        Ok(self.databases.iter().map(|d| d.name.clone()).collect())
    }
}

/// Per-call memoizing wrapper around another catalog
pub struct CachedCatalog<'a> {
    inner: &'a dyn SchemaCatalog,
    databases: RefCell<HashMap<String, Option<Rc<DatabaseMetadata>>>>,
    names: RefCell<Option<Vec<String>>>,
}

impl<'a> CachedCatalog<'a> {
    /// Wrap `inner`
    pub fn new(inner: &'a dyn SchemaCatalog) -> Self {
        Self {
            inner,
            databases: RefCell::new(HashMap::new()),
            names: RefCell::new(None),
        }
    }

    /// Shared handle to a database's metadata, fetched at most once
    pub fn database(&self, name: &str) -> CoreResult<Option<Rc<DatabaseMetadata>>> {
        if let Some(hit) = self.databases.borrow().get(name) {
            return Ok(hit.clone());
        }
        log::debug!("Catalog lookup for database '{}'", name);
        let fetched = self.inner.get_database_metadata(name)?.map(Rc::new);
        self.databases
            .borrow_mut()
            .insert(name.to_string(), fetched.clone());
        Ok(fetched)
    }

    /// Database names, fetched at most once
    pub fn database_names(&self) -> CoreResult<Vec<String>> {
        if let Some(names) = self.names.borrow().as_ref() {
            return Ok(names.clone());
        }
        let names = self.inner.list_database_names()?;
        *self.names.borrow_mut() = Some(names.clone());
        Ok(names)
    }
}

impl SchemaCatalog for CachedCatalog<'_> {
    fn get_database_metadata(&self, name: &str) -> CoreResult<Option<DatabaseMetadata>> {
        Ok(self.database(name)?.map(|db| (*db).clone()))
    }

    fn list_database_names(&self) -> CoreResult<Vec<String>> {
        self.database_names()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
