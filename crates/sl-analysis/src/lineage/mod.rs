//! Lineage extraction: statement → ordered output fields
//!
//! Evaluation is one recursive walk over the sqlparser AST. Each query block
//! produces a `Vec<FieldInfo>`; tables resolve against visible CTEs first,
//! then the catalog (base tables, then views re-extracted from their
//! definitions).

mod cte;
mod expr;
mod join;
mod query;
mod select;

use std::rc::Rc;

use crate::context::Scope;
use crate::error::{AnalysisError, AnalysisResult};
use crate::field::{FieldInfo, PseudoTable};
use sl_core::{
    AnalyzerConfig, CachedCatalog, DatabaseMetadata, MaskingAttributes, NameComparison,
    SchemaCatalog, ViewMetadata,
};
use sl_sql::{SqlParser, ViewDefinition};
use sqlparser::ast::Statement;

/// Extract the output fields of `sql`.
///
/// `current_database` resolves unqualified table names; when empty, the
/// configured default (or `SLUICE_DATABASE`) is used.
pub fn extract(
    sql: &str,
    current_database: &str,
    catalog: &dyn SchemaCatalog,
    config: &AnalyzerConfig,
) -> AnalysisResult<Vec<FieldInfo>> {
    let explicit = (!current_database.is_empty()).then_some(current_database);
    let database = config.resolve_current_database(explicit).unwrap_or_default();
    LineageExtractor::new(catalog, database, config).extract(sql)
}

/// Stateful extractor for one top-level call.
///
/// Catalog lookups are cached for the extractor's lifetime.
pub struct LineageExtractor<'a> {
    catalog: CachedCatalog<'a>,
    parser: SqlParser,
    current_database: String,
    names: NameComparison,
    max_cte_iterations: Option<usize>,
    scope: Scope,
    views_in_progress: Vec<String>,
}

impl<'a> LineageExtractor<'a> {
    pub fn new(
        catalog: &'a dyn SchemaCatalog,
        current_database: impl Into<String>,
        config: &AnalyzerConfig,
    ) -> Self {
        Self {
            catalog: CachedCatalog::new(catalog),
            parser: SqlParser::mysql(),
            current_database: current_database.into(),
            names: config.name_comparison(),
            max_cte_iterations: config.max_recursive_cte_iterations,
            scope: Scope::default(),
            views_in_progress: Vec::new(),
        }
    }

    /// Output fields of a single `SELECT` or `CREATE VIEW` statement
    pub fn extract(&mut self, sql: &str) -> AnalysisResult<Vec<FieldInfo>> {
        self.scope = Scope::default();
        self.extract_text(sql)
    }

    fn extract_text(&mut self, sql: &str) -> AnalysisResult<Vec<FieldInfo>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(view) = ViewDefinition::parse(sql) {
            let mut fields = self.extract_text(&view.body)?;
            rename_fields(&mut fields, &view.columns, &view.name)?;
            return Ok(fields);
        }

        let statements = self.parser.parse(sql)?;
        match statements.as_slice() {
            [] => Ok(Vec::new()),
            [statement] => self.eval_statement(statement),
            many => Err(AnalysisError::MultipleStatements(many.len())),
        }
    }

    fn eval_statement(&mut self, statement: &Statement) -> AnalysisResult<Vec<FieldInfo>> {
        match statement {
            Statement::Query(query) => self.eval_query(query),
            other => Err(AnalysisError::UnsupportedStatement(
                statement_kind(other).to_string(),
            )),
        }
    }

    /// Resolve a table reference to its columns.
    ///
    /// Returns the database the fields belong to (empty for CTEs).
    pub(crate) fn find_table(
        &mut self,
        database: &str,
        table: &str,
    ) -> AnalysisResult<(String, PseudoTable)> {
        if database.is_empty() {
            if let Some(cte) = self.scope.find_cte(table, self.names) {
                return Ok((String::new(), cte.clone()));
            }
        }

        let database = if database.is_empty() {
            self.current_database.clone()
        } else {
            database.to_string()
        };

        if let Some(meta) = self.database_metadata(&database)? {
            if let Some(found) = meta.find_table(table, self.names) {
                let columns = found
                    .columns
                    .iter()
                    .map(|c| FieldInfo::new(c.name.clone(), MaskingAttributes::new(c.masking)))
                    .collect();
                return Ok((database, PseudoTable::new(found.name.clone(), columns)));
            }
            if let Some(view) = meta.find_view(table, self.names) {
                let view = view.clone();
                let resolved = self.resolve_view(&database, &view)?;
                return Ok((database, resolved));
            }
        }

        Err(AnalysisError::TableNotFound {
            database,
            table: table.to_string(),
        })
    }

    fn database_metadata(&self, name: &str) -> AnalysisResult<Option<Rc<DatabaseMetadata>>> {
        if let Some(meta) = self.catalog.database(name)? {
            return Ok(Some(meta));
        }
        if self.names.is_case_sensitive() {
            return Ok(None);
        }
        let folded = self
            .catalog
            .database_names()?
            .into_iter()
            .find(|n| n != name && self.names.matches(n, name));
        match folded {
            Some(actual) => Ok(self.catalog.database(&actual)?),
            None => Ok(None),
        }
    }

    /// Re-run extraction over a view's definition in a fresh scope
    fn resolve_view(&mut self, database: &str, view: &ViewMetadata) -> AnalysisResult<PseudoTable> {
        let key = format!("{}.{}", self.names.key(database), self.names.key(&view.name));
        if self.views_in_progress.contains(&key) {
            return Err(AnalysisError::ViewCycle(view.name.clone()));
        }
        log::debug!("Resolving view {}.{} from its definition", database, view.name);

        self.views_in_progress.push(key);
        let saved_scope = std::mem::take(&mut self.scope);
        let saved_database = std::mem::replace(&mut self.current_database, database.to_string());
        let result = self.extract_text(&view.definition);
        self.current_database = saved_database;
        self.scope = saved_scope;
        self.views_in_progress.pop();

        let mut fields = result?;
        rename_fields(&mut fields, &view.columns, &view.name)?;
        Ok(PseudoTable::new(view.name.clone(), fields))
    }
}

/// Apply an explicit column list, checking its arity
pub(crate) fn rename_fields(
    fields: &mut [FieldInfo],
    names: &[String],
    object: &str,
) -> AnalysisResult<()> {
    if names.is_empty() {
        return Ok(());
    }
    if names.len() != fields.len() {
        return Err(AnalysisError::ColumnListArity {
            object: object.to_string(),
            expected: names.len(),
            actual: fields.len(),
        });
    }
    for (field, name) in fields.iter_mut().zip(names) {
        field.name = name.clone();
    }
    Ok(())
}

/// Human-readable statement kind for error messages
fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Query(_) => "SELECT",
        Statement::Insert(_) => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::CreateTable(_) => "CREATE TABLE",
        Statement::CreateIndex(_) => "CREATE INDEX",
        Statement::Drop { .. } => "DROP",
        Statement::AlterTable { .. } => "ALTER TABLE",
        Statement::Explain { .. } => "EXPLAIN",
        _ => "unsupported statement",
    }
}

#[cfg(test)]
#[path = "lineage_test.rs"]
mod tests;
