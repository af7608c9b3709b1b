//! Schema model builder
//!
//! Walks the CREATE statements of a schema dump and folds them into one
//! [`SchemaModel`]. Statements of any other kind are ignored. View output
//! columns are resolved once the whole script has been read, so a view may
//! reference tables and views created after it.

use sl_analysis::LineageExtractor;
use sl_core::{AnalyzerConfig, NameComparison};
use sl_sql::lexeme::{dotted_name, lexemes, Lexeme};
use sl_sql::{split, ViewDefinition};

use crate::ddl::{canonical, find_open_paren, key_list, slice_text, trimmed};
use crate::error::{SchemaError, SchemaResult};
use crate::model::{IndexDef, RoutineDef, RoutineKind, SchemaModel, ViewDef};
use crate::table::{parse_create_table, CreateTable};

/// Words that may appear between CREATE and the object keyword
const HEADER_WORDS: &[&str] = &[
    "OR",
    "REPLACE",
    "TEMPORARY",
    "UNIQUE",
    "FULLTEXT",
    "SPATIAL",
    "ONLINE",
    "OFFLINE",
    "AGGREGATE",
];

/// Build a schema model from a script of CREATE statements
pub fn build_schema(text: &str, names: NameComparison) -> SchemaResult<SchemaModel> {
    let mut builder = SchemaBuilder::new(names);
    for statement in split(text) {
        if !statement.is_empty {
            builder.statement(&statement.text)?;
        }
    }
    builder.finish()
}

/// Object a CREATE statement defines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateTarget {
    Table { temporary: bool },
    Index,
    Routine(RoutineKind),
}

struct SchemaBuilder {
    names: NameComparison,
    model: SchemaModel,
    next_table_id: usize,
    next_index_id: usize,
}

impl SchemaBuilder {
    fn new(names: NameComparison) -> Self {
        Self {
            names,
            model: SchemaModel::default(),
            next_table_id: 0,
            next_index_id: 0,
        }
    }

    fn statement(&mut self, sql: &str) -> SchemaResult<()> {
        let all = lexemes(sql);
        let lx = &all[..trimmed(&all)];
        if !lx.first().is_some_and(|l| l.is_keyword("CREATE")) {
            log::debug!("Skipping non-CREATE statement");
            return Ok(());
        }

        if let Some(view) = ViewDefinition::parse(sql) {
            return self.view(lx, sql, view);
        }

        match create_target(lx) {
            Some((CreateTarget::Table { temporary: true }, _)) => {
                log::debug!("Skipping CREATE TEMPORARY TABLE");
                Ok(())
            }
            Some((CreateTarget::Table { .. }, at)) => {
                let id = self.next_table_id;
                match parse_create_table(sql, lx, at + 1, id, self.names)? {
                    Some(created) => self.table(created),
                    None => Ok(()),
                }
            }
            Some((CreateTarget::Index, at)) => self.index(sql, lx, at),
            Some((CreateTarget::Routine(kind), at)) => self.routine(sql, lx, at, kind),
            None => {
                log::debug!("Skipping CREATE statement for an unmodeled object");
                Ok(())
            }
        }
    }

    fn note_database(&mut self, database: Option<String>) -> SchemaResult<()> {
        let Some(database) = database else {
            return Ok(());
        };
        match &self.model.database {
            None => {
                self.model.database = Some(database);
                Ok(())
            }
            Some(first) if !self.names.matches(first, &database) => {
                Err(SchemaError::MultipleDatabases {
                    first: first.clone(),
                    second: database,
                })
            }
            Some(_) => Ok(()),
        }
    }

    fn table(&mut self, created: CreateTable) -> SchemaResult<()> {
        self.note_database(created.database)?;
        let table = created.table;
        let key = self.names.key(&table.name);
        if self.model.tables.contains_key(&key) {
            return Err(SchemaError::DuplicateTable(table.name));
        }
        self.next_table_id += 1;
        self.model.tables.insert(key, table);
        Ok(())
    }

    /// `CREATE [UNIQUE|FULLTEXT|SPATIAL] INDEX name [USING t] ON tbl (keys) ...`
    fn index(&mut self, sql: &str, lx: &[Lexeme<'_>], at: usize) -> SchemaResult<()> {
        let kind = at
            .checked_sub(1)
            .map(|i| &lx[i])
            .filter(|l| ["UNIQUE", "FULLTEXT", "SPATIAL"].iter().any(|kw| l.is_keyword(kw)))
            .map(|l| l.text.to_uppercase());
        let definition = slice_text(sql, lx);
        let Some(name) = lx.get(at + 1).and_then(|l| l.ident()) else {
            return Err(SchemaError::malformed(definition, "index without a name"));
        };
        let Some(on) = (at + 2..lx.len()).find(|&i| lx[i].is_keyword("ON")) else {
            return Err(SchemaError::malformed(&name, "index without ON clause"));
        };
        let Some((mut parts, after)) = dotted_name(lx, on + 1) else {
            return Err(SchemaError::malformed(&name, "index without a table"));
        };
        let table_name = parts.pop().unwrap_or_default();
        self.note_database(parts.pop())?;
        let keys = find_open_paren(lx, after)
            .and_then(|open| key_list(sql, lx, open))
            .map(|(keys, _)| keys)
            .ok_or_else(|| SchemaError::malformed(&name, "index without key list"))?;

        let Some(table) = self.model.tables.get_mut(&self.names.key(&table_name)) else {
            return Err(SchemaError::IndexTableNotFound {
                index: name,
                table: table_name,
            });
        };
        let key = name.to_lowercase();
        if table.indexes.contains_key(&key) || table.index_constraints.contains_key(&key) {
            return Err(SchemaError::DuplicateIndex {
                index: name,
                table: table.name.clone(),
            });
        }
        for column in keys.iter().filter(|k| !k.starts_with('(')) {
            if table.column(column).is_none() {
                log::warn!(
                    "Index `{}` on table `{}` references unknown column `{}`",
                    name,
                    table.name,
                    column
                );
            }
        }

        let index = IndexDef {
            id: self.next_index_id,
            name,
            table: table.name.clone(),
            kind,
            keys,
            definition: definition.to_string(),
            canonical: canonical(definition),
        };
        self.next_index_id += 1;
        table.indexes.insert(key, index);
        Ok(())
    }

    fn view(&mut self, lx: &[Lexeme<'_>], sql: &str, header: ViewDefinition) -> SchemaResult<()> {
        self.note_database(header.database.clone())?;
        let key = self.names.key(&header.name);
        if self.model.views.contains_key(&key) {
            log::debug!("View `{}` defined twice, keeping the last definition", header.name);
        }
        let view = ViewDef {
            name: header.name.clone(),
            header,
            columns: Vec::new(),
            canonical: canonical(slice_text(sql, lx)),
        };
        self.model.views.insert(key, view);
        Ok(())
    }

    fn routine(
        &mut self,
        sql: &str,
        lx: &[Lexeme<'_>],
        at: usize,
        kind: RoutineKind,
    ) -> SchemaResult<()> {
        let definition = slice_text(sql, lx);
        let mut i = at + 1;
        if lx.get(i).is_some_and(|l| l.is_keyword("IF")) {
            // IF NOT EXISTS
            i += 3;
        }
        let Some((mut parts, _)) = dotted_name(lx, i) else {
            return Err(SchemaError::malformed(definition, "routine without a name"));
        };
        let name = parts.pop().unwrap_or_default();
        self.note_database(parts.pop())?;

        let routine = RoutineDef {
            kind,
            name: name.clone(),
            definition: definition.to_string(),
            canonical: canonical(definition),
        };
        let routines = match kind {
            RoutineKind::Function => &mut self.model.functions,
            RoutineKind::Procedure => &mut self.model.procedures,
            RoutineKind::Event => &mut self.model.events,
            RoutineKind::Trigger => &mut self.model.triggers,
        };
        routines.insert(self.names.key(&name), routine);
        Ok(())
    }

    /// Resolve view columns against the finished model
    fn finish(mut self) -> SchemaResult<SchemaModel> {
        if self.model.views.is_empty() {
            return Ok(self.model);
        }

        let catalog = self.model.to_catalog();
        let config = AnalyzerConfig {
            case_sensitive: self.names.is_case_sensitive(),
            ..AnalyzerConfig::default()
        };
        let database = self.model.database.clone().unwrap_or_default();
        let mut extractor = LineageExtractor::new(&catalog, database, &config);

        for view in self.model.views.values_mut() {
            let fields = extractor.extract(&view.header.body)?;
            view.columns = if view.header.columns.is_empty() {
                fields.into_iter().map(|f| f.name).collect()
            } else {
                view.header.columns.clone()
            };
            if view.columns.is_empty() {
                return Err(SchemaError::ViewWithoutColumns {
                    view: view.name.clone(),
                    definition: view.header.body.clone(),
                });
            }
            log::debug!("View `{}` resolves to {} columns", view.name, view.columns.len());
        }
        Ok(self.model)
    }
}

/// Find the object keyword of a CREATE statement and its index
fn create_target(lx: &[Lexeme<'_>]) -> Option<(CreateTarget, usize)> {
    let mut temporary = false;
    let mut i = 1;
    while let Some(l) = lx.get(i) {
        let target = if l.is_keyword("TABLE") {
            Some(CreateTarget::Table { temporary })
        } else if l.is_keyword("INDEX") {
            Some(CreateTarget::Index)
        } else if l.is_keyword("FUNCTION") {
            Some(CreateTarget::Routine(RoutineKind::Function))
        } else if l.is_keyword("PROCEDURE") {
            Some(CreateTarget::Routine(RoutineKind::Procedure))
        } else if l.is_keyword("EVENT") {
            Some(CreateTarget::Routine(RoutineKind::Event))
        } else if l.is_keyword("TRIGGER") {
            Some(CreateTarget::Routine(RoutineKind::Trigger))
        } else {
            None
        };
        if let Some(target) = target {
            return Some((target, i));
        }

        if l.is_keyword("DEFINER") {
            i = skip_definer(lx, i + 1);
        } else if HEADER_WORDS.iter().any(|kw| l.is_keyword(kw)) {
            temporary |= l.is_keyword("TEMPORARY");
            i += 1;
        } else {
            return None;
        }
    }
    None
}

/// Index past `= user[@host]` or `= CURRENT_USER[()]`
fn skip_definer(lx: &[Lexeme<'_>], at: usize) -> usize {
    let mut i = at;
    if lx.get(i).is_some_and(|l| l.is_punct('=')) {
        i += 1;
    }
    i += 1;
    while lx.get(i).is_some_and(|l| l.is_punct('@')) {
        i += 2;
    }
    let is = |j: usize, c: char| lx.get(j).is_some_and(|l| l.is_punct(c));
    if is(i, '(') && is(i + 1, ')') {
        i += 2;
    }
    i
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
