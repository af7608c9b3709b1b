//! Schema differ
//!
//! [`DiffNode`] holds one list per kind of change. The field order is the
//! order the writer emits them in: dependents are dropped before what they
//! depend on, and base objects are created before anything that references
//! them. Each logical object lands in at most one drop list and one create
//! list per run.

use std::collections::BTreeMap;

use sl_core::AnalyzerConfig;

use crate::builder::build_schema;
use crate::ddl::canonical;
use crate::error::SchemaResult;
use crate::model::{
    CheckDef, ColumnDef, ColumnPosition, ForeignKeyDef, IndexConstraintDef, IndexDef,
    PrimaryKeyDef, RoutineDef, SchemaModel, TableDef, ViewDef,
};
use crate::table_options::DEFAULTED_OPTIONS;
use crate::writer::write_script;

/// Diff two schema dumps into a migration script.
///
/// Returns an empty string when the schemas are equivalent.
pub fn diff(old: &str, new: &str, case_insensitive: bool) -> SchemaResult<String> {
    let config = AnalyzerConfig {
        case_sensitive: !case_insensitive,
        ..AnalyzerConfig::default()
    };
    diff_with_config(old, new, &config)
}

/// Diff two schema dumps using `config` for name comparison and output
pub fn diff_with_config(old: &str, new: &str, config: &AnalyzerConfig) -> SchemaResult<String> {
    let names = config.name_comparison();
    let old = build_schema(old, names)?;
    let new = build_schema(new, names)?;
    let node = DiffNode::compute(&old, &new);
    Ok(write_script(&node, config))
}

/// A column to add or modify, with its target position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    pub column: ColumnDef,
    /// `None` keeps the column where ADD / MODIFY leaves it
    pub position: Option<ColumnPosition>,
}

/// One `ALTER TABLE` statement setting or resetting a table option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptionChange {
    pub table: String,
    pub statement: String,
}

/// A table whose `PARTITION BY` clause changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionChange {
    pub table: String,
    pub partition: String,
}

/// Changes between two schema models, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffNode {
    pub drop_functions: Vec<RoutineDef>,
    pub drop_procedures: Vec<RoutineDef>,
    pub drop_events: Vec<RoutineDef>,
    pub drop_triggers: Vec<RoutineDef>,

    pub drop_foreign_keys: Vec<ForeignKeyDef>,
    pub drop_checks: Vec<CheckDef>,
    pub drop_primary_keys: Vec<PrimaryKeyDef>,
    pub drop_indexes: Vec<IndexDef>,
    pub drop_index_constraints: Vec<IndexConstraintDef>,
    pub drop_views: Vec<ViewDef>,
    pub drop_tables: Vec<TableDef>,

    pub create_tables: Vec<TableDef>,
    pub alter_table_options: Vec<TableOptionChange>,
    /// In new-table column order
    pub add_columns: Vec<ColumnChange>,
    /// In new-table column order; may repeat an added column whose anchor
    /// moved afterwards
    pub modify_columns: Vec<ColumnChange>,
    pub drop_columns: Vec<ColumnDef>,

    pub create_stub_views: Vec<ViewDef>,
    pub create_indexes: Vec<IndexDef>,
    pub create_index_constraints: Vec<IndexConstraintDef>,
    pub create_primary_keys: Vec<PrimaryKeyDef>,
    pub add_checks: Vec<CheckDef>,
    pub add_foreign_keys: Vec<ForeignKeyDef>,
    pub alter_partitions: Vec<PartitionChange>,
    pub create_views: Vec<ViewDef>,

    pub create_functions: Vec<RoutineDef>,
    pub create_procedures: Vec<RoutineDef>,
    pub create_events: Vec<RoutineDef>,
    pub create_triggers: Vec<RoutineDef>,
}

impl DiffNode {
    /// Compute the changes turning `old` into `new`.
    ///
    /// Both models must have been built with the same name comparison.
    pub fn compute(old: &SchemaModel, new: &SchemaModel) -> Self {
        let mut node = DiffNode::default();
        node.diff_tables(old, new);
        node.diff_views(old, new);

        diff_map(
            &old.functions,
            &new.functions,
            same_routine,
            &mut node.drop_functions,
            &mut node.create_functions,
        );
        diff_map(
            &old.procedures,
            &new.procedures,
            same_routine,
            &mut node.drop_procedures,
            &mut node.create_procedures,
        );
        diff_map(
            &old.events,
            &new.events,
            same_routine,
            &mut node.drop_events,
            &mut node.create_events,
        );
        diff_map(
            &old.triggers,
            &new.triggers,
            same_routine,
            &mut node.drop_triggers,
            &mut node.create_triggers,
        );
        node
    }

    /// True when no list holds a change
    pub fn is_empty(&self) -> bool {
        *self == DiffNode::default()
    }

    fn diff_tables(&mut self, old: &SchemaModel, new: &SchemaModel) {
        for (key, table) in &new.tables {
            match old.tables.get(key) {
                Some(previous) => self.diff_table(previous, table),
                None => {
                    self.create_tables.push(table.clone());
                    self.create_indexes.extend(table.indexes.values().cloned());
                }
            }
        }
        for (key, table) in &old.tables {
            if !new.tables.contains_key(key) {
                self.drop_tables.push(table.clone());
            }
        }
    }

    fn diff_table(&mut self, old: &TableDef, new: &TableDef) {
        self.diff_columns(old, new);
        diff_map(
            &old.indexes,
            &new.indexes,
            |o, n| o.canonical == n.canonical,
            &mut self.drop_indexes,
            &mut self.create_indexes,
        );
        self.diff_primary_key(old, new);
        diff_map(
            &old.index_constraints,
            &new.index_constraints,
            |o, n| o.name == n.name && o.canonical == n.canonical,
            &mut self.drop_index_constraints,
            &mut self.create_index_constraints,
        );
        diff_map(
            &old.foreign_keys,
            &new.foreign_keys,
            |o, n| o.canonical == n.canonical,
            &mut self.drop_foreign_keys,
            &mut self.add_foreign_keys,
        );
        diff_map(
            &old.checks,
            &new.checks,
            |o, n| o.canonical == n.canonical,
            &mut self.drop_checks,
            &mut self.add_checks,
        );
        self.diff_options(old, new);
        self.diff_partition(old, new);
    }

    /// Column adds, moves and drops.
    ///
    /// Positions are computed by replaying the emitted ADD and MODIFY steps
    /// against the old column order, so the result matches `new` exactly.
    fn diff_columns(&mut self, old: &TableDef, new: &TableDef) {
        let mut order: Vec<String> = old.columns.iter().map(|c| c.name.to_lowercase()).collect();

        for (idx, column) in new.columns.iter().enumerate() {
            if old.column(&column.name).is_some() {
                continue;
            }
            // Appending needs no position clause
            let appended = new.columns[idx + 1..]
                .iter()
                .all(|c| old.column(&c.name).is_none());
            let position = (!appended).then(|| position_at(new, idx));
            place(&mut order, &column.name, position.as_ref());
            self.add_columns.push(ColumnChange {
                column: column.clone(),
                position,
            });
        }

        for (idx, column) in new.columns.iter().enumerate() {
            let wanted = idx
                .checked_sub(1)
                .map(|before| new.columns[before].name.to_lowercase());
            let current = predecessor(&order, &column.name, |n| new.column(n).is_some());
            let changed = old
                .column(&column.name)
                .is_some_and(|previous| previous.canonical != column.canonical);

            if current != wanted {
                let position = position_at(new, idx);
                place(&mut order, &column.name, Some(&position));
                self.modify_columns.push(ColumnChange {
                    column: column.clone(),
                    position: Some(position),
                });
            } else if changed {
                self.modify_columns.push(ColumnChange {
                    column: column.clone(),
                    position: None,
                });
            }
        }

        for column in &old.columns {
            if new.column(&column.name).is_none() {
                self.drop_columns.push(column.clone());
            }
        }
    }

    fn diff_primary_key(&mut self, old: &TableDef, new: &TableDef) {
        match (&old.primary_key, &new.primary_key) {
            (Some(o), Some(n)) if o.columns == n.columns && o.canonical == n.canonical => {}
            (o, n) => {
                self.drop_primary_keys.extend(o.clone());
                self.create_primary_keys.extend(n.clone());
            }
        }
    }

    fn diff_options(&mut self, old: &TableDef, new: &TableDef) {
        for (name, option) in &old.options {
            if new.options.contains_key(name) {
                continue;
            }
            let reset = if DEFAULTED_OPTIONS.contains(&name.as_str()) {
                None
            } else {
                option.reset_statement()
            };
            match reset {
                Some(statement) => self.alter_table_options.push(TableOptionChange {
                    table: new.name.clone(),
                    statement,
                }),
                None => log::debug!(
                    "Table option {} removed from `{}` is left at its current value",
                    name,
                    new.name
                ),
            }
        }

        for (name, option) in &new.options {
            let unchanged = old
                .options
                .get(name)
                .is_some_and(|o| canonical(&o.value) == canonical(&option.value));
            if !unchanged {
                self.alter_table_options.push(TableOptionChange {
                    table: new.name.clone(),
                    statement: option.alter_statement(),
                });
            }
        }
    }

    fn diff_partition(&mut self, old: &TableDef, new: &TableDef) {
        match (&old.partition, &new.partition) {
            (_, Some(n)) if old.partition.as_deref().map(canonical) != Some(canonical(n)) => {
                self.alter_partitions.push(PartitionChange {
                    table: new.name.clone(),
                    partition: n.clone(),
                });
            }
            (Some(_), None) => {
                log::debug!("Not removing partitioning from `{}`", new.name);
            }
            _ => {}
        }
    }

    fn diff_views(&mut self, old: &SchemaModel, new: &SchemaModel) {
        for (key, view) in &new.views {
            match old.views.get(key) {
                Some(previous) if previous.canonical == view.canonical => {}
                Some(_) => self.create_views.push(view.clone()),
                None => {
                    // Stand-in so views created earlier in the script can
                    // reference this one by name
                    if !view.columns.is_empty() {
                        self.create_stub_views.push(view.clone());
                    }
                    self.create_views.push(view.clone());
                }
            }
        }
        for (key, view) in &old.views {
            if !new.views.contains_key(key) {
                self.drop_views.push(view.clone());
            }
        }
    }
}

/// `FIRST` for the first column, otherwise `AFTER` its predecessor
fn position_at(table: &TableDef, idx: usize) -> ColumnPosition {
    match idx.checked_sub(1) {
        Some(before) => ColumnPosition::After(table.columns[before].name.clone()),
        None => ColumnPosition::First,
    }
}

/// Move or insert `name` in `order` the way ADD / MODIFY COLUMN would
fn place(order: &mut Vec<String>, name: &str, position: Option<&ColumnPosition>) {
    let name = name.to_lowercase();
    order.retain(|n| *n != name);
    let at = match position {
        None => order.len(),
        Some(ColumnPosition::First) => 0,
        Some(ColumnPosition::After(before)) => {
            let before = before.to_lowercase();
            order
                .iter()
                .position(|n| *n == before)
                .map_or(order.len(), |i| i + 1)
        }
    };
    order.insert(at, name);
}

/// Nearest column ahead of `name` in `order` that `keep` accepts
fn predecessor(order: &[String], name: &str, keep: impl Fn(&str) -> bool) -> Option<String> {
    let name = name.to_lowercase();
    let at = order.iter().position(|n| *n == name)?;
    order[..at].iter().rev().find(|n| keep(n.as_str())).cloned()
}

fn same_routine(o: &RoutineDef, n: &RoutineDef) -> bool {
    o.canonical == n.canonical
}

/// Replace changed entries, create new ones, drop vanished ones
fn diff_map<T: Clone>(
    old: &BTreeMap<String, T>,
    new: &BTreeMap<String, T>,
    same: impl Fn(&T, &T) -> bool,
    drops: &mut Vec<T>,
    creates: &mut Vec<T>,
) {
    for (key, item) in new {
        match old.get(key) {
            Some(previous) if same(previous, item) => {}
            Some(previous) => {
                drops.push(previous.clone());
                creates.push(item.clone());
            }
            None => creates.push(item.clone()),
        }
    }
    for (key, item) in old {
        if !new.contains_key(key) {
            drops.push(item.clone());
        }
    }
}

#[cfg(test)]
#[path = "differ_test.rs"]
mod tests;
