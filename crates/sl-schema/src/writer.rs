//! Migration script writer
//!
//! Renders a [`DiffNode`] phase by phase. Within a phase statements are
//! sorted so the output never depends on map iteration order; added and
//! modified columns keep the computed order because their position clauses
//! build on each other.

use sl_core::{quote_identifier, AnalyzerConfig};

use crate::differ::{ColumnChange, DiffNode};
use crate::model::{ColumnPosition, RoutineDef, TableDef, ViewDef};

const DISABLE_FOREIGN_KEY_CHECKS: &str = "SET FOREIGN_KEY_CHECKS=0;\n\n";
const ENABLE_FOREIGN_KEY_CHECKS: &str = "SET FOREIGN_KEY_CHECKS=1;\n";

/// Render `node` as a script of `;`-terminated statements separated by blank
/// lines. An empty node renders as an empty string.
pub fn write_script(node: &DiffNode, config: &AnalyzerConfig) -> String {
    let mut script = Script::default();

    for (routines, keyword) in [
        (&node.drop_functions, "FUNCTION"),
        (&node.drop_procedures, "PROCEDURE"),
        (&node.drop_events, "EVENT"),
        (&node.drop_triggers, "TRIGGER"),
    ] {
        for routine in sorted_routines(routines) {
            script.push(format!(
                "DROP {keyword} IF EXISTS {};",
                quote_identifier(&routine.name)
            ));
        }
    }

    for fk in sorted_by(&node.drop_foreign_keys, |f| (f.table.clone(), f.name.clone())) {
        script.push(format!(
            "ALTER TABLE {} DROP FOREIGN KEY {};",
            quote_identifier(&fk.table),
            quote_identifier(&fk.name)
        ));
    }
    for check in sorted_by(&node.drop_checks, |c| (c.table.clone(), c.name.clone())) {
        script.push(format!(
            "ALTER TABLE {} DROP CHECK {};",
            quote_identifier(&check.table),
            quote_identifier(&check.name)
        ));
    }
    for pk in sorted_by(&node.drop_primary_keys, |p| p.table.clone()) {
        script.push(format!(
            "ALTER TABLE {} DROP PRIMARY KEY;",
            quote_identifier(&pk.table)
        ));
    }
    for index in sorted_by(&node.drop_indexes, |i| (i.table.clone(), i.name.clone())) {
        script.push(drop_index(&index.name, &index.table));
    }
    for index in sorted_by(&node.drop_index_constraints, |i| {
        (i.table.clone(), i.name.clone())
    }) {
        script.push(drop_index(&index.name, &index.table));
    }
    for view in sorted_by(&node.drop_views, |v| v.name.clone()) {
        script.push(format!("DROP VIEW IF EXISTS {};", quote_identifier(&view.name)));
    }
    for table in sorted_by(&node.drop_tables, |t| t.id) {
        script.push(format!("DROP TABLE IF EXISTS {};", quote_identifier(&table.name)));
    }

    for table in sorted_by(&node.create_tables, |t| t.name.clone()) {
        script.push(create_table(table));
    }
    for option in sorted_by(&node.alter_table_options, |o| o.table.clone()) {
        script.push(option.statement.clone());
    }
    for change in &node.add_columns {
        script.push(alter_column("ADD", change));
    }
    for change in &node.modify_columns {
        script.push(alter_column("MODIFY", change));
    }
    for column in sorted_by(&node.drop_columns, |c| format!("{}.{}", c.table, c.name)) {
        script.push(format!(
            "ALTER TABLE {} DROP COLUMN {};",
            quote_identifier(&column.table),
            quote_identifier(&column.name)
        ));
    }

    for view in sorted_by(&node.create_stub_views, |v| v.name.clone()) {
        script.push(stub_view(view, config));
    }
    for index in sorted_by(&node.create_indexes, |i| (i.table.clone(), i.name.clone())) {
        script.push(format!("{};", index.definition));
    }
    for index in sorted_by(&node.create_index_constraints, |i| {
        (i.table.clone(), i.name.clone())
    }) {
        let category = index
            .category
            .as_deref()
            .map(|c| format!("{c} "))
            .unwrap_or_default();
        script.push(format!(
            "CREATE {category}INDEX {} ON {} {}{}{};",
            quote_identifier(&index.name),
            quote_identifier(&index.table),
            index.key_list,
            prefixed(index.index_type.as_deref().unwrap_or_default()),
            prefixed(&index.options)
        ));
    }
    for pk in sorted_by(&node.create_primary_keys, |p| p.table.clone()) {
        script.push(format!(
            "ALTER TABLE {} ADD PRIMARY KEY {}{};",
            quote_identifier(&pk.table),
            pk.key_list,
            prefixed(&pk.options)
        ));
    }
    for check in sorted_by(&node.add_checks, |c| (c.table.clone(), c.name.clone())) {
        script.push(format!(
            "ALTER TABLE {} ADD {};",
            quote_identifier(&check.table),
            check.definition
        ));
    }
    for fk in sorted_by(&node.add_foreign_keys, |f| (f.table.clone(), f.name.clone())) {
        script.push(format!(
            "ALTER TABLE {} ADD {};",
            quote_identifier(&fk.table),
            fk.definition
        ));
    }
    for change in sorted_by(&node.alter_partitions, |p| p.table.clone()) {
        script.push(format!(
            "ALTER TABLE {} {};",
            quote_identifier(&change.table),
            change.partition
        ));
    }
    for view in sorted_by(&node.create_views, |v| v.name.clone()) {
        script.push(create_view(view, config));
    }

    for routines in [
        &node.create_functions,
        &node.create_procedures,
        &node.create_events,
        &node.create_triggers,
    ] {
        for routine in sorted_routines(routines) {
            script.push_block(format!(
                "DELIMITER ;;\n{};;\nDELIMITER ;\n\n",
                routine.definition
            ));
        }
    }

    script.finish(config.foreign_key_checks_pragmas)
}

#[derive(Default)]
struct Script {
    body: String,
}

impl Script {
    fn push(&mut self, statement: String) {
        self.body.push_str(&statement);
        self.body.push_str("\n\n");
    }

    /// Append text that already carries its own separator
    fn push_block(&mut self, block: String) {
        self.body.push_str(&block);
    }

    fn finish(self, pragmas: bool) -> String {
        if self.body.is_empty() || !pragmas {
            return self.body;
        }
        format!(
            "{DISABLE_FOREIGN_KEY_CHECKS}{}{ENABLE_FOREIGN_KEY_CHECKS}",
            self.body
        )
    }
}

fn sorted_by<T, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| key(item));
    sorted
}

fn sorted_routines(routines: &[RoutineDef]) -> Vec<&RoutineDef> {
    sorted_by(routines, |r| r.name.clone())
}

/// ` text`, or nothing for empty text
fn prefixed(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!(" {text}")
    }
}

fn drop_index(name: &str, table: &str) -> String {
    format!(
        "DROP INDEX {} ON {};",
        quote_identifier(name),
        quote_identifier(table)
    )
}

/// CREATE TABLE as written, made idempotent with `IF NOT EXISTS`
fn create_table(table: &TableDef) -> String {
    const HEAD: &str = "CREATE TABLE";
    let definition = &table.definition;
    match definition.get(..HEAD.len()) {
        Some(head) if head.eq_ignore_ascii_case(HEAD) => {
            let rest = &definition[HEAD.len()..];
            let guarded = rest
                .trim_start()
                .get(..3)
                .is_some_and(|w| w.eq_ignore_ascii_case("IF "));
            if guarded {
                format!("{definition};")
            } else {
                format!("{head} IF NOT EXISTS{rest};")
            }
        }
        _ => format!("{definition};"),
    }
}

fn alter_column(verb: &str, change: &ColumnChange) -> String {
    let position = match &change.position {
        Some(ColumnPosition::First) => " FIRST".to_string(),
        Some(ColumnPosition::After(column)) => format!(" AFTER {}", quote_identifier(column)),
        None => String::new(),
    };
    format!(
        "ALTER TABLE {} {verb} COLUMN {}{position};",
        quote_identifier(&change.column.table),
        change.column.definition
    )
}

/// `CREATE OR REPLACE ... VIEW` header, falling back to configured defaults
fn view_header(view: &ViewDef, config: &AnalyzerConfig) -> String {
    let header = &view.header;
    let columns = if header.columns.is_empty() {
        String::new()
    } else {
        let quoted: Vec<String> = header.columns.iter().map(|c| quote_identifier(c)).collect();
        format!(" ({})", quoted.join(", "))
    };
    format!(
        "CREATE OR REPLACE ALGORITHM={} DEFINER={} SQL SECURITY {} VIEW {}{columns}",
        header.algorithm.as_deref().unwrap_or(&config.views.algorithm),
        header.definer.as_deref().unwrap_or(&config.views.definer),
        header.security.as_deref().unwrap_or(&config.views.security),
        quote_identifier(&view.name)
    )
}

/// Placeholder projecting the view's column names, replaced later by the
/// real definition
fn stub_view(view: &ViewDef, config: &AnalyzerConfig) -> String {
    let select: Vec<String> = view
        .columns
        .iter()
        .map(|c| format!("1 AS {}", quote_identifier(c)))
        .collect();
    format!(
        "{} AS SELECT SQL_NO_CACHE {};",
        view_header(view, config),
        select.join(", ")
    )
}

fn create_view(view: &ViewDef, config: &AnalyzerConfig) -> String {
    let check = view
        .header
        .check_option
        .as_deref()
        .map(|c| format!(" WITH {c}"))
        .unwrap_or_default();
    format!(
        "{} AS {}{check};",
        view_header(view, config),
        view.header.body
    )
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
