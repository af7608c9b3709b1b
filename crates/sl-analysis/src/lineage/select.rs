//! SELECT block evaluation: FROM clause, then projection

use super::expr::output_name;
use super::join::merge_join;
use super::{rename_fields, LineageExtractor};
use crate::error::{AnalysisError, AnalysisResult};
use crate::field::FieldInfo;
use sqlparser::ast::{
    JsonTableColumn, ObjectName, Select, SelectItem, TableAlias, TableFactor, TableWithJoins,
};

impl LineageExtractor<'_> {
    pub(crate) fn eval_select(&mut self, select: &Select) -> AnalysisResult<Vec<FieldInfo>> {
        let from = self.eval_from(&select.from)?;
        let saved = self.scope.replace_from(from);
        let result = self.eval_projection(&select.projection);
        self.scope.restore_from(saved);
        result
    }

    fn eval_projection(&mut self, projection: &[SelectItem]) -> AnalysisResult<Vec<FieldInfo>> {
        let mut fields = Vec::new();
        for item in projection {
            match item {
                SelectItem::Wildcard(_) => fields.extend_from_slice(self.scope.from_fields()),
                SelectItem::QualifiedWildcard(name, _) => {
                    fields.extend(self.qualified_wildcard(&name_parts(name)));
                }
                SelectItem::UnnamedExpr(expr) => {
                    let masking = self.eval_expr(expr)?;
                    fields.push(FieldInfo::new(output_name(expr), masking));
                }
                SelectItem::ExprWithAlias { expr, alias } => {
                    let masking = self.eval_expr(expr)?;
                    fields.push(FieldInfo::new(alias.value.clone(), masking));
                }
            }
        }
        Ok(fields)
    }

    /// Comma-separated FROM items concatenate
    fn eval_from(&mut self, from: &[TableWithJoins]) -> AnalysisResult<Vec<FieldInfo>> {
        let mut fields = Vec::new();
        for item in from {
            let item_fields = self.eval_table_with_joins(item, &fields)?;
            fields.extend(item_fields);
        }
        Ok(fields)
    }

    /// `preceding` holds the fields of earlier FROM items, visible to
    /// `LATERAL` derived tables and `JSON_TABLE`.
    fn eval_table_with_joins(
        &mut self,
        item: &TableWithJoins,
        preceding: &[FieldInfo],
    ) -> AnalysisResult<Vec<FieldInfo>> {
        let mut fields = self.eval_table_factor(&item.relation, preceding)?;
        for join in &item.joins {
            let mut visible = preceding.to_vec();
            visible.extend_from_slice(&fields);
            let right = self.eval_table_factor(&join.relation, &visible)?;
            fields = merge_join(fields, right, &join.join_operator);
        }
        Ok(fields)
    }

    fn eval_table_factor(
        &mut self,
        factor: &TableFactor,
        preceding: &[FieldInfo],
    ) -> AnalysisResult<Vec<FieldInfo>> {
        match factor {
            TableFactor::Table {
                name, alias, args, ..
            } if args.is_none() => {
                let parts = name_parts(name);
                if let [single] = parts.as_slice() {
                    if single.eq_ignore_ascii_case("dual")
                        && self.scope.find_cte(single, self.names).is_none()
                    {
                        return Ok(Vec::new());
                    }
                }
                let (database, table) = split_table_name(&parts);
                let (database, resolved) = self.find_table(database, table)?;
                let visible_name = alias
                    .as_ref()
                    .map(|a| a.name.value.clone())
                    .unwrap_or_else(|| resolved.name.clone());
                Ok(resolved.fields_as(&visible_name, &database))
            }
            TableFactor::Derived {
                lateral,
                subquery,
                alias,
            } => {
                let outer_depth = self.scope.outer_depth();
                if *lateral {
                    self.scope.push_outer(preceding);
                }
                let result = self.eval_query(subquery);
                self.scope.truncate_outer(outer_depth);
                let mut fields = result?;
                apply_alias(&mut fields, alias.as_ref())?;
                Ok(fields)
            }
            TableFactor::NestedJoin {
                table_with_joins,
                alias,
            } => {
                let mut fields = self.eval_table_with_joins(table_with_joins, preceding)?;
                apply_alias(&mut fields, alias.as_ref())?;
                Ok(fields)
            }
            TableFactor::JsonTable {
                json_expr,
                columns,
                alias,
                ..
            } => {
                let outer_depth = self.scope.outer_depth();
                self.scope.push_outer(preceding);
                let result = self.eval_expr(json_expr);
                self.scope.truncate_outer(outer_depth);
                let masking = result?;

                let table = alias
                    .as_ref()
                    .map(|a| a.name.value.clone())
                    .unwrap_or_else(|| json_expr.to_string());
                let mut names = Vec::new();
                json_table_columns(columns, &mut names);
                Ok(names
                    .into_iter()
                    .map(|name| FieldInfo::in_table(name, table.as_str(), "", masking))
                    .collect())
            }
            other => {
                log::warn!("Cannot derive columns for table factor `{}`", other);
                Err(AnalysisError::UnsupportedConstruct(format!(
                    "table factor `{}`",
                    other
                )))
            }
        }
    }
}

pub(crate) fn name_parts(name: &ObjectName) -> Vec<String> {
    name.0.iter().map(|i| i.value.clone()).collect()
}

/// `(database, table)` from a dotted name; database is empty when absent
pub(crate) fn split_table_name(parts: &[String]) -> (&str, &str) {
    match parts {
        [table] => ("", table.as_str()),
        [.., database, table] => (database.as_str(), table.as_str()),
        [] => ("", ""),
    }
}

/// A derived-table or nested-join alias renames the table and, with a
/// column list, the columns.
fn apply_alias(fields: &mut [FieldInfo], alias: Option<&TableAlias>) -> AnalysisResult<()> {
    let Some(alias) = alias else {
        return Ok(());
    };
    for field in fields.iter_mut() {
        field.table = alias.name.value.clone();
    }
    let columns: Vec<String> = alias.columns.iter().map(|c| c.name.value.clone()).collect();
    rename_fields(fields, &columns, &alias.name.value)
}

/// Output column names of a `COLUMNS(...)` clause, nested paths flattened
fn json_table_columns(columns: &[JsonTableColumn], out: &mut Vec<String>) {
    for column in columns {
        match column {
            JsonTableColumn::Named(named) => out.push(named.name.value.clone()),
            JsonTableColumn::ForOrdinality(name) => out.push(name.value.clone()),
            JsonTableColumn::Nested(nested) => json_table_columns(&nested.columns, out),
        }
    }
}
