//! Expression evaluation
//!
//! An expression's attributes are the join of every column it references
//! and every subquery it contains. Column references resolve against the
//! correlated outer scopes (innermost first), then the current FROM list.

use std::ops::ControlFlow;

use super::LineageExtractor;
use crate::error::AnalysisResult;
use crate::field::FieldInfo;
use sl_core::{MaskingAttributes, NameComparison};
use sqlparser::ast::{Expr, Query, Visit, Visitor};

/// Column references and subqueries directly inside one expression.
///
/// References inside a subquery belong to that subquery and are not
/// collected.
#[derive(Default)]
struct ExprRefs {
    columns: Vec<Vec<String>>,
    subqueries: Vec<Query>,
    depth: usize,
}

impl Visitor for ExprRefs {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if self.depth == 0 {
            self.subqueries.push(query.clone());
        }
        self.depth += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.depth -= 1;
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if self.depth > 0 {
            return ControlFlow::Continue(());
        }
        match expr {
            Expr::Identifier(ident) => self.columns.push(vec![ident.value.clone()]),
            Expr::CompoundIdentifier(parts) => {
                self.columns
                    .push(parts.iter().map(|p| p.value.clone()).collect());
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

/// Name of a select item without an alias: the column name for a bare
/// column reference, otherwise the expression text.
pub(crate) fn output_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|p| p.value.clone())
            .unwrap_or_else(|| expr.to_string()),
        _ => expr.to_string(),
    }
}

impl LineageExtractor<'_> {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> AnalysisResult<MaskingAttributes> {
        let mut refs = ExprRefs::default();
        let _ = expr.visit(&mut refs);

        let mut attributes = MaskingAttributes::default();
        for parts in &refs.columns {
            let found = self.resolve_column(parts);
            attributes.transmitted_by_in_expression(&found);
            if attributes.is_never_change() {
                return Ok(attributes);
            }
        }
        for subquery in &refs.subqueries {
            let found = self.eval_subquery(subquery)?;
            attributes.transmitted_by_in_expression(&found);
            if attributes.is_never_change() {
                return Ok(attributes);
            }
        }
        Ok(attributes)
    }

    /// Evaluate a subquery expression with the current FROM list visible as
    /// an outer scope. The result is the join of all its columns.
    fn eval_subquery(&mut self, query: &Query) -> AnalysisResult<MaskingAttributes> {
        let outer_depth = self.scope.outer_depth();
        let from = self.scope.replace_from(Vec::new());
        self.scope.push_outer(&from);
        let result = self.eval_query(query);
        self.scope.truncate_outer(outer_depth);
        self.scope.restore_from(from);

        let mut attributes = MaskingAttributes::default();
        for field in result? {
            attributes.transmitted_by_in_expression(&field.masking);
            if attributes.is_never_change() {
                break;
            }
        }
        Ok(attributes)
    }

    /// Attributes of a possibly qualified column reference.
    ///
    /// An unresolved column yields the default attributes.
    fn resolve_column(&self, parts: &[String]) -> MaskingAttributes {
        let (database, table, column) = match parts {
            [column] => ("", "", column.as_str()),
            [table, column] => ("", table.as_str(), column.as_str()),
            [.., database, table, column] => (database.as_str(), table.as_str(), column.as_str()),
            [] => return MaskingAttributes::default(),
        };

        self.scope
            .outer_innermost_first()
            .chain(self.scope.from_fields())
            .find(|f| self.column_matches(f, database, table, column))
            .map(|f| f.masking)
            .unwrap_or_default()
    }

    fn column_matches(&self, field: &FieldInfo, database: &str, table: &str, column: &str) -> bool {
        let same_database = self.names.matches(database, &field.database)
            || (database.is_empty()
                && (field.database.is_empty()
                    || self.names.matches(&field.database, &self.current_database)));
        let same_table = table.is_empty() || self.names.matches(table, &field.table);
        // column names are never case-sensitive in MySQL
        let same_column = NameComparison::CaseInsensitive.matches(column, &field.name);
        same_database && same_table && same_column
    }

    /// Fields of the current FROM list matching `db.table.*` or `table.*`
    pub(crate) fn qualified_wildcard(&self, parts: &[String]) -> Vec<FieldInfo> {
        let (database, table) = match parts {
            [table] => ("", table.as_str()),
            [.., database, table] => (database.as_str(), table.as_str()),
            [] => return Vec::new(),
        };
        let current = self.current_database.as_str();

        self.scope
            .from_fields()
            .iter()
            .filter(|f| {
                let same_database = self.names.matches(&f.database, database)
                    || (database.is_empty() && self.names.matches(&f.database, current))
                    || (f.database.is_empty() && self.names.matches(current, database));
                same_database && self.names.matches(&f.table, table)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
