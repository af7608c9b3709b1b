//! Query-level evaluation: WITH → body (set operations, VALUES, TABLE)

use super::select::split_table_name;
use super::LineageExtractor;
use crate::error::{AnalysisError, AnalysisResult};
use crate::field::FieldInfo;
use sqlparser::ast::{Query, SetExpr, Table, Values};

impl LineageExtractor<'_> {
    /// Evaluate a query; CTEs it declares are visible only inside it.
    pub(crate) fn eval_query(&mut self, query: &Query) -> AnalysisResult<Vec<FieldInfo>> {
        let depth = self.scope.cte_depth();
        let result = self.eval_query_in_frame(query);
        self.scope.truncate_ctes(depth);
        result
    }

    fn eval_query_in_frame(&mut self, query: &Query) -> AnalysisResult<Vec<FieldInfo>> {
        if let Some(with) = &query.with {
            self.push_ctes(with)?;
        }
        // ORDER BY and LIMIT do not change lineage
        self.eval_set_expr(&query.body)
    }

    pub(crate) fn eval_set_expr(&mut self, body: &SetExpr) -> AnalysisResult<Vec<FieldInfo>> {
        match body {
            SetExpr::Select(select) => self.eval_select(select),
            SetExpr::Query(query) => self.eval_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                let left = self.eval_set_expr(left)?;
                let right = self.eval_set_expr(right)?;
                join_branches(left, &right)
            }
            SetExpr::Values(values) => self.eval_values(values),
            SetExpr::Table(table) => self.eval_explicit_table(table),
            SetExpr::Insert(_) | SetExpr::Update(_) => Err(AnalysisError::UnsupportedConstruct(
                "data-modifying statement in query body".to_string(),
            )),
        }
    }

    /// `VALUES ROW(...), ...`: columns named after the first row's
    /// expressions
    fn eval_values(&mut self, values: &Values) -> AnalysisResult<Vec<FieldInfo>> {
        let Some(first) = values.rows.first() else {
            return Ok(Vec::new());
        };
        let mut fields = Vec::with_capacity(first.len());
        for expr in first {
            let masking = self.eval_expr(expr)?;
            fields.push(FieldInfo::new(expr.to_string(), masking));
        }
        Ok(fields)
    }

    /// `TABLE t`
    fn eval_explicit_table(&mut self, table: &Table) -> AnalysisResult<Vec<FieldInfo>> {
        let parts: Vec<String> = table
            .schema_name
            .iter()
            .chain(table.table_name.iter())
            .cloned()
            .collect();
        let (database, name) = split_table_name(&parts);
        let (database, resolved) = self.find_table(database, name)?;
        Ok(resolved.fields_as(&resolved.name, &database))
    }
}

/// Join two set-operation branches column by column; the left side names
/// the result.
pub(crate) fn join_branches(
    mut left: Vec<FieldInfo>,
    right: &[FieldInfo],
) -> AnalysisResult<Vec<FieldInfo>> {
    if left.len() != right.len() {
        return Err(AnalysisError::SetOperationArity {
            left: left.len(),
            right: right.len(),
        });
    }
    for (l, r) in left.iter_mut().zip(right) {
        l.masking.transmitted_by(&r.masking);
    }
    Ok(left)
}
