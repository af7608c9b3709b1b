//! Common table expressions
//!
//! A non-recursive CTE is evaluated once. A recursive one is split into its
//! seed branches (those before the first branch that names the CTE) and its
//! recursive branches; the recursive branches are re-evaluated against the
//! running column attributes until a pass changes nothing.

use std::ops::ControlFlow;

use super::query::join_branches;
use super::{rename_fields, LineageExtractor};
use crate::error::{AnalysisError, AnalysisResult};
use crate::field::{FieldInfo, PseudoTable};
use sl_core::{MaskingLevel, NameComparison};
use sqlparser::ast::{Cte, ObjectName, SetExpr, Visit, Visitor, With};

impl LineageExtractor<'_> {
    /// Evaluate each CTE of `with` in order and make it visible to the
    /// following siblings and the main query.
    pub(crate) fn push_ctes(&mut self, with: &With) -> AnalysisResult<()> {
        for cte in &with.cte_tables {
            let table = if with.recursive {
                self.eval_recursive_cte(cte)?
            } else {
                self.eval_cte(cte)?
            };
            self.scope.push_cte(table);
        }
        Ok(())
    }

    fn eval_cte(&mut self, cte: &Cte) -> AnalysisResult<PseudoTable> {
        let name = cte.alias.name.value.clone();
        let mut fields = self.eval_query(&cte.query)?;
        rename_fields(&mut fields, &declared_columns(cte), &name)?;
        Ok(PseudoTable::new(name, fields))
    }

    fn eval_recursive_cte(&mut self, cte: &Cte) -> AnalysisResult<PseudoTable> {
        let depth = self.scope.cte_depth();
        let result = self.eval_recursive_cte_in_frame(cte);
        self.scope.truncate_ctes(depth);
        result
    }

    fn eval_recursive_cte_in_frame(&mut self, cte: &Cte) -> AnalysisResult<PseudoTable> {
        let name = cte.alias.name.value.clone();
        if let Some(with) = &cte.query.with {
            self.push_ctes(with)?;
        }

        let mut branches = Vec::new();
        flatten_branches(&cte.query.body, &mut branches);
        let first_recursive = branches
            .iter()
            .position(|b| references_table(b, &name, self.names))
            .unwrap_or(branches.len());
        let (seed, recursive) = branches.split_at(first_recursive);

        let initial = self.eval_branches(seed)?;
        let declared = declared_columns(cte);
        let mut table = if declared.is_empty() {
            PseudoTable::new(name.clone(), initial)
        } else {
            if declared.len() != initial.len() {
                return Err(AnalysisError::RecursiveCteArity { cte: name });
            }
            let columns = declared
                .into_iter()
                .zip(initial)
                .map(|(column, field)| FieldInfo::new(column, field.masking))
                .collect();
            PseudoTable::new(name.clone(), columns)
        };

        if recursive.is_empty() {
            return Ok(table);
        }

        let limit = self.fixpoint_limit(table.columns.len());
        self.scope.push_cte(table.clone());
        for iteration in 1..=limit {
            let fields = self.eval_branches(recursive)?;
            if fields.len() != table.columns.len() {
                return Err(AnalysisError::RecursiveCteArity { cte: name });
            }

            let mut changed = false;
            for (column, field) in table.columns.iter_mut().zip(&fields) {
                changed |= column.masking.transmitted_by(&field.masking);
            }
            if !changed {
                log::debug!(
                    "Recursive CTE '{}' converged after {} iteration(s)",
                    name,
                    iteration
                );
                return Ok(table);
            }
            self.scope.replace_innermost_cte(table.clone());
        }

        Err(AnalysisError::FixpointLimit { cte: name, limit })
    }

    /// Evaluate branches of one UNION chain and join them pairwise
    fn eval_branches(&mut self, branches: &[&SetExpr]) -> AnalysisResult<Vec<FieldInfo>> {
        let mut result: Option<Vec<FieldInfo>> = None;
        for branch in branches {
            let fields = self.eval_set_expr(branch)?;
            result = Some(match result {
                None => fields,
                Some(acc) => join_branches(acc, &fields)?,
            });
        }
        Ok(result.unwrap_or_default())
    }

    /// Configured cap, or enough passes for every column to climb the
    /// whole lattice one step at a time
    fn fixpoint_limit(&self, columns: usize) -> usize {
        self.max_cte_iterations
            .unwrap_or_else(|| columns * usize::from(MaskingLevel::MAX.rank()) + 1)
            .max(1)
    }
}

fn declared_columns(cte: &Cte) -> Vec<String> {
    cte.alias
        .columns
        .iter()
        .map(|c| c.name.value.clone())
        .collect()
}

/// Leaves of a set-operation tree, left to right
fn flatten_branches<'q>(body: &'q SetExpr, out: &mut Vec<&'q SetExpr>) {
    match body {
        SetExpr::SetOperation { left, right, .. } => {
            flatten_branches(left, out);
            flatten_branches(right, out);
        }
        other => out.push(other),
    }
}

struct RelationFinder<'n> {
    name: &'n str,
    names: NameComparison,
}

impl Visitor for RelationFinder<'_> {
    type Break = ();

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        match relation.0.as_slice() {
            [only] if self.names.matches(&only.value, self.name) => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Whether `branch` reads the unqualified table `name` anywhere
fn references_table(branch: &SetExpr, name: &str, names: NameComparison) -> bool {
    if let SetExpr::Table(table) = branch {
        if table.schema_name.is_none()
            && table
                .table_name
                .as_deref()
                .is_some_and(|t| names.matches(t, name))
        {
            return true;
        }
    }
    let mut finder = RelationFinder { name, names };
    branch.visit(&mut finder).is_break()
}

#[cfg(test)]
#[path = "cte_test.rs"]
mod tests;
