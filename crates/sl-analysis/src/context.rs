//! Scope carried through one lineage evaluation
//!
//! Three pieces of state cross recursive calls: the FROM field list of the
//! query block being projected, the CTEs visible at this point (innermost
//! last), and the field lists of enclosing query blocks that a correlated
//! subquery may refer to (innermost last). Every change is paired with a
//! restore by the caller that made it.

use crate::field::{FieldInfo, PseudoTable};
use sl_core::NameComparison;

#[derive(Debug, Default)]
pub(crate) struct Scope {
    from: Vec<FieldInfo>,
    ctes: Vec<PseudoTable>,
    outer: Vec<FieldInfo>,
}

impl Scope {
    pub fn from_fields(&self) -> &[FieldInfo] {
        &self.from
    }

    /// Install a new FROM list, returning the previous one
    pub fn replace_from(&mut self, from: Vec<FieldInfo>) -> Vec<FieldInfo> {
        std::mem::replace(&mut self.from, from)
    }

    pub fn restore_from(&mut self, saved: Vec<FieldInfo>) {
        self.from = saved;
    }

    pub fn cte_depth(&self) -> usize {
        self.ctes.len()
    }

    pub fn push_cte(&mut self, table: PseudoTable) {
        self.ctes.push(table);
    }

    pub fn truncate_ctes(&mut self, depth: usize) {
        self.ctes.truncate(depth);
    }

    /// Overwrite the innermost CTE (a recursive CTE's running state)
    pub fn replace_innermost_cte(&mut self, table: PseudoTable) {
        if let Some(last) = self.ctes.last_mut() {
            *last = table;
        }
    }

    /// Innermost CTE called `name`
    pub fn find_cte(&self, name: &str, names: NameComparison) -> Option<&PseudoTable> {
        self.ctes.iter().rev().find(|t| names.matches(&t.name, name))
    }

    pub fn outer_depth(&self) -> usize {
        self.outer.len()
    }

    /// Make `fields` visible to nested query blocks
    pub fn push_outer(&mut self, fields: &[FieldInfo]) {
        self.outer.extend_from_slice(fields);
    }

    pub fn truncate_outer(&mut self, depth: usize) {
        self.outer.truncate(depth);
    }

    /// Outer fields, innermost first
    pub fn outer_innermost_first(&self) -> impl Iterator<Item = &FieldInfo> {
        self.outer.iter().rev()
    }
}
