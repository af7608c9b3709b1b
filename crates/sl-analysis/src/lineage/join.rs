//! Join field merging

use std::collections::{HashMap, HashSet};

use crate::field::FieldInfo;
use sqlparser::ast::{Ident, JoinConstraint, JoinOperator};

/// Combine the field lists of a join's two sides.
///
/// `USING` and `NATURAL` joins keep one copy of each shared column, joining
/// the other side's attributes into it; every other join concatenates.
pub(crate) fn merge_join(
    left: Vec<FieldInfo>,
    right: Vec<FieldInfo>,
    operator: &JoinOperator,
) -> Vec<FieldInfo> {
    let constraint = match operator {
        JoinOperator::Inner(c)
        | JoinOperator::LeftOuter(c)
        | JoinOperator::RightOuter(c)
        | JoinOperator::FullOuter(c) => c,
        JoinOperator::CrossJoin => return concat(left, right),
        other => {
            log::warn!("Join operator {:?} treated as a plain concatenation", other);
            return concat(left, right);
        }
    };

    match constraint {
        JoinConstraint::Using(columns) => merge_shared(left, right, Some(&using_set(columns))),
        JoinConstraint::Natural => merge_shared(left, right, None),
        JoinConstraint::On(_) | JoinConstraint::None => concat(left, right),
    }
}

fn concat(mut left: Vec<FieldInfo>, right: Vec<FieldInfo>) -> Vec<FieldInfo> {
    left.extend(right);
    left
}

fn using_set(columns: &[Ident]) -> HashSet<String> {
    columns.iter().map(|c| c.value.to_lowercase()).collect()
}

/// Merge same-named columns; `using` restricts which names merge
fn merge_shared(
    mut left: Vec<FieldInfo>,
    right: Vec<FieldInfo>,
    using: Option<&HashSet<String>>,
) -> Vec<FieldInfo> {
    let merges = |key: &str| using.map_or(true, |u| u.contains(key));

    let right_by_name: HashMap<String, &FieldInfo> = right
        .iter()
        .map(|f| (f.name.to_lowercase(), f))
        .collect();
    let left_names: HashSet<String> = left.iter().map(|f| f.name.to_lowercase()).collect();

    for field in left.iter_mut() {
        let key = field.name.to_lowercase();
        if !merges(&key) {
            continue;
        }
        if let Some(other) = right_by_name.get(&key) {
            field.masking.transmitted_by(&other.masking);
        }
    }

    let kept: Vec<FieldInfo> = right
        .iter()
        .filter(|f| {
            let key = f.name.to_lowercase();
            !(merges(&key) && left_names.contains(&key))
        })
        .cloned()
        .collect();
    left.extend(kept);
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::{MaskingAttributes, MaskingLevel};

    fn field(name: &str, table: &str, level: MaskingLevel) -> FieldInfo {
        FieldInfo::in_table(name, table, "db", MaskingAttributes::new(level))
    }

    fn names(fields: &[FieldInfo]) -> Vec<String> {
        fields
            .iter()
            .map(|f| format!("{}.{}", f.table, f.name))
            .collect()
    }

    #[test]
    fn test_inner_on_concatenates() {
        let left = vec![field("a", "l", MaskingLevel::None)];
        let right = vec![field("a", "r", MaskingLevel::Full)];
        let on = JoinOperator::Inner(JoinConstraint::None);
        let merged = merge_join(left, right, &on);
        assert_eq!(names(&merged), vec!["l.a", "r.a"]);
        assert_eq!(merged[0].level(), MaskingLevel::None);
    }

    #[test]
    fn test_using_merges_named_column_only() {
        let left = vec![
            field("a", "l", MaskingLevel::None),
            field("b", "l", MaskingLevel::None),
        ];
        let right = vec![
            field("A", "r", MaskingLevel::Full),
            field("b", "r", MaskingLevel::Partial),
        ];
        let using = JoinOperator::LeftOuter(JoinConstraint::Using(vec![Ident::new("a")]));
        let merged = merge_join(left, right, &using);
        assert_eq!(names(&merged), vec!["l.a", "l.b", "r.b"]);
        assert_eq!(merged[0].level(), MaskingLevel::Full);
        assert_eq!(merged[1].level(), MaskingLevel::None);
    }

    #[test]
    fn test_natural_merges_all_shared() {
        let left = vec![
            field("a", "l", MaskingLevel::Partial),
            field("x", "l", MaskingLevel::None),
        ];
        let right = vec![
            field("a", "r", MaskingLevel::None),
            field("y", "r", MaskingLevel::Full),
        ];
        let natural = JoinOperator::Inner(JoinConstraint::Natural);
        let merged = merge_join(left, right, &natural);
        assert_eq!(names(&merged), vec!["l.a", "l.x", "r.y"]);
        assert_eq!(merged[0].level(), MaskingLevel::Partial);
    }

    #[test]
    fn test_cross_join_concatenates() {
        let merged = merge_join(
            vec![field("a", "l", MaskingLevel::None)],
            vec![field("a", "r", MaskingLevel::None)],
            &JoinOperator::CrossJoin,
        );
        assert_eq!(merged.len(), 2);
    }
}
