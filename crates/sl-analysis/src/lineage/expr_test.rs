use super::*;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

fn parse_expr(sql: &str) -> Expr {
    Parser::new(&MySqlDialect {})
        .try_with_sql(sql)
        .unwrap()
        .parse_expr()
        .unwrap()
}

fn refs_of(sql: &str) -> ExprRefs {
    let mut refs = ExprRefs::default();
    let _ = parse_expr(sql).visit(&mut refs);
    refs
}

#[test]
fn test_collects_column_references() {
    let refs = refs_of("CONCAT(a, t.b, db.t.c) + 1");
    assert_eq!(
        refs.columns,
        vec![
            vec!["a".to_string()],
            vec!["t".to_string(), "b".to_string()],
            vec!["db".to_string(), "t".to_string(), "c".to_string()],
        ]
    );
    assert!(refs.subqueries.is_empty());
}

#[test]
fn test_subquery_columns_stay_inside() {
    let refs = refs_of("a IN (SELECT b FROM t WHERE c = (SELECT d FROM u))");
    assert_eq!(refs.columns, vec![vec!["a".to_string()]]);
    assert_eq!(refs.subqueries.len(), 1);
}

#[test]
fn test_output_name() {
    assert_eq!(output_name(&parse_expr("col")), "col");
    assert_eq!(output_name(&parse_expr("`t`.`Col`")), "Col");
    assert_eq!(output_name(&parse_expr("LOWER(x)")), "LOWER(x)");
    assert_eq!(output_name(&parse_expr("1")), "1");
}
