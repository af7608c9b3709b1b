use super::*;
use crate::test_utils::*;
use sl_core::{MaskingLevel, StaticCatalog};

fn run_with(sql: &str, catalog: &StaticCatalog) -> AnalysisResult<Vec<(String, MaskingLevel)>> {
    let fields = extract(sql, "db", catalog, &AnalyzerConfig::default())?;
    Ok(fields.into_iter().map(|f| (f.name.clone(), f.level())).collect())
}

fn run(sql: &str) -> Vec<(String, MaskingLevel)> {
    run_with(sql, &sample_catalog()).unwrap()
}

fn pairs(items: &[(&str, MaskingLevel)]) -> Vec<(String, MaskingLevel)> {
    items.iter().map(|(n, l)| (n.to_string(), *l)).collect()
}

#[test]
fn test_select_literal_with_empty_catalog() {
    let result = run_with("SELECT 1;", &StaticCatalog::new()).unwrap();
    assert_eq!(result, pairs(&[("1", MaskingLevel::None)]));
}

#[test]
fn test_star_follows_catalog_order() {
    assert_eq!(
        run("SELECT * FROM t"),
        pairs(&[("a", MaskingLevel::Full), ("b", MaskingLevel::None)])
    );
}

#[test]
fn test_names_alias_column_and_expression() {
    assert_eq!(
        run("SELECT a AS x, b, a + b FROM t"),
        pairs(&[
            ("x", MaskingLevel::Full),
            ("b", MaskingLevel::None),
            ("a + b", MaskingLevel::Full),
        ])
    );
}

#[test]
fn test_qualified_references() {
    assert_eq!(run("SELECT x.b FROM t AS x"), pairs(&[("b", MaskingLevel::None)]));
    assert_eq!(run("SELECT db.t.a FROM db.t"), pairs(&[("a", MaskingLevel::Full)]));
}

#[test]
fn test_unresolved_column_defaults_to_none() {
    assert_eq!(run("SELECT zzz FROM t"), pairs(&[("zzz", MaskingLevel::None)]));
}

#[test]
fn test_using_join_dominance() {
    assert_eq!(
        run("SELECT a FROM t1 JOIN t2 USING (a)"),
        pairs(&[("a", MaskingLevel::Full)])
    );
}

#[test]
fn test_on_join_keeps_sides_apart() {
    assert_eq!(
        run("SELECT t1.a FROM t1 JOIN t2 ON t1.a = t2.a"),
        pairs(&[("a", MaskingLevel::None)])
    );
}

#[test]
fn test_natural_join_star() {
    assert_eq!(
        run("SELECT * FROM t1 NATURAL JOIN t2"),
        pairs(&[
            ("a", MaskingLevel::Full),
            ("b", MaskingLevel::Partial),
            ("c", MaskingLevel::None),
        ])
    );
}

#[test]
fn test_qualified_wildcard() {
    assert_eq!(
        run("SELECT t2.*, t1.b FROM t1 JOIN t2 ON t1.a = t2.a"),
        pairs(&[
            ("a", MaskingLevel::Full),
            ("c", MaskingLevel::None),
            ("b", MaskingLevel::Partial),
        ])
    );
}

#[test]
fn test_union_joins_by_position() {
    assert_eq!(
        run("SELECT b FROM t UNION SELECT a FROM t2"),
        pairs(&[("b", MaskingLevel::Full)])
    );
}

#[test]
fn test_union_with_explicit_table() {
    assert_eq!(
        run("SELECT a, b FROM t1 UNION ALL TABLE t"),
        pairs(&[("a", MaskingLevel::Full), ("b", MaskingLevel::Partial)])
    );
}

#[test]
fn test_union_arity_mismatch() {
    let err = run_with("SELECT a, b FROM t UNION SELECT a FROM t2", &sample_catalog()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::SetOperationArity { left: 2, right: 1 }
    ));
}

#[test]
fn test_missing_table() {
    let err = run_with("SELECT * FROM missing", &sample_catalog()).unwrap_err();
    assert!(matches!(err, AnalysisError::TableNotFound { .. }));
    assert!(err.to_string().contains("`db`.`missing`"));
}

#[test]
fn test_table_names_follow_case_setting() {
    assert_eq!(run("SELECT A FROM T"), pairs(&[("A", MaskingLevel::Full)]));

    let config = AnalyzerConfig {
        case_sensitive: true,
        ..AnalyzerConfig::default()
    };
    let err = extract("SELECT a FROM T", "db", &sample_catalog(), &config).unwrap_err();
    assert!(matches!(err, AnalysisError::TableNotFound { .. }));
}

#[test]
fn test_derived_table_alias_columns() {
    assert_eq!(
        run("SELECT y, d.x FROM (SELECT a, b FROM t) AS d (x, y)"),
        pairs(&[("y", MaskingLevel::None), ("x", MaskingLevel::Full)])
    );
}

#[test]
fn test_derived_table_alias_arity() {
    let err = run_with("SELECT * FROM (SELECT a FROM t) AS d (x, y)", &sample_catalog())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::ColumnListArity {
            expected: 2,
            actual: 1,
            ..
        }
    ));
}

#[test]
fn test_scalar_subquery() {
    assert_eq!(
        run("SELECT (SELECT MAX(t2.a) FROM t2) AS m, b FROM t1"),
        pairs(&[("m", MaskingLevel::Full), ("b", MaskingLevel::Partial)])
    );
}

#[test]
fn test_correlated_subquery_prefers_outer_alias() {
    assert_eq!(
        run("SELECT (SELECT x.a FROM t1 LIMIT 1) AS c FROM t AS x"),
        pairs(&[("c", MaskingLevel::Full)])
    );
}

#[test]
fn test_lateral_derived_table_sees_preceding_items() {
    assert_eq!(
        run("SELECT d.v FROM t, LATERAL (SELECT t.a AS v) AS d"),
        pairs(&[("v", MaskingLevel::Full)])
    );
}

#[test]
fn test_cte_and_sibling_visibility() {
    assert_eq!(
        run("WITH c1 AS (SELECT a FROM t), c2 AS (SELECT a AS z FROM c1) SELECT z FROM c2"),
        pairs(&[("z", MaskingLevel::Full)])
    );
}

#[test]
fn test_cte_shadows_catalog_table() {
    assert_eq!(
        run("WITH t AS (SELECT b AS a FROM t1) SELECT a FROM t"),
        pairs(&[("a", MaskingLevel::Partial)])
    );
}

#[test]
fn test_cte_column_list_arity() {
    let err = run_with("WITH c (x, y) AS (SELECT a FROM t) SELECT * FROM c", &sample_catalog())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ColumnListArity { .. }));
}

#[test]
fn test_view_is_reextracted() {
    let catalog = catalog_with(
        vec![table(
            "t",
            vec![col("a", MaskingLevel::Full), col("b", MaskingLevel::None)],
        )],
        vec![ViewMetadata::new("v", "SELECT a AS secret, b FROM t")],
    );
    assert_eq!(
        run_with("SELECT * FROM v", &catalog).unwrap(),
        pairs(&[("secret", MaskingLevel::Full), ("b", MaskingLevel::None)])
    );
}

#[test]
fn test_view_column_list_renames() {
    let mut view = ViewMetadata::new("v", "SELECT a, b FROM t");
    view.columns = vec!["p".to_string(), "q".to_string()];
    let catalog = catalog_with(
        vec![table(
            "t",
            vec![col("a", MaskingLevel::Partial), col("b", MaskingLevel::None)],
        )],
        vec![view],
    );
    assert_eq!(
        run_with("SELECT q, p FROM v", &catalog).unwrap(),
        pairs(&[("q", MaskingLevel::None), ("p", MaskingLevel::Partial)])
    );
}

#[test]
fn test_view_cycle_is_an_error() {
    let catalog = catalog_with(vec![], vec![ViewMetadata::new("v1", "SELECT * FROM v1")]);
    let err = run_with("SELECT * FROM v1", &catalog).unwrap_err();
    assert!(matches!(err, AnalysisError::ViewCycle(name) if name == "v1"));
}

#[test]
fn test_create_view_statement() {
    assert_eq!(
        run("CREATE ALGORITHM=UNDEFINED VIEW v2 (x, y) AS SELECT a, b FROM t"),
        pairs(&[("x", MaskingLevel::Full), ("y", MaskingLevel::None)])
    );
}

#[test]
fn test_values_names_from_first_row() {
    assert_eq!(
        run("VALUES ROW(1, 'x'), ROW(2, 'y')"),
        pairs(&[("1", MaskingLevel::None), ("'x'", MaskingLevel::None)])
    );
}

#[test]
fn test_json_table_inherits_document_level() {
    let sql = "SELECT jt.v, jt.n FROM t, \
               JSON_TABLE(t.a, '$[*]' COLUMNS (v INT PATH '$', n FOR ORDINALITY)) AS jt";
    assert_eq!(
        run(sql),
        pairs(&[("v", MaskingLevel::Full), ("n", MaskingLevel::Full)])
    );
}

#[test]
fn test_select_from_dual() {
    assert_eq!(
        run("SELECT 1 AS one FROM DUAL"),
        pairs(&[("one", MaskingLevel::None)])
    );
}

#[test]
fn test_unsupported_statement() {
    let err = run_with("DELETE FROM t", &sample_catalog()).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedStatement(kind) if kind == "DELETE"));
}

#[test]
fn test_multiple_statements_rejected() {
    let err = run_with("SELECT 1; SELECT 2", &sample_catalog()).unwrap_err();
    assert!(matches!(err, AnalysisError::MultipleStatements(2)));
}

#[test]
fn test_syntax_error_propagates() {
    let err = run_with("SELECT a FROM t WHERE a = = 1", &sample_catalog()).unwrap_err();
    assert!(matches!(err, AnalysisError::Sql(_)));
}

#[test]
fn test_empty_input() {
    assert!(run("  ").is_empty());
}

#[test]
fn test_extractor_is_deterministic() {
    let catalog = sample_catalog();
    let config = AnalyzerConfig::default();
    let sql = "SELECT t1.b, t2.* FROM t1 JOIN t2 USING (a) UNION SELECT a, b FROM t";
    let mut extractor = LineageExtractor::new(&catalog, "db", &config);
    let first = extractor.extract(sql).unwrap();
    let second = extractor.extract(sql).unwrap();
    assert_eq!(first, second);
}
