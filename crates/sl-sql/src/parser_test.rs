use super::*;

#[test]
fn test_parse_empty() {
    let parser = SqlParser::mysql();
    assert_eq!(parser.parse("   ").unwrap_err(), SqlError::EmptySql);
}

#[test]
fn test_parse_single() {
    let parser = SqlParser::default();
    let stmt = parser.parse_single("SELECT a FROM t").unwrap();
    assert!(matches!(stmt, Statement::Query(_)));
    assert_eq!(parser.dialect_name(), "mysql");
    assert_eq!(parser.quote_ident("t"), "`t`");
}

#[test]
fn test_parse_script() {
    let parser = SqlParser::mysql();
    let parsed = parser
        .parse_script("CREATE TABLE t (a INT);\n-- only a comment\nSELECT a FROM t;")
        .unwrap();
    assert_eq!(parsed.len(), 2);
    assert!(matches!(parsed[0].ast[0], Statement::CreateTable(_)));
    assert!(matches!(parsed[1].ast[0], Statement::Query(_)));
}

#[test]
fn test_parse_script_skips_empty_statements() {
    let parser = SqlParser::mysql();
    let parsed = parser.parse_script("SELECT 1;;\n-- trailing").unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_parse_script_error_position_is_script_relative() {
    let parser = SqlParser::mysql();
    let err = parser
        .parse_script("SELECT 1;\nSELECT 2;\nSELECT a FROM t\nWHERE a = = 1;")
        .unwrap_err();
    match err {
        SqlError::ParseError { line, column, .. } => {
            assert_eq!(line, 4);
            assert_eq!(column, 11);
        }
        other => panic!("unexpected error {other}"),
    }
}
