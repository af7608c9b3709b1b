use super::*;

#[test]
fn test_mysql_parse() {
    let dialect = MySqlDialect::new();
    let stmts = dialect.parse("SELECT * FROM `users`").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_quote_ident() {
    let dialect = MySqlDialect::default();
    assert_eq!(dialect.quote_ident("user"), "`user`");
    assert_eq!(dialect.quote_ident("user`name"), "`user``name`");
    assert_eq!(dialect.name(), "mysql");
}

#[test]
fn test_parse_error_location() {
    let dialect = MySqlDialect::new();
    let result = dialect.parse("SELECT a FROM t\nWHERE a = = 1");
    match result {
        Err(SqlError::ParseError {
            line,
            column,
            message,
        }) => {
            assert_eq!(line, 2, "message: {}", message);
            assert_eq!(column, 11, "message: {}", message);
        }
        other => panic!("expected parse error, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_error_position_from_message() {
    assert_eq!(
        error_position("sql parser error: Expected: ), found: x at Line: 3, Column: 14"),
        Some(Position { line: 3, column: 14 })
    );
    assert_eq!(error_position("no location here"), None);
}

#[test]
fn test_tokenize_keeps_backtick_words() {
    let dialect = MySqlDialect::new();
    let tokens = dialect.tokenize("SELECT `a b` FROM t").unwrap();
    let quoted = tokens.iter().any(|t| {
        matches!(&t.token, sqlparser::tokenizer::Token::Word(w)
            if w.value == "a b" && w.quote_style == Some('`'))
    });
    assert!(quoted);
}
