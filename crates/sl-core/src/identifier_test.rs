use super::*;

#[test]
fn test_normalize_backticks() {
    assert_eq!(normalize_identifier("`users`"), "users");
    assert_eq!(normalize_identifier("  `users`  "), "users");
}

#[test]
fn test_normalize_double_quotes() {
    assert_eq!(normalize_identifier("\"users\""), "users");
    assert_eq!(normalize_identifier("\"a\"\"b\""), "a\"b");
}

#[test]
fn test_normalize_unquoted_keeps_case() {
    assert_eq!(normalize_identifier("Users"), "Users");
}

#[test]
fn test_normalize_lone_backtick_is_untouched() {
    assert_eq!(normalize_identifier("`"), "`");
}

#[test]
fn test_split_qualified_plain() {
    assert_eq!(split_qualified("db.t"), vec!["db", "t"]);
    assert_eq!(split_qualified("t"), vec!["t"]);
}

#[test]
fn test_split_qualified_dot_inside_quotes() {
    assert_eq!(
        split_qualified("`my.db`.`t`.c"),
        vec!["my.db".to_string(), "t".to_string(), "c".to_string()]
    );
}

#[test]
fn test_qualified_name_parse() {
    let name = QualifiedName::parse("`shop`.`orders`").unwrap();
    assert_eq!(name.database.as_deref(), Some("shop"));
    assert_eq!(name.name, "orders");

    let name = QualifiedName::parse("orders").unwrap();
    assert_eq!(name.database, None);
    assert_eq!(name.database_or_empty(), "");
}

#[test]
fn test_qualified_name_rejects_three_parts() {
    let err = QualifiedName::parse("a.b.c").unwrap_err();
    assert!(err.to_string().contains("E005"));
}

#[test]
fn test_qualified_name_rejects_empty_part() {
    assert!(QualifiedName::parse("db.").is_err());
}

#[test]
fn test_qualified_name_display_quotes_parts() {
    let name = QualifiedName::qualified("shop", "order`s");
    assert_eq!(name.to_string(), "`shop`.`order``s`");
}

#[test]
fn test_from_parts_takes_last_two() {
    let parts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let name = QualifiedName::from_parts(&parts).unwrap();
    assert_eq!(name, QualifiedName::qualified("b", "c"));
    assert!(QualifiedName::from_parts(&[]).is_none());
}
