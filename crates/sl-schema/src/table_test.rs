use super::*;
use crate::ddl::trimmed;
use sl_sql::lexeme::lexemes;

fn read(sql: &str) -> SchemaResult<Option<CreateTable>> {
    let lx = lexemes(sql);
    let end = trimmed(&lx);
    // CREATE TABLE <name>
    parse_create_table(sql, &lx[..end], 2, 0, NameComparison::CaseInsensitive)
}

fn table(sql: &str) -> TableDef {
    read(sql).unwrap().unwrap().table
}

#[test]
fn test_columns_and_attributes() {
    let t = table(
        "CREATE TABLE `t` (
  `id` int NOT NULL AUTO_INCREMENT,
  `name` varchar(64) DEFAULT 'x' COMMENT 'the ''name''',
  `price` decimal(10,2) DEFAULT -1.5,
  `ts` timestamp(3) NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
  `hidden` int INVISIBLE,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB;",
    );

    let names: Vec<&str> = t.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "price", "ts", "hidden"]);
    assert_eq!(t.name, "t");
    assert!(t.definition.starts_with("CREATE TABLE `t` ("));
    assert!(t.definition.ends_with("ENGINE=InnoDB"));

    let id = &t.columns[0];
    assert_eq!(id.id, 0);
    assert_eq!(id.column_type, "int");
    assert!(!id.nullable);
    assert_eq!(id.definition, "`id` int NOT NULL AUTO_INCREMENT");

    let name = t.column("NAME").unwrap();
    assert_eq!(name.column_type, "varchar(64)");
    assert_eq!(name.default.as_deref(), Some("'x'"));
    assert_eq!(name.comment.as_deref(), Some("the 'name'"));
    assert!(name.nullable);

    let price = t.column("price").unwrap();
    assert_eq!(price.column_type, "decimal(10,2)");
    assert_eq!(price.default.as_deref(), Some("-1.5"));

    let ts = t.column("ts").unwrap();
    assert_eq!(ts.column_type, "timestamp(3)");
    assert_eq!(ts.default.as_deref(), Some("CURRENT_TIMESTAMP(3)"));

    assert!(!t.column("hidden").unwrap().visible);

    let pk = t.primary_key.as_ref().unwrap();
    assert_eq!(pk.columns, vec!["id"]);
    assert_eq!(pk.key_list, "(`id`)");
    assert_eq!(t.options["ENGINE"].value, "InnoDB");
}

#[test]
fn test_serial_is_not_nullable() {
    let t = table("CREATE TABLE s (id SERIAL, v int)");
    assert!(!t.columns[0].nullable);
    assert!(t.columns[1].nullable);
}

#[test]
fn test_inline_primary_and_unique_keys() {
    let t = table(
        "CREATE TABLE u (id int PRIMARY KEY, email varchar(255) NOT NULL UNIQUE, code int UNIQUE KEY)",
    );
    assert_eq!(t.primary_key.as_ref().unwrap().columns, vec!["id"]);

    let email = &t.index_constraints["email"];
    assert_eq!(email.category.as_deref(), Some("UNIQUE"));
    assert_eq!(email.keys, vec!["email"]);
    assert_eq!(email.key_list, "(`email`)");
    assert!(t.index_constraints.contains_key("code"));
    assert!(!t.column("email").unwrap().nullable);
}

#[test]
fn test_index_constraints() {
    let t = table(
        "CREATE TABLE i (
  a int,
  b text,
  KEY (a),
  KEY idx_B USING BTREE (b(10)) COMMENT 'x',
  UNIQUE KEY uk (a, b(5)),
  KEY (a, b(5)),
  FULLTEXT ft (b)
)",
    );
    let keys: Vec<&str> = t.index_constraints.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "a_2", "ft", "idx_b", "uk"]);

    let idx = &t.index_constraints["idx_b"];
    assert_eq!(idx.name, "idx_B");
    assert_eq!(idx.index_type.as_deref(), Some("USING BTREE"));
    assert_eq!(idx.key_list, "(b(10))");
    assert_eq!(idx.keys, vec!["b"]);
    assert_eq!(idx.options, "COMMENT 'x'");
    assert!(idx.category.is_none());

    assert_eq!(t.index_constraints["uk"].keys, vec!["a", "b"]);
    assert_eq!(t.index_constraints["uk"].category.as_deref(), Some("UNIQUE"));
    assert_eq!(t.index_constraints["a_2"].keys, vec!["a", "b"]);
    assert_eq!(t.index_constraints["ft"].category.as_deref(), Some("FULLTEXT"));
}

#[test]
fn test_foreign_keys() {
    let t = table(
        "CREATE TABLE o (
  id int,
  cid int,
  pid int,
  FOREIGN KEY (cid) REFERENCES Customers (id) ON DELETE CASCADE,
  CONSTRAINT fk_p FOREIGN KEY (pid) REFERENCES shop.products (id)
)",
    );
    let unnamed = &t.foreign_keys["o_ibfk_1"];
    assert_eq!(unnamed.columns, vec!["cid"]);
    assert_eq!(unnamed.referenced_table, "customers");
    assert_eq!(unnamed.referenced_columns, vec!["id"]);
    assert_eq!(
        unnamed.definition,
        "FOREIGN KEY (cid) REFERENCES Customers (id) ON DELETE CASCADE"
    );

    let named = &t.foreign_keys["fk_p"];
    assert_eq!(named.referenced_table, "products");
    assert_eq!(
        named.definition,
        "CONSTRAINT fk_p FOREIGN KEY (pid) REFERENCES shop.products (id)"
    );
}

#[test]
fn test_duplicate_foreign_key() {
    let err = read(
        "CREATE TABLE d (a int, CONSTRAINT F1 FOREIGN KEY (a) REFERENCES x (id), \
         CONSTRAINT f1 FOREIGN KEY (a) REFERENCES y (id))",
    )
    .err()
    .unwrap();
    assert!(matches!(err, SchemaError::DuplicateForeignKey(ref key) if key == "f1"));
}

#[test]
fn test_checks() {
    let t = table("CREATE TABLE c (a int, CHECK (a > 0), CONSTRAINT pos CHECK (a < 10) NOT ENFORCED)");
    let unnamed = &t.checks["c_chk_1"];
    assert!(unnamed.enforced);
    assert_eq!(unnamed.definition, "CHECK (a > 0)");

    let named = &t.checks["pos"];
    assert!(!named.enforced);
    assert_eq!(named.definition, "CONSTRAINT pos CHECK (a < 10) NOT ENFORCED");
}

#[test]
fn test_duplicate_column() {
    let err = read("CREATE TABLE t (a int, A int)").err().unwrap();
    match err {
        SchemaError::DuplicateColumn { column, table } => {
            assert_eq!(column, "A");
            assert_eq!(table, "t");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_qualified_name_and_partition() {
    let created = read(
        "CREATE TABLE IF NOT EXISTS shop.`events` (id int) ENGINE=InnoDB PARTITION BY HASH (id) PARTITIONS 4;",
    )
    .unwrap()
    .unwrap();
    assert_eq!(created.database.as_deref(), Some("shop"));
    assert_eq!(created.table.name, "events");
    assert_eq!(
        created.table.partition.as_deref(),
        Some("PARTITION BY HASH (id) PARTITIONS 4")
    );
    assert_eq!(created.table.options.len(), 1);
}

#[test]
fn test_like_is_skipped() {
    assert!(read("CREATE TABLE t2 LIKE t1").unwrap().is_none());
}
