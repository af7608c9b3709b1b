use super::*;
use crate::model::{ColumnDef, RoutineKind};
use pretty_assertions::assert_eq;
use sl_sql::ViewDefinition;

fn no_pragmas() -> AnalyzerConfig {
    AnalyzerConfig {
        foreign_key_checks_pragmas: false,
        ..AnalyzerConfig::default()
    }
}

fn column(table: &str, name: &str, definition: &str) -> ColumnDef {
    ColumnDef {
        id: 0,
        name: name.to_string(),
        table: table.to_string(),
        column_type: "int".to_string(),
        nullable: true,
        visible: true,
        default: None,
        comment: None,
        definition: definition.to_string(),
        canonical: definition.to_string(),
    }
}

fn view(sql: &str, columns: &[&str]) -> ViewDef {
    let header = ViewDefinition::parse(sql).unwrap();
    ViewDef {
        name: header.name.clone(),
        header,
        columns: columns.iter().map(|c| c.to_string()).collect(),
        canonical: sql.to_string(),
    }
}

#[test]
fn test_empty_node_writes_nothing() {
    assert_eq!(write_script(&DiffNode::default(), &AnalyzerConfig::default()), "");
}

#[test]
fn test_pragmas_bracket_the_script() {
    let node = DiffNode {
        drop_tables: vec![TableDef::new(0, "t", "CREATE TABLE t (a int)")],
        ..DiffNode::default()
    };
    assert_eq!(
        write_script(&node, &AnalyzerConfig::default()),
        "SET FOREIGN_KEY_CHECKS=0;\n\nDROP TABLE IF EXISTS `t`;\n\nSET FOREIGN_KEY_CHECKS=1;\n"
    );
    assert_eq!(write_script(&node, &no_pragmas()), "DROP TABLE IF EXISTS `t`;\n\n");
}

#[test]
fn test_dropped_tables_follow_creation_order() {
    let node = DiffNode {
        drop_tables: vec![
            TableDef::new(1, "a", "CREATE TABLE a (x int)"),
            TableDef::new(0, "b", "CREATE TABLE b (x int)"),
        ],
        ..DiffNode::default()
    };
    assert_eq!(
        write_script(&node, &no_pragmas()),
        "DROP TABLE IF EXISTS `b`;\n\nDROP TABLE IF EXISTS `a`;\n\n"
    );
}

#[test]
fn test_create_table_gets_if_not_exists() {
    let plain = TableDef::new(0, "t", "create table t (a int)");
    assert_eq!(create_table(&plain), "create table IF NOT EXISTS t (a int);");

    let guarded = TableDef::new(0, "t", "CREATE TABLE IF NOT EXISTS t (a int)");
    assert_eq!(create_table(&guarded), "CREATE TABLE IF NOT EXISTS t (a int);");
}

#[test]
fn test_column_positions() {
    let node = DiffNode {
        add_columns: vec![
            ColumnChange {
                column: column("t", "z", "`z` int"),
                position: Some(ColumnPosition::First),
            },
            ColumnChange {
                column: column("t", "b", "`b` int"),
                position: Some(ColumnPosition::After("a".to_string())),
            },
        ],
        modify_columns: vec![ColumnChange {
            column: column("t", "c", "`c` bigint"),
            position: None,
        }],
        drop_columns: vec![column("t", "old", "`old` int")],
        ..DiffNode::default()
    };
    assert_eq!(
        write_script(&node, &no_pragmas()),
        "ALTER TABLE `t` ADD COLUMN `z` int FIRST;\n\n\
         ALTER TABLE `t` ADD COLUMN `b` int AFTER `a`;\n\n\
         ALTER TABLE `t` MODIFY COLUMN `c` bigint;\n\n\
         ALTER TABLE `t` DROP COLUMN `old`;\n\n"
    );
}

#[test]
fn test_stub_view_precedes_real_view() {
    let v = view("CREATE VIEW v AS SELECT a, b FROM t", &["a", "b"]);
    let node = DiffNode {
        create_stub_views: vec![v.clone()],
        create_views: vec![v],
        ..DiffNode::default()
    };
    assert_eq!(
        write_script(&node, &no_pragmas()),
        "CREATE OR REPLACE ALGORITHM=UNDEFINED DEFINER=CURRENT_USER SQL SECURITY DEFINER \
         VIEW `v` AS SELECT SQL_NO_CACHE 1 AS `a`, 1 AS `b`;\n\n\
         CREATE OR REPLACE ALGORITHM=UNDEFINED DEFINER=CURRENT_USER SQL SECURITY DEFINER \
         VIEW `v` AS SELECT a, b FROM t;\n\n"
    );
}

#[test]
fn test_view_header_keeps_written_clauses() {
    let v = view(
        "CREATE ALGORITHM=MERGE DEFINER=`root`@`%` SQL SECURITY INVOKER VIEW v (x) AS SELECT a FROM t",
        &["x"],
    );
    assert_eq!(
        create_view(&v, &AnalyzerConfig::default()),
        "CREATE OR REPLACE ALGORITHM=MERGE DEFINER=`root`@`%` SQL SECURITY INVOKER \
         VIEW `v` (`x`) AS SELECT a FROM t;"
    );
}

#[test]
fn test_routines_use_delimiter_blocks() {
    let node = DiffNode {
        drop_procedures: vec![RoutineDef {
            kind: RoutineKind::Procedure,
            name: "p".to_string(),
            definition: String::new(),
            canonical: String::new(),
        }],
        create_procedures: vec![RoutineDef {
            kind: RoutineKind::Procedure,
            name: "p".to_string(),
            definition: "CREATE PROCEDURE p() BEGIN SELECT 1; END".to_string(),
            canonical: String::new(),
        }],
        ..DiffNode::default()
    };
    assert_eq!(
        write_script(&node, &no_pragmas()),
        "DROP PROCEDURE IF EXISTS `p`;\n\n\
         DELIMITER ;;\nCREATE PROCEDURE p() BEGIN SELECT 1; END;;\nDELIMITER ;\n\n"
    );
}
