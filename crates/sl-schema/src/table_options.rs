//! CREATE TABLE option tail
//!
//! Everything after the closing parenthesis of the element list is a run of
//! table options, optionally followed by a `PARTITION BY` clause. Options are
//! recorded one by one so the differ can alter or reset each independently.

use sl_core::quote_identifier;
use sl_sql::lexeme::Lexeme;

use crate::ddl::{skip_group, slice_text};
use crate::model::TableOptionDef;

const KNOWN_OPTIONS: &[&str] = &[
    "ENGINE",
    "SECONDARY_ENGINE",
    "SECONDARY_ENGINE_ATTRIBUTE",
    "ENGINE_ATTRIBUTE",
    "DEFAULT CHARACTER SET",
    "DEFAULT COLLATE",
    "AUTO_INCREMENT",
    "AUTOEXTEND_SIZE",
    "COMMENT",
    "AVG_ROW_LENGTH",
    "CHECKSUM",
    "TABLE_CHECKSUM",
    "COMPRESSION",
    "CONNECTION",
    "PASSWORD",
    "KEY_BLOCK_SIZE",
    "MAX_ROWS",
    "MIN_ROWS",
    "DELAY_KEY_WRITE",
    "ROW_FORMAT",
    "STATS_PERSISTENT",
    "STATS_AUTO_RECALC",
    "STATS_SAMPLE_PAGES",
    "PACK_KEYS",
    "TABLESPACE",
    "STORAGE",
    "INSERT_METHOD",
    "UNION",
    "ENCRYPTION",
    "DATA DIRECTORY",
    "INDEX DIRECTORY",
    "START TRANSACTION",
];

/// Options whose absence means "server default" rather than a value to reset
pub(crate) const DEFAULTED_OPTIONS: &[&str] =
    &["ENGINE", "DEFAULT CHARACTER SET", "DEFAULT COLLATE"];

/// Read the option tail of `table`.
///
/// Returns the options in written order and the verbatim partition clause.
pub(crate) fn parse_table_tail(
    sql: &str,
    tail: &[Lexeme<'_>],
    table: &str,
) -> (Vec<TableOptionDef>, Option<String>) {
    let mut options = Vec::new();
    let mut i = 0;
    while i < tail.len() {
        if tail[i].is_punct(',') {
            i += 1;
            continue;
        }
        if tail[i].is_keyword("PARTITION") {
            return (options, Some(slice_text(sql, &tail[i..]).to_string()));
        }

        let start = i;
        let (option, after_name) = option_name(tail, i);
        i = after_name;
        if option == "START TRANSACTION" {
            options.push(TableOptionDef {
                option,
                table: table.to_string(),
                value: String::new(),
                text: slice_text(sql, &tail[start..i]).to_string(),
            });
            continue;
        }
        if tail.get(i).is_some_and(|l| l.is_punct('=')) {
            i += 1;
        }
        if i >= tail.len() {
            log::warn!("Table option '{}' on table '{}' has no value", option, table);
            break;
        }
        let value_start = i;
        i = skip_group(tail, i);
        if !KNOWN_OPTIONS.contains(&option.as_str()) {
            log::warn!("Unknown table option '{}' on table '{}'", option, table);
        }
        options.push(TableOptionDef {
            option,
            table: table.to_string(),
            value: slice_text(sql, &tail[value_start..i]).to_string(),
            text: slice_text(sql, &tail[start..i]).to_string(),
        });
    }
    (options, None)
}

/// Canonical option name starting at `at` and the index past it
fn option_name(lx: &[Lexeme<'_>], at: usize) -> (String, usize) {
    let mut i = at;
    if lx[i].is_keyword("DEFAULT") && i + 1 < lx.len() {
        i += 1;
    }
    let word = &lx[i];
    let next_is = |kw: &str| lx.get(i + 1).is_some_and(|l| l.is_keyword(kw));

    if word.is_keyword("CHARACTER") && next_is("SET") {
        ("DEFAULT CHARACTER SET".to_string(), i + 2)
    } else if word.is_keyword("CHARSET") {
        ("DEFAULT CHARACTER SET".to_string(), i + 1)
    } else if word.is_keyword("COLLATE") {
        ("DEFAULT COLLATE".to_string(), i + 1)
    } else if (word.is_keyword("DATA") || word.is_keyword("INDEX")) && next_is("DIRECTORY") {
        (format!("{} DIRECTORY", word.text.to_uppercase()), i + 2)
    } else if word.is_keyword("START") && next_is("TRANSACTION") {
        ("START TRANSACTION".to_string(), i + 2)
    } else {
        (word.text.to_uppercase(), i + 1)
    }
}

impl TableOptionDef {
    /// `ALTER TABLE` statement applying this option
    pub fn alter_statement(&self) -> String {
        format!("ALTER TABLE {} {};", quote_identifier(&self.table), self.text)
    }

    /// `ALTER TABLE` statement restoring the option's default, if MySQL has
    /// a way to express one
    pub fn reset_statement(&self) -> Option<String> {
        let value = match self.option.as_str() {
            "AUTO_INCREMENT" => "0",
            "COMMENT" => "''",
            "AVG_ROW_LENGTH" => "0",
            "CHECKSUM" => "0",
            "COMPRESSION" => "'None'",
            "CONNECTION" => "''",
            "MAX_ROWS" => "0",
            "MIN_ROWS" => "0",
            "DELAY_KEY_WRITE" => "0",
            "ROW_FORMAT" => "DEFAULT",
            "STATS_AUTO_RECALC" => "DEFAULT",
            "STATS_PERSISTENT" => "DEFAULT",
            "STATS_SAMPLE_PAGES" => "DEFAULT",
            "PACK_KEYS" => "DEFAULT",
            "INSERT_METHOD" => "NO",
            "ENCRYPTION" => "'N'",
            _ => return None,
        };
        Some(format!(
            "ALTER TABLE {} {} = {};",
            quote_identifier(&self.table),
            self.option,
            value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_sql::lexeme::lexemes;

    fn tail(sql: &str) -> (Vec<TableOptionDef>, Option<String>) {
        let lx = lexemes(sql);
        parse_table_tail(sql, &lx, "t")
    }

    #[test]
    fn test_options_in_written_order() {
        let (options, partition) = tail(
            "ENGINE=InnoDB AUTO_INCREMENT=7 DEFAULT CHARSET=utf8mb4 COLLATE utf8mb4_bin COMMENT='hi'",
        );
        let names: Vec<&str> = options.iter().map(|o| o.option.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ENGINE",
                "AUTO_INCREMENT",
                "DEFAULT CHARACTER SET",
                "DEFAULT COLLATE",
                "COMMENT"
            ]
        );
        assert_eq!(options[0].value, "InnoDB");
        assert_eq!(options[2].text, "DEFAULT CHARSET=utf8mb4");
        assert_eq!(options[4].value, "'hi'");
        assert!(partition.is_none());
    }

    #[test]
    fn test_charset_spellings_share_a_name() {
        let (a, _) = tail("CHARACTER SET = latin1");
        let (b, _) = tail("DEFAULT CHARSET latin1");
        assert_eq!(a[0].option, b[0].option);
        assert_eq!(a[0].value, b[0].value);
    }

    #[test]
    fn test_partition_tail_is_kept_verbatim() {
        let (options, partition) =
            tail("ENGINE=InnoDB PARTITION BY HASH (id) PARTITIONS 4");
        assert_eq!(options.len(), 1);
        assert_eq!(partition.unwrap(), "PARTITION BY HASH (id) PARTITIONS 4");
    }

    #[test]
    fn test_union_value_group() {
        let (options, _) = tail("UNION=(a, b), INSERT_METHOD=LAST");
        assert_eq!(options[0].value, "(a, b)");
        assert_eq!(options[1].option, "INSERT_METHOD");
    }

    #[test]
    fn test_statements() {
        let (options, _) = tail("ROW_FORMAT=COMPACT ENGINE=InnoDB");
        assert_eq!(options[0].alter_statement(), "ALTER TABLE `t` ROW_FORMAT=COMPACT;");
        assert_eq!(
            options[0].reset_statement().unwrap(),
            "ALTER TABLE `t` ROW_FORMAT = DEFAULT;"
        );
        assert!(options[1].reset_statement().is_none());
    }
}
