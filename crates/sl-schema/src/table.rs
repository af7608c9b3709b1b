//! CREATE TABLE reader

use sl_core::NameComparison;
use sl_sql::lexeme::{dotted_name, matching_paren, Lexeme, LexemeKind};

use crate::ddl::{
    canonical, find_open_paren, key_list, skip_group, slice_text, split_top_level,
    unquote_literal,
};
use crate::error::{SchemaError, SchemaResult};
use crate::model::{CheckDef, ColumnDef, ForeignKeyDef, IndexConstraintDef, PrimaryKeyDef, TableDef};
use crate::table_options::parse_table_tail;

/// Keywords that end a column's type and start its attributes
const COLUMN_ATTRIBUTES: &[&str] = &[
    "NOT",
    "NULL",
    "DEFAULT",
    "AUTO_INCREMENT",
    "COMMENT",
    "COLLATE",
    "UNIQUE",
    "PRIMARY",
    "KEY",
    "INVISIBLE",
    "VISIBLE",
    "GENERATED",
    "AS",
    "ON",
    "REFERENCES",
    "CHECK",
    "CONSTRAINT",
    "COLUMN_FORMAT",
    "STORAGE",
    "SRID",
    "ENGINE_ATTRIBUTE",
    "SECONDARY_ENGINE_ATTRIBUTE",
];

/// A parsed CREATE TABLE: optional database qualifier and the table
pub(crate) struct CreateTable {
    pub database: Option<String>,
    pub table: TableDef,
}

/// Read a CREATE TABLE statement.
///
/// `at` points just past the `TABLE` keyword. Returns `None` for forms that
/// carry no column list (`LIKE`, `AS SELECT` without columns).
pub(crate) fn parse_create_table(
    sql: &str,
    lx: &[Lexeme<'_>],
    at: usize,
    id: usize,
    names: NameComparison,
) -> SchemaResult<Option<CreateTable>> {
    let mut i = at;
    if lx.get(i).is_some_and(|l| l.is_keyword("IF")) {
        i += 3;
    }
    let Some((mut parts, next)) = dotted_name(lx, i) else {
        return Err(SchemaError::malformed(slice_text(sql, lx), "missing table name"));
    };
    let name = parts.pop().unwrap_or_default();
    let database = parts.pop();

    if !lx.get(next).is_some_and(|l| l.is_punct('(')) {
        log::debug!("Skipping CREATE TABLE {} without a column list", name);
        return Ok(None);
    }
    let Some(close) = matching_paren(lx, next) else {
        return Err(SchemaError::malformed(&name, "unbalanced parentheses"));
    };

    let mut table = TableDef::new(id, name.clone(), slice_text(sql, lx));
    let mut reader = TableReader {
        sql,
        table: &mut table,
        names,
    };
    for element in split_top_level(&lx[next + 1..close], ',') {
        if !element.is_empty() {
            reader.element(element)?;
        }
    }

    let (options, partition) = parse_table_tail(sql, &lx[close + 1..], &name);
    for option in options {
        table.options.insert(option.option.clone(), option);
    }
    table.partition = partition;

    Ok(Some(CreateTable { database, table }))
}

struct TableReader<'s, 't> {
    sql: &'s str,
    table: &'t mut TableDef,
    names: NameComparison,
}

impl TableReader<'_, '_> {
    fn malformed(&self, message: &str) -> SchemaError {
        SchemaError::malformed(&self.table.name, message)
    }

    fn element(&mut self, e: &[Lexeme<'_>]) -> SchemaResult<()> {
        let head = &e[0];
        if head.kind == LexemeKind::QuotedIdent {
            return self.column(e);
        }
        if head.is_keyword("CONSTRAINT") {
            let (symbol, at) = match e.get(1) {
                Some(l) if !is_constraint_keyword(l) => (l.ident(), 2),
                _ => (None, 1),
            };
            return self.constraint(e, at, symbol);
        }
        if is_constraint_keyword(head)
            || head.is_keyword("INDEX")
            || head.is_keyword("KEY")
            || head.is_keyword("FULLTEXT")
            || head.is_keyword("SPATIAL")
        {
            return self.constraint(e, 0, None);
        }
        self.column(e)
    }

    fn constraint(
        &mut self,
        e: &[Lexeme<'_>],
        at: usize,
        symbol: Option<String>,
    ) -> SchemaResult<()> {
        let Some(kw) = e.get(at) else {
            return Err(self.malformed("empty constraint"));
        };
        if kw.is_keyword("PRIMARY") {
            self.primary_key(e, at)
        } else if kw.is_keyword("FOREIGN") {
            self.foreign_key(e, at, symbol)
        } else if kw.is_keyword("CHECK") {
            self.check(e, symbol)
        } else {
            self.index_constraint(e, at, symbol)
        }
    }

    fn column(&mut self, e: &[Lexeme<'_>]) -> SchemaResult<()> {
        let Some(name) = e[0].ident() else {
            return Err(self.malformed("column without a name"));
        };
        if self.table.column(&name).is_some() {
            return Err(SchemaError::DuplicateColumn {
                column: name,
                table: self.table.name.clone(),
            });
        }

        let mut i = 1;
        while i < e.len() && !COLUMN_ATTRIBUTES.iter().any(|kw| e[i].is_keyword(kw)) {
            i = skip_group(e, i);
        }
        let column_type = slice_text(self.sql, &e[1..i]).to_string();
        let definition = slice_text(self.sql, e);
        let mut column = ColumnDef {
            id: self.table.columns.len(),
            name: name.clone(),
            table: self.table.name.clone(),
            nullable: !column_type.eq_ignore_ascii_case("serial"),
            column_type,
            visible: true,
            default: None,
            comment: None,
            definition: definition.to_string(),
            canonical: canonical(definition),
        };

        while i < e.len() {
            let l = &e[i];
            let next = e.get(i + 1);
            let next_is = |kw: &str| next.is_some_and(|n| n.is_keyword(kw));
            if l.is_keyword("NOT") && next_is("NULL") {
                column.nullable = false;
                i += 2;
            } else if l.is_keyword("NULL") {
                column.nullable = true;
                i += 1;
            } else if l.is_keyword("DEFAULT") && next_is("VALUE") {
                // SERIAL DEFAULT VALUE
                column.nullable = false;
                i += 2;
            } else if l.is_keyword("DEFAULT") {
                let end = default_value_end(e, i + 1);
                column.default = Some(slice_text(self.sql, &e[i + 1..end]).to_string());
                i = end;
            } else if l.is_keyword("COMMENT") {
                column.comment = e.get(i + 1).map(|c| unquote_literal(c.text));
                i += 2;
            } else if l.is_keyword("INVISIBLE") {
                column.visible = false;
                i += 1;
            } else if l.is_keyword("VISIBLE") {
                column.visible = true;
                i += 1;
            } else if l.is_keyword("PRIMARY") || l.is_keyword("KEY") {
                self.inline_primary_key(&name);
                i += if l.is_keyword("PRIMARY") && next_is("KEY") { 2 } else { 1 };
            } else if l.is_keyword("UNIQUE") {
                self.inline_unique(&name);
                i += if next_is("KEY") { 2 } else { 1 };
            } else {
                i = skip_group(e, i);
            }
        }

        self.table.columns.push(column);
        Ok(())
    }

    fn inline_primary_key(&mut self, column: &str) {
        let key_list = format!("({})", sl_core::quote_identifier(column));
        self.table.primary_key = Some(PrimaryKeyDef {
            table: self.table.name.clone(),
            columns: vec![column.to_string()],
            canonical: canonical(&format!("PRIMARY KEY {key_list}")),
            key_list,
            options: String::new(),
        });
    }

    fn inline_unique(&mut self, column: &str) {
        let name = self.unused_index_name(column);
        let key_list = format!("({})", sl_core::quote_identifier(column));
        let index = IndexConstraintDef {
            name: name.clone(),
            table: self.table.name.clone(),
            category: Some("UNIQUE".to_string()),
            index_type: None,
            canonical: canonical(&format!("UNIQUE KEY {key_list}")),
            key_list,
            keys: vec![column.to_string()],
            options: String::new(),
        };
        self.table.index_constraints.insert(name.to_lowercase(), index);
    }

    fn primary_key(&mut self, e: &[Lexeme<'_>], at: usize) -> SchemaResult<()> {
        let open = find_open_paren(e, at)
            .ok_or_else(|| self.malformed("primary key without columns"))?;
        let (columns, close) = key_list(self.sql, e, open)
            .ok_or_else(|| self.malformed("unbalanced primary key"))?;
        self.table.primary_key = Some(PrimaryKeyDef {
            table: self.table.name.clone(),
            columns,
            key_list: slice_text(self.sql, &e[open..=close]).to_string(),
            options: slice_text(self.sql, &e[close + 1..]).to_string(),
            canonical: canonical(slice_text(self.sql, &e[at..])),
        });
        Ok(())
    }

    fn index_constraint(
        &mut self,
        e: &[Lexeme<'_>],
        at: usize,
        symbol: Option<String>,
    ) -> SchemaResult<()> {
        let head = &e[at];
        let category = ["UNIQUE", "FULLTEXT", "SPATIAL"]
            .into_iter()
            .find(|kw| head.is_keyword(kw))
            .map(str::to_string);
        let mut i = at + 1;
        if category.is_some()
            && e.get(i)
                .is_some_and(|l| l.is_keyword("INDEX") || l.is_keyword("KEY"))
        {
            i += 1;
        }

        let mut name = symbol;
        if e.get(i).is_some_and(|l| !l.is_punct('(') && !l.is_keyword("USING")) {
            name = e[i].ident().or(name);
            i += 1;
        }
        let mut index_type = None;
        if e.get(i).is_some_and(|l| l.is_keyword("USING")) {
            index_type = e.get(i + 1).map(|t| format!("USING {}", t.text.to_uppercase()));
            i += 2;
        }
        if !e.get(i).is_some_and(|l| l.is_punct('(')) {
            return Err(self.malformed("index without key list"));
        }
        let (keys, close) = key_list(self.sql, e, i)
            .ok_or_else(|| self.malformed("unbalanced index key list"))?;

        let name = match name {
            Some(name) => name,
            None => self.unused_index_name(keys.first().map(String::as_str).unwrap_or("index")),
        };
        let index = IndexConstraintDef {
            name: name.clone(),
            table: self.table.name.clone(),
            category,
            index_type,
            key_list: slice_text(self.sql, &e[i..=close]).to_string(),
            keys,
            options: slice_text(self.sql, &e[close + 1..]).to_string(),
            canonical: canonical(slice_text(self.sql, e)),
        };
        self.table.index_constraints.insert(name.to_lowercase(), index);
        Ok(())
    }

    /// MySQL names an unnamed index after its first column, suffixing `_2`,
    /// `_3`, ... on collision
    fn unused_index_name(&self, base: &str) -> String {
        let taken = |n: &str| self.table.index_constraints.contains_key(&n.to_lowercase());
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn foreign_key(
        &mut self,
        e: &[Lexeme<'_>],
        at: usize,
        symbol: Option<String>,
    ) -> SchemaResult<()> {
        let mut i = at + 2; // FOREIGN KEY
        let mut name = symbol;
        if e.get(i).is_some_and(|l| !l.is_punct('(')) {
            name = name.or_else(|| e[i].ident());
            i += 1;
        }
        let (columns, close) = e
            .get(i)
            .filter(|l| l.is_punct('('))
            .and_then(|_| key_list(self.sql, e, i))
            .ok_or_else(|| self.malformed("foreign key without columns"))?;

        let refs = (close + 1..e.len())
            .find(|&j| e[j].is_keyword("REFERENCES"))
            .ok_or_else(|| self.malformed("foreign key without REFERENCES"))?;
        let (mut target, after) = dotted_name(e, refs + 1)
            .ok_or_else(|| self.malformed("foreign key without referenced table"))?;
        let referenced_table = target.pop().unwrap_or_default();
        let referenced_columns = match e.get(after) {
            Some(l) if l.is_punct('(') => key_list(self.sql, e, after)
                .map(|(cols, _)| cols)
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let name = name.unwrap_or_else(|| {
            format!("{}_ibfk_{}", self.table.name, self.table.foreign_keys.len() + 1)
        });
        let key = name.to_lowercase();
        if self.table.foreign_keys.contains_key(&key) {
            return Err(SchemaError::DuplicateForeignKey(key));
        }
        self.table.foreign_keys.insert(
            key,
            ForeignKeyDef {
                name,
                table: self.table.name.clone(),
                columns,
                referenced_table: self.names.key(&referenced_table),
                referenced_columns,
                definition: slice_text(self.sql, e).to_string(),
                canonical: canonical(slice_text(self.sql, e)),
            },
        );
        Ok(())
    }

    fn check(&mut self, e: &[Lexeme<'_>], symbol: Option<String>) -> SchemaResult<()> {
        let n = e.len();
        let enforced = !(n >= 2 && e[n - 2].is_keyword("NOT") && e[n - 1].is_keyword("ENFORCED"));
        let name = symbol
            .unwrap_or_else(|| format!("{}_chk_{}", self.table.name, self.table.checks.len() + 1));
        self.table.checks.insert(
            name.to_lowercase(),
            CheckDef {
                name,
                table: self.table.name.clone(),
                enforced,
                definition: slice_text(self.sql, e).to_string(),
                canonical: canonical(slice_text(self.sql, e)),
            },
        );
        Ok(())
    }
}

fn is_constraint_keyword(l: &Lexeme<'_>) -> bool {
    ["PRIMARY", "UNIQUE", "FOREIGN", "CHECK"]
        .into_iter()
        .any(|kw| l.is_keyword(kw))
}

/// End of a DEFAULT value: a signed literal, a parenthesized expression, or
/// a word optionally followed by an argument list
fn default_value_end(e: &[Lexeme<'_>], at: usize) -> usize {
    let Some(first) = e.get(at) else {
        return at;
    };
    if first.is_punct('-') || first.is_punct('+') {
        return default_value_end(e, at + 1);
    }
    let mut end = skip_group(e, at);
    // 1.5 scans as `1` `.` `5`
    while end + 1 < e.len() && e[end].is_punct('.') {
        end += 2;
    }
    if first.kind == LexemeKind::Word && e.get(end).is_some_and(|l| l.is_punct('(')) {
        end = skip_group(e, end);
    }
    end
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
