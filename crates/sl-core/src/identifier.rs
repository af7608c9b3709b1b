//! MySQL identifier normalization
//!
//! Canonicalizes quoted and qualified names so that the schema builder, the
//! differ and the lineage extractor all compare the same strings.

use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Strip one level of identifier quoting.
///
/// Backtick and double-quote quoting are both accepted; doubled quote
/// characters inside the quotes collapse to one. Unquoted input is returned
/// unchanged.
///
/// # Examples
/// ```
/// use sl_core::identifier::normalize_identifier;
/// assert_eq!(normalize_identifier("`orders`"), "orders");
/// assert_eq!(normalize_identifier("`a``b`"), "a`b");
/// assert_eq!(normalize_identifier("plain"), "plain");
/// ```
pub fn normalize_identifier(raw: &str) -> String {
    let raw = raw.trim();
    for quote in ['`', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            let doubled: String = [quote, quote].iter().collect();
            return inner.replace(&doubled, &quote.to_string());
        }
    }
    raw.to_string()
}

/// Split a dotted name into normalized parts, ignoring dots inside quotes.
///
/// # Examples
/// ```
/// use sl_core::identifier::split_qualified;
/// assert_eq!(split_qualified("`db`.`my.table`"), vec!["db", "my.table"]);
/// ```
pub fn split_qualified(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in raw.trim().chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '`' || c == '"' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == '.' => {
                parts.push(normalize_identifier(&current));
                current.clear();
            }
            None => current.push(c),
        }
    }
    parts.push(normalize_identifier(&current));
    parts
}

/// Quote an identifier with backticks, doubling embedded backticks.
///
/// # Examples
/// ```
/// use sl_core::identifier::quote_identifier;
/// assert_eq!(quote_identifier("t"), "`t`");
/// assert_eq!(quote_identifier("a`b"), "`a``b`");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// A table or view name with an optional database qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Database part, if the reference was qualified
    pub database: Option<String>,
    /// Object name
    pub name: String,
}

impl QualifiedName {
    /// Create an unqualified name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            name: name.into(),
        }
    }

    /// Create a database-qualified name
    pub fn qualified(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            name: name.into(),
        }
    }

    /// Parse `name` or `db.name`, normalizing quoting on each part
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let parts = split_qualified(raw);
        if parts.iter().any(|p| p.is_empty()) {
            return Err(CoreError::InvalidIdentifier {
                raw: raw.to_string(),
                reason: "empty name part".to_string(),
            });
        }
        match parts.as_slice() {
            [name] => Ok(Self::new(name.clone())),
            [database, name] => Ok(Self::qualified(database.clone(), name.clone())),
            _ => Err(CoreError::InvalidIdentifier {
                raw: raw.to_string(),
                reason: format!("expected at most 2 parts, found {}", parts.len()),
            }),
        }
    }

    /// Build from already-normalized parts, taking the last two.
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        match parts {
            [] => None,
            [name] => Some(Self::new(name.clone())),
            [.., database, name] => Some(Self::qualified(database.clone(), name.clone())),
        }
    }

    /// Database qualifier, or `""` when unqualified
    pub fn database_or_empty(&self) -> &str {
        self.database.as_deref().unwrap_or("")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(db) => write!(f, "{}.{}", quote_identifier(db), quote_identifier(&self.name)),
            None => write!(f, "{}", quote_identifier(&self.name)),
        }
    }
}

#[cfg(test)]
#[path = "identifier_test.rs"]
mod tests;
