//! sl-sql - SQL parsing layer for Sluice
//!
//! This crate wraps sqlparser-rs with a MySQL dialect, splits multi-statement
//! scripts (custom `DELIMITER` directives and compound `BEGIN ... END`
//! bodies included), and maps token positions back to byte offsets.

pub mod dialect;
pub mod error;
pub mod lexeme;
pub mod parser;
pub mod position;
pub mod splitter;
pub mod view;

pub use dialect::{MySqlDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
pub use position::{LineIndex, Position};
pub use splitter::{split, Statement};
pub use view::ViewDefinition;
