//! sl-core - Core library for Sluice
//!
//! This crate provides the shared leaf types used by every analysis:
//! identifier normalization, the name-comparison strategy, the masking
//! lattice, the schema catalog provider interface, and analyzer config.

pub mod catalog;
pub mod config;
pub mod error;
pub mod identifier;
pub mod masking;
pub mod name_cmp;

pub use catalog::{
    CachedCatalog, ColumnMetadata, DatabaseMetadata, SchemaCatalog, SchemaMetadata,
    StaticCatalog, TableMetadata, ViewMetadata,
};
pub use config::AnalyzerConfig;
pub use error::{CoreError, CoreResult};
pub use identifier::{normalize_identifier, quote_identifier, split_qualified, QualifiedName};
pub use masking::{MaskingAttributes, MaskingLevel};
pub use name_cmp::NameComparison;
