//! Typed failures raised while resolving provider columns.
//!
//! Everything else in the crate reports through `anyhow`; these variants stay
//! downcastable so callers (and tests) can tell a missing column apart from an
//! I/O failure.

use thiserror::Error;

use crate::fields::{Field, TableKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "Could not find column for {field} in {table} table (candidates={candidates:?}); available columns: {available:?}"
    )]
    MissingColumn {
        table: TableKind,
        field: Field,
        candidates: Vec<String>,
        available: Vec<String>,
    },

    #[error(
        "Season/season_code column not found in {table} table (candidates={candidates:?}); available columns: {available:?}"
    )]
    MissingSeasonColumn {
        table: TableKind,
        candidates: Vec<String>,
        available: Vec<String>,
    },

    #[error("Field catalog for {table} table must declare required field {field}")]
    InvalidCatalog { table: TableKind, field: Field },
}
