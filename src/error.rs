//! Error types shared across the table, mortality and catalog modules

use std::path::PathBuf;

use thiserror::Error;

/// Failures from a table source other than "no table at this id"
#[derive(Debug, Error)]
pub enum SourceError {
    /// The table file exists but could not be read
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    /// The table file could not be parsed
    #[error("malformed table {id}: {error}")]
    Malformed {
        id: u32,
        error: serde_json::Error,
    },
}

/// Failures from the mortality calculator
#[derive(Debug, Error, PartialEq)]
pub enum MortalityError {
    /// Age lies outside the ages the table models
    #[error("age {age} is outside the table range [{min}, {max}]")]
    AgeOutOfRange { age: u32, min: u32, max: u32 },

    /// The table has no value stored at the computed index
    #[error("table has no value at index {index}")]
    MissingValue { index: u32 },

    /// The table has no sub-table or no values at all
    #[error("table holds no values")]
    EmptyTable,

    /// The cohort size at the first index is zero
    #[error("cohort pool size is zero")]
    EmptyCohort,
}

/// Failures while building, loading or saving a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source failed with something other than not-found
    #[error("table source failed at id {id}: {error}")]
    Source { id: u32, error: SourceError },

    #[error("I/O error on catalog {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
