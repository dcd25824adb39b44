//! Mortality Tables - survival estimates from standardized actuarial tables
//!
//! This library provides:
//! - Inference of age range, publication year and sex from table text
//! - Point, daily and multi-year mortality from rate tables
//! - Share of a birth cohort outlived, from life tables
//! - A catalog of tables tagged by year and sex, built by scanning a table
//!   source, and selection of the best table for a person

pub mod error;
pub mod table;
pub mod inference;
pub mod mortality;
pub mod catalog;
pub mod config;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use error::{CatalogError, MortalityError, SourceError};
pub use table::{DirectorySource, Fetch, MortalityTable, Sex, TableSource};
pub use inference::TableFacts;
pub use mortality::{day_mortality, range_mortality, year_mortality, year_outlived};
pub use catalog::{Catalog, CatalogEntry, ScanPolicy};
pub use config::Settings;
pub use report::{format_percent, Estimate};
