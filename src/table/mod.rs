//! Mortality table data model and table sources

mod data;
pub mod source;

pub use data::{AxisDef, ContentClassification, MortalityTable, Sex, SubTable, TableMetadata};
pub use source::{DirectorySource, Fetch, MemorySource, TableSource};
