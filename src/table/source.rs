//! Table sources: fetch a table record by numeric id
//!
//! A source distinguishes "no table at this id" (`Fetch::NotFound`), which the
//! catalog scan treats as routine, from every other failure, which propagates.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::MortalityTable;
use crate::error::SourceError;

/// Default directory holding `<id>.json` table files
pub const DEFAULT_TABLE_DIR: &str = "data/tables";

/// Outcome of a fetch that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Found(MortalityTable),
    NotFound,
}

impl Fetch {
    pub fn found(self) -> Option<MortalityTable> {
        match self {
            Fetch::Found(table) => Some(table),
            Fetch::NotFound => None,
        }
    }
}

/// Anything that can supply tables by id
pub trait TableSource {
    fn fetch(&self, id: u32) -> Result<Fetch, SourceError>;
}

/// Tables stored as one JSON file per id in a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: u32) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl TableSource for DirectorySource {
    fn fetch(&self, id: u32) -> Result<Fetch, SourceError> {
        let path = self.path_for(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Fetch::NotFound),
            Err(error) => return Err(SourceError::Io { path, error }),
        };

        let mut table: MortalityTable =
            serde_json::from_str(&text).map_err(|error| SourceError::Malformed { id, error })?;

        // The file name is authoritative for the id
        table.content_classification.table_identity = id;
        Ok(Fetch::Found(table))
    }
}

/// In-memory source, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<u32, MortalityTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, mut table: MortalityTable) {
        table.content_classification.table_identity = id;
        self.tables.insert(id, table);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableSource for MemorySource {
    fn fetch(&self, id: u32) -> Result<Fetch, SourceError> {
        Ok(match self.tables.get(&id) {
            Some(table) => Fetch::Found(table.clone()),
            None => Fetch::NotFound,
        })
    }
}
