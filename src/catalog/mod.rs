//! Catalog of tables tagged by publication year and sex
//!
//! A catalog is built once by scanning a table source id by id, keeping only
//! tables of one content type, and is later queried for the table that best
//! fits a person's sex and the current year.

pub mod store;

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::inference::{table_sex, table_year};
use crate::table::{Fetch, Sex, TableSource};

/// Content type of rate tables used for mortality estimates
pub const HEALTHY_LIVES_MORTALITY: &str = "healthy lives mortality";

/// Content type of cohort tables used for the outlived estimate
pub const LIFE_TABLE: &str = "life table";

/// Inferred tags for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Publication year, 0 when unknown
    pub year: i32,
    pub sex: Sex,
}

/// When a sequential scan of table ids may stop
///
/// Ids are assigned with large gaps early on, so a run of misses only ends
/// the scan once the id has also reached `min_id_before_miss_check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    pub max_consecutive_misses: u32,
    pub min_id_before_miss_check: u32,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_misses: 1000,
            min_id_before_miss_check: 60_000,
        }
    }
}

impl ScanPolicy {
    fn should_stop(&self, id: u32, consecutive_misses: u32) -> bool {
        consecutive_misses >= self.max_consecutive_misses && id >= self.min_id_before_miss_check
    }
}

/// Mapping from table id to its catalog entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<u32, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `source` from id 1 upward, cataloguing every table whose content
    /// type matches `content_type` (case-insensitive)
    ///
    /// A missing id counts as a miss; any other source failure aborts the scan.
    pub fn scan<S: TableSource + ?Sized>(
        source: &S,
        content_type: &str,
        policy: &ScanPolicy,
    ) -> Result<Self, CatalogError> {
        info!(
            "Scanning for '{}' tables (stop after {} misses past id {})",
            content_type, policy.max_consecutive_misses, policy.min_id_before_miss_check
        );

        let mut catalog = Catalog::new();
        let mut consecutive_misses = 0u32;
        let mut found = 0usize;
        let mut id = 1u32;

        loop {
            match source
                .fetch(id)
                .map_err(|error| CatalogError::Source { id, error })?
            {
                Fetch::Found(table) => {
                    consecutive_misses = 0;
                    found += 1;

                    if table.has_content_type(content_type) {
                        let entry = CatalogEntry {
                            year: table_year(&table),
                            sex: table_sex(&table),
                        };
                        if entry.year == 0 {
                            warn!("table {} has no recognisable year", id);
                        }
                        debug!("table {}: year {}, sex {}", id, entry.year, entry.sex);
                        catalog.insert(id, entry);
                    } else {
                        debug!(
                            "table {} skipped: content type '{}'",
                            id, table.content_classification.content_type
                        );
                    }
                }
                Fetch::NotFound => consecutive_misses += 1,
            }

            if id % 10_000 == 0 {
                info!("  ... id {} ({} tables seen, {} catalogued)", id, found, catalog.len());
            }

            if policy.should_stop(id, consecutive_misses) {
                break;
            }
            id = match id.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        info!(
            "Scan stopped at id {}: {} tables seen, {} catalogued",
            id,
            found,
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn insert(&mut self, id: u32, entry: CatalogEntry) {
        self.entries.insert(id, entry);
    }

    pub fn get(&self, id: u32) -> Option<&CatalogEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &CatalogEntry)> {
        self.entries.iter().map(|(&id, entry)| (id, entry))
    }

    /// Id of the table closest in year to `current_year` among tables that
    /// serve `sex`; ties go to the lowest id
    ///
    /// `None` means no table is suitable.
    pub fn select(&self, sex: Sex, current_year: i32) -> Option<u32> {
        self.iter()
            .filter(|(_, entry)| entry.sex.serves(sex))
            .min_by_key(|(_, entry)| (entry.year - current_year).unsigned_abs())
            .map(|(id, _)| id)
    }
}

impl FromIterator<(u32, CatalogEntry)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (u32, CatalogEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::table::{ContentClassification, MemorySource, MortalityTable, SubTable};
    use std::cell::Cell;

    fn table(content_type: &str, name: &str) -> MortalityTable {
        MortalityTable::new(
            ContentClassification {
                content_type: content_type.to_string(),
                table_name: name.to_string(),
                ..Default::default()
            },
            vec![SubTable::from_values(0, &[0.01])],
        )
    }

    /// Wraps a source and records the highest id requested
    struct Tracking<S> {
        inner: S,
        highest: Cell<u32>,
        calls: Cell<u32>,
    }

    impl<S> Tracking<S> {
        fn new(inner: S) -> Self {
            Self {
                inner,
                highest: Cell::new(0),
                calls: Cell::new(0),
            }
        }
    }

    impl<S: TableSource> TableSource for Tracking<S> {
        fn fetch(&self, id: u32) -> Result<Fetch, SourceError> {
            self.highest.set(self.highest.get().max(id));
            self.calls.set(self.calls.get() + 1);
            self.inner.fetch(id)
        }
    }

    struct Broken;

    impl TableSource for Broken {
        fn fetch(&self, id: u32) -> Result<Fetch, SourceError> {
            if id < 3 {
                Ok(Fetch::NotFound)
            } else {
                Err(SourceError::Io {
                    path: "tables/3.json".into(),
                    error: std::io::Error::other("disk on fire"),
                })
            }
        }
    }

    #[test]
    fn test_scan_reaches_tables_past_early_gap() {
        let mut source = MemorySource::new();
        source.insert(1, table("Healthy Lives Mortality", "1980 CSO Male"));
        source.insert(5, table("Healthy Lives Mortality", "2001 VBT Female"));
        source.insert(59_500, table("Healthy Lives Mortality", "2015 VBT"));
        source.insert(60_400, table("Healthy Lives Mortality", "2017 CSO"));
        let source = Tracking::new(source);

        let catalog =
            Catalog::scan(&source, HEALTHY_LIVES_MORTALITY, &ScanPolicy::default()).unwrap();

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(60_400), Some(&CatalogEntry { year: 2017, sex: Sex::All }));
        // Misses reset at 60400, so the scan runs 1000 more ids
        assert_eq!(source.highest.get(), 61_400);
        assert_eq!(source.calls.get(), 61_400);
    }

    #[test]
    fn test_scan_default_policy_stops_at_floor_after_long_gap() {
        let mut source = MemorySource::new();
        source.insert(1, table("Healthy Lives Mortality", "1980 CSO Male"));
        source.insert(5, table("Healthy Lives Mortality", "2001 VBT Female"));
        source.insert(70_000, table("Healthy Lives Mortality", "2017 CSO"));
        let source = Tracking::new(source);

        // Ids 6..=60000 are one run of misses, so the default policy stops at
        // the floor and never sees 70000. This is the intended stop rule.
        let catalog =
            Catalog::scan(&source, HEALTHY_LIVES_MORTALITY, &ScanPolicy::default()).unwrap();
        assert_eq!(source.highest.get(), 60_000);
        assert!(catalog.get(70_000).is_none());

        // Raising the floor past the gap reaches the late table
        let policy = ScanPolicy {
            min_id_before_miss_check: 70_000,
            ..ScanPolicy::default()
        };
        let source = Tracking::new(source.inner);
        let catalog = Catalog::scan(&source, HEALTHY_LIVES_MORTALITY, &policy).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(source.highest.get(), 71_000);
    }

    #[test]
    fn test_scan_honours_miss_threshold_after_floor() {
        let mut source = MemorySource::new();
        source.insert(1, table("Life Table", "A 1990"));
        source.insert(2, table("Life Table", "B 1991"));
        source.insert(6, table("Life Table", "C 1992"));
        let source = Tracking::new(source);

        let policy = ScanPolicy {
            max_consecutive_misses: 3,
            min_id_before_miss_check: 0,
        };
        let catalog = Catalog::scan(&source, LIFE_TABLE, &policy).unwrap();

        // Ids 3, 4, 5 miss, so 6 is never reached
        assert_eq!(source.highest.get(), 5);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(6).is_none());
    }

    #[test]
    fn test_scan_floor_delays_stop() {
        let mut source = MemorySource::new();
        source.insert(1, table("Life Table", "A 1990"));
        let source = Tracking::new(source);

        let policy = ScanPolicy {
            max_consecutive_misses: 3,
            min_id_before_miss_check: 50,
        };
        Catalog::scan(&source, LIFE_TABLE, &policy).unwrap();
        assert_eq!(source.highest.get(), 50);
    }

    #[test]
    fn test_scan_filters_content_type() {
        let mut source = MemorySource::new();
        source.insert(1, table("Life Table", "US Life 2010"));
        source.insert(2, table("Healthy Lives Mortality", "2012 IAM Female"));
        source.insert(3, table("HEALTHY LIVES MORTALITY", "1983 GAM Male"));

        let policy = ScanPolicy {
            max_consecutive_misses: 2,
            min_id_before_miss_check: 0,
        };
        let catalog = Catalog::scan(&source, HEALTHY_LIVES_MORTALITY, &policy).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(1).is_none());
        assert_eq!(catalog.get(2), Some(&CatalogEntry { year: 2012, sex: Sex::Female }));
        assert_eq!(catalog.get(3), Some(&CatalogEntry { year: 1983, sex: Sex::Male }));
    }

    #[test]
    fn test_scan_propagates_unexpected_failure() {
        let err = Catalog::scan(&Broken, LIFE_TABLE, &ScanPolicy::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Source { id: 3, .. }));
    }

    #[test]
    fn test_select_nearest_year_matching_sex() {
        let catalog: Catalog = [
            (10, CatalogEntry { year: 2015, sex: Sex::Female }),
            (11, CatalogEntry { year: 2020, sex: Sex::All }),
            (12, CatalogEntry { year: 1990, sex: Sex::Male }),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.select(Sex::Female, 2021), Some(11));
        assert_eq!(catalog.select(Sex::Male, 1995), Some(12));
        assert_eq!(catalog.select(Sex::Female, 2014), Some(10));
    }

    #[test]
    fn test_select_tie_goes_to_lowest_id() {
        let catalog: Catalog = [
            (7, CatalogEntry { year: 2018, sex: Sex::Male }),
            (3, CatalogEntry { year: 2022, sex: Sex::All }),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.select(Sex::Male, 2020), Some(3));
    }

    #[test]
    fn test_select_no_match() {
        let catalog: Catalog = [(4, CatalogEntry { year: 2000, sex: Sex::Male })]
            .into_iter()
            .collect();

        assert_eq!(catalog.select(Sex::Female, 2020), None);
        assert_eq!(Catalog::new().select(Sex::Male, 2020), None);
    }
}
