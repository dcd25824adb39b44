//! Runtime settings read from environment variables
//!
//! Recognised variables (all optional):
//!   MORTALITY_TABLE_DIR, MORTALITY_CATALOG, LIFE_CATALOG,
//!   SCAN_MAX_MISSES, SCAN_MIN_ID

use std::env;
use std::path::PathBuf;

use crate::catalog::store::{DEFAULT_LIFE_CATALOG, DEFAULT_MORTALITY_CATALOG};
use crate::catalog::ScanPolicy;
use crate::table::source::DEFAULT_TABLE_DIR;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory of `<id>.json` table files
    pub table_dir: PathBuf,
    /// Catalog of healthy lives mortality tables
    pub mortality_catalog: PathBuf,
    /// Catalog of life tables
    pub life_catalog: PathBuf,
    pub scan_policy: ScanPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_dir: PathBuf::from(DEFAULT_TABLE_DIR),
            mortality_catalog: PathBuf::from(DEFAULT_MORTALITY_CATALOG),
            life_catalog: PathBuf::from(DEFAULT_LIFE_CATALOG),
            scan_policy: ScanPolicy::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for missing
    /// or unparseable values
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);
        let number = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            table_dir: path("MORTALITY_TABLE_DIR", defaults.table_dir),
            mortality_catalog: path("MORTALITY_CATALOG", defaults.mortality_catalog),
            life_catalog: path("LIFE_CATALOG", defaults.life_catalog),
            scan_policy: ScanPolicy {
                max_consecutive_misses: number(
                    "SCAN_MAX_MISSES",
                    defaults.scan_policy.max_consecutive_misses,
                ),
                min_id_before_miss_check: number(
                    "SCAN_MIN_ID",
                    defaults.scan_policy.min_id_before_miss_check,
                ),
            },
        }
    }
}
