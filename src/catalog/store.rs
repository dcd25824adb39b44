//! Catalog persistence
//!
//! One catalog per file, a JSON object keyed by table id:
//!
//! ```text
//! {
//!   "3153": { "year": 2012, "sex": "Sex.FEMALE" }
//! }
//! ```

use std::fs;
use std::path::Path;

use log::info;

use super::Catalog;
use crate::error::CatalogError;

/// Default catalog of healthy lives mortality tables
pub const DEFAULT_MORTALITY_CATALOG: &str = "data/catalog_mortality.json";

/// Default catalog of life tables
pub const DEFAULT_LIFE_CATALOG: &str = "data/catalog_life.json";

/// Load a whole catalog file into memory
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|error| CatalogError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    let catalog: Catalog = serde_json::from_str(&text)?;
    info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Write a catalog, replacing any existing file
pub fn save_catalog<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<(), CatalogError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(catalog)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| CatalogError::Io {
            path: parent.to_path_buf(),
            error,
        })?;
    }
    fs::write(path, text).map_err(|error| CatalogError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    info!("Saved {} catalog entries to {}", catalog.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::table::Sex;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");

        let catalog: Catalog = [
            (10, CatalogEntry { year: 2015, sex: Sex::Female }),
            (11, CatalogEntry { year: 0, sex: Sex::All }),
        ]
        .into_iter()
        .collect();

        save_catalog(&catalog, &path).unwrap();
        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog: Catalog = [(3153, CatalogEntry { year: 2012, sex: Sex::Male })]
            .into_iter()
            .collect();
        save_catalog(&catalog, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["3153"]["year"], 2012);
        assert_eq!(value["3153"]["sex"], "Sex.MALE");
    }

    #[test]
    fn test_load_handwritten_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"1": {"year": 1980, "sex": "Sex.ALL"}, "2": {"year": 2001, "sex": "Sex.FEMALE"}}"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.select(Sex::Female, 2000), Some(2));
    }

    #[test]
    fn test_unknown_sex_tag_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"1": {"year": 1980, "sex": "Sex.OTHER"}}"#).unwrap();

        assert!(matches!(load_catalog(&path), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
