//! Table metadata inference from free-text fields
//!
//! Table records carry structured axis bounds, but these are less reliable
//! than what the authors wrote in the description. Each fact is derived by a
//! pure text function (usable on its own) and a table-level wrapper that
//! decides which fields to read and what to fall back on:
//!
//! - Minimum/maximum age: description text, else the primary axis bounds
//! - Publication year: earliest year found in name, reference, description
//! - Sex: "female" in name or description wins, then "male", else all

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::table::{MortalityTable, Sex};

static MINIMUM_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)minimum\s+age(?:\s+of|\s+is)?\s*[:=]?\s*(\d{1,3})").unwrap()
});

static MAXIMUM_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)maximum\s+age(?:\s+of|\s+is)?\s*[:=]?\s*(\d{1,3})").unwrap()
});

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[12]\d{3}").unwrap());

static FEMALE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)female").unwrap());

// "male" not preceded by "e"; only consulted after FEMALE has failed
static MALE: LazyLock<fancy_regex::Regex> =
    LazyLock::new(|| fancy_regex::Regex::new(r"(?i)(?<!e)male").unwrap());

/// Facts inferred for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFacts {
    pub min_age: u32,
    pub max_age: u32,
    /// Publication year, 0 when unknown
    pub year: i32,
    pub sex: Sex,
}

impl TableFacts {
    pub fn infer(table: &MortalityTable) -> Self {
        Self {
            min_age: minimum_age(table),
            max_age: maximum_age(table),
            year: table_year(table),
            sex: table_sex(table),
        }
    }
}

fn capture_age(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// "Minimum age" followed by up to three digits
pub fn parse_minimum_age(text: &str) -> Option<u32> {
    capture_age(&MINIMUM_AGE, text)
}

/// "Maximum age" followed by up to three digits
pub fn parse_maximum_age(text: &str) -> Option<u32> {
    capture_age(&MAXIMUM_AGE, text)
}

/// Earliest of the four-digit numbers starting with 1 or 2
pub fn parse_year(text: &str) -> Option<i32> {
    YEAR.find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .min()
}

/// Female if "female" appears, else male if a standalone "male" appears
pub fn parse_sex(text: &str) -> Option<Sex> {
    if FEMALE.is_match(text) {
        Some(Sex::Female)
    } else if MALE.is_match(text).unwrap_or(false) {
        Some(Sex::Male)
    } else {
        None
    }
}

/// Minimum modeled age: description text first, then the primary axis
pub fn minimum_age(table: &MortalityTable) -> u32 {
    let description = &table.content_classification.table_description;
    parse_minimum_age(description).unwrap_or_else(|| match table.primary_axis() {
        Some(axis) => axis.min_scale_value,
        None => {
            warn!("table {} has no minimum age in text or axis", table.id());
            0
        }
    })
}

/// Maximum modeled age: description text first, then the primary axis
pub fn maximum_age(table: &MortalityTable) -> u32 {
    let description = &table.content_classification.table_description;
    parse_maximum_age(description).unwrap_or_else(|| match table.primary_axis() {
        Some(axis) => axis.max_scale_value,
        None => {
            warn!("table {} has no maximum age in text or axis", table.id());
            0
        }
    })
}

/// Earliest year mentioned anywhere in the name, reference or description;
/// 0 if none
pub fn table_year(table: &MortalityTable) -> i32 {
    let content = &table.content_classification;
    let year = [
        &content.table_name,
        &content.table_reference,
        &content.table_description,
    ]
    .into_iter()
    .filter_map(|field| parse_year(field))
    .min()
    .unwrap_or(0);

    debug!("table {} year inferred as {}", table.id(), year);
    year
}

/// Sex covered by the table, read from its name and description
pub fn table_sex(table: &MortalityTable) -> Sex {
    let content = &table.content_classification;
    let fields = [&content.table_name, &content.table_description];

    // Female must be tried on every field before male is tried on any
    let sex = if fields.iter().any(|field| FEMALE.is_match(field)) {
        Sex::Female
    } else if fields
        .iter()
        .any(|field| MALE.is_match(field).unwrap_or(false))
    {
        Sex::Male
    } else {
        Sex::All
    };

    debug!("table {} sex inferred as {}", table.id(), sex);
    sex
}
