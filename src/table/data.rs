//! Mortality table records as supplied by a table source

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sex classification of a table, or of a person looking for one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    /// Table covers both sexes (or does not say)
    All,
    Male,
    Female,
}

impl Sex {
    /// Qualified tag used in persisted catalogs
    pub fn encode(self) -> &'static str {
        match self {
            Sex::All => "Sex.ALL",
            Sex::Male => "Sex.MALE",
            Sex::Female => "Sex.FEMALE",
        }
    }

    /// Reverse of [`Sex::encode`]
    pub fn decode(tag: &str) -> Option<Sex> {
        match tag {
            "Sex.ALL" => Some(Sex::All),
            "Sex.MALE" => Some(Sex::Male),
            "Sex.FEMALE" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Whether a table tagged `self` can serve a person of sex `target`
    pub fn serves(self, target: Sex) -> bool {
        self == target || self == Sex::All
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sex::All => "all",
            Sex::Male => "male",
            Sex::Female => "female",
        };
        f.write_str(label)
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode())
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Sex::decode(&tag)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown sex tag: {}", tag)))
    }
}

/// Descriptive metadata attached to the whole table
///
/// Every text field may be empty; the inference heuristics treat an empty
/// field as "no match".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentClassification {
    #[serde(default)]
    pub table_identity: u32,

    /// Table type, e.g. "Healthy Lives Mortality" or "Life Table"
    #[serde(default)]
    pub content_type: String,

    #[serde(default)]
    pub table_name: String,

    #[serde(default)]
    pub table_reference: String,

    #[serde(default)]
    pub table_description: String,

    #[serde(default)]
    pub key_words: Vec<String>,
}

/// One axis of a sub-table with its nominal scale bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AxisDef {
    #[serde(default)]
    pub scale_type: String,

    pub min_scale_value: u32,

    pub max_scale_value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableMetadata {
    #[serde(default)]
    pub axis_defs: Vec<AxisDef>,
}

/// A single sub-table: per-index values plus axis metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubTable {
    #[serde(default)]
    pub meta_data: TableMetadata,

    /// Values keyed by 1-based index; index 1 is the table's minimum age
    #[serde(default)]
    pub values: BTreeMap<u32, f64>,
}

impl SubTable {
    /// Build a sub-table whose values start at `min_age` (index 1)
    pub fn from_values(min_age: u32, values: &[f64]) -> Self {
        let max_age = min_age + values.len().saturating_sub(1) as u32;
        Self {
            meta_data: TableMetadata {
                axis_defs: vec![AxisDef {
                    scale_type: "Age".to_string(),
                    min_scale_value: min_age,
                    max_scale_value: max_age,
                }],
            },
            values: values
                .iter()
                .enumerate()
                .map(|(i, &value)| (i as u32 + 1, value))
                .collect(),
        }
    }

    /// Value at a 1-based index
    pub fn value(&self, index: u32) -> Option<f64> {
        self.values.get(&index).copied()
    }
}

/// A complete table record: classification plus one or more sub-tables
///
/// The first sub-table is the primary one used for per-age lookups; further
/// sub-tables hold alternative granularities (cohort/life tables).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MortalityTable {
    pub content_classification: ContentClassification,

    #[serde(default)]
    pub tables: Vec<SubTable>,
}

impl MortalityTable {
    pub fn new(content_classification: ContentClassification, tables: Vec<SubTable>) -> Self {
        Self {
            content_classification,
            tables,
        }
    }

    pub fn id(&self) -> u32 {
        self.content_classification.table_identity
    }

    pub fn primary(&self) -> Option<&SubTable> {
        self.tables.first()
    }

    /// First axis of the primary sub-table
    pub fn primary_axis(&self) -> Option<&AxisDef> {
        self.primary().and_then(|t| t.meta_data.axis_defs.first())
    }

    /// Case-insensitive comparison against the content type
    pub fn has_content_type(&self, content_type: &str) -> bool {
        self.content_classification
            .content_type
            .eq_ignore_ascii_case(content_type)
    }
}
