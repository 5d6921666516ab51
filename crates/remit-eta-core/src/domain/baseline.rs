//! Static reference delivery times per currency pair.
//!
//! The table is keyed by the exact `"SRC to DST"` spelling produced by
//! [`TestCase::pair_key`](super::fixture::TestCase::pair_key). Lookups are
//! case-sensitive and perform no normalization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::error::{RemitError, Result};

/// A pre-recorded delivery time for one currency pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaselineEntry {
    /// Human-readable duration, e.g. `"2 days and 13 hours"`.
    pub description: String,

    /// Fixed delivery time in hours.
    pub hours: i64,

    /// Arrival date observed when the baseline was recorded.
    pub sample_arrival_date: String,
}

impl BaselineEntry {
    pub fn new(description: &str, hours: i64, sample_arrival_date: &str) -> Self {
        Self {
            description: description.to_string(),
            hours,
            sample_arrival_date: sample_arrival_date.to_string(),
        }
    }
}

/// Baseline delivery times, constructed once and passed explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BaselineTable {
    entries: BTreeMap<String, BaselineEntry>,
}

impl BaselineTable {
    /// Empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reference figures recorded against the live service.
    pub fn reference() -> Self {
        let mut table = Self::empty();
        table.insert(
            "GBP to EUR",
            BaselineEntry::new("2 days and 13 hours", 61, "Monday, Apr 28 at 08:01"),
        );
        table.insert(
            "GBP to USD",
            BaselineEntry::new("2 days and 19 hours", 67, "Monday, Apr 28 at 14:01"),
        );
        table.insert(
            "USD to EUR",
            BaselineEntry::new("1 day and 19 hours", 43, "Sunday, Apr 27 at 14:01"),
        );
        table.insert(
            "USD to GBP",
            BaselineEntry::new("1 day and 13 hours", 37, "Sunday, Apr 27 at 08:01"),
        );
        table.insert(
            "EUR to GBP",
            BaselineEntry::new(
                "less than a day (19 hours)",
                19,
                "Saturday, Apr 26 at 14:01",
            ),
        );
        table.insert(
            "EUR to USD",
            BaselineEntry::new("3 days and 13 hours", 85, "Tuesday, Apr 29 at 08:01"),
        );
        table
    }

    /// Load a table from a JSON object of `"SRC to DST" -> entry`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&content)?;
        table.validate()?;
        Ok(table)
    }

    pub fn insert(&mut self, pair_key: &str, entry: BaselineEntry) {
        self.entries.insert(pair_key.to_string(), entry);
    }

    /// Exact-match lookup.
    pub fn get(&self, pair_key: &str) -> Option<&BaselineEntry> {
        self.entries.get(pair_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BaselineEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for (key, entry) in &self.entries {
            if !key.contains(" to ") {
                return Err(RemitError::InvalidBaseline(format!(
                    "key {:?} is not of the form \"SRC to DST\"",
                    key
                )));
            }
            if entry.hours < 0 {
                return Err(RemitError::InvalidBaseline(format!(
                    "{}: hours must be non-negative, got {}",
                    key, entry.hours
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_gbp_eur_is_61_hours() {
        let table = BaselineTable::reference();
        let entry = table.get("GBP to EUR").expect("GBP to EUR baseline");
        assert_eq!(entry.hours, 61);
        assert_eq!(entry.description, "2 days and 13 hours");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = BaselineTable::reference();
        assert!(table.get("gbp to eur").is_none());
        assert!(table.get("GBP to EUR ").is_none());
        assert!(table.get("GBP->EUR").is_none());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut table = BaselineTable::empty();
        table.insert("GBP to EUR", BaselineEntry::new("x", 1, "y"));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["GBP to EUR"]["hours"], 1);
    }

    #[test]
    fn test_from_json_file_rejects_negative_hours() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        std::fs::write(
            &path,
            r#"{ "GBP to EUR": { "description": "x", "hours": -1, "sample_arrival_date": "y" } }"#,
        )
        .unwrap();
        assert!(BaselineTable::from_json_file(&path).is_err());
    }

    #[test]
    fn test_from_json_file_roundtrips_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let reference = BaselineTable::reference();
        std::fs::write(&path, serde_json::to_string(&reference).unwrap()).unwrap();
        let loaded = BaselineTable::from_json_file(&path).unwrap();
        assert_eq!(loaded, reference);
    }
}
