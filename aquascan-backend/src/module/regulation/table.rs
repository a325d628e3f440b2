//! Regulation table - zone-keyed regulation lists loaded from bundled JSON
//!
//! Data layout: `{ "zone_<N>": [ {species, catch_limit, note, fishing_device}, ... ] }`.
//! The table is immutable once built; reloading builds a new one.

use super::types::{RegulationDataError, RegulationRecord, ZoneId};
use aquascan_common::Regulation;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Immutable zone -> ordered regulations mapping
#[derive(Debug, Clone, Default)]
pub struct RegulationTable {
    zones: BTreeMap<ZoneId, Vec<Regulation>>,
}

impl RegulationTable {
    /// Build directly from zone lists (insertion order of each list is kept)
    pub fn from_zones(zones: impl IntoIterator<Item = (ZoneId, Vec<Regulation>)>) -> Self {
        Self {
            zones: zones.into_iter().collect(),
        }
    }

    /// Load from a JSON file
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RegulationDataError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        tracing::info!("Loading zone regulations from: {}", path_str);

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RegulationDataError::Io {
                path: path_str.clone(),
                source,
            })?;

        let table = Self::parse_json(&content)?;
        tracing::info!("Loaded regulation table: {}", table.stats());

        Ok(table)
    }

    /// Parse JSON content. Bad keys and malformed rows are skipped with a warning.
    pub fn parse_json(content: &str) -> Result<Self, RegulationDataError> {
        let raw: serde_json::Map<String, Value> = serde_json::from_str(content)?;
        let mut zones = BTreeMap::new();

        for (key, value) in raw {
            let Some(zone) = ZoneId::from_key(&key) else {
                tracing::warn!("Skipping unrecognised zone key '{}'", key);
                continue;
            };
            if zones.contains_key(&zone) {
                tracing::warn!(
                    "Duplicate entry for zone {} under key '{}', keeping the first",
                    zone,
                    key
                );
                continue;
            }
            let Value::Array(rows) = value else {
                tracing::warn!("Skipping zone key '{}': expected a list of regulations", key);
                continue;
            };

            let mut regulations = Vec::with_capacity(rows.len());
            for (index, row) in rows.into_iter().enumerate() {
                match serde_json::from_value::<RegulationRecord>(row) {
                    Ok(record) => regulations.push(record.into_regulation()),
                    Err(e) => {
                        tracing::warn!("Error parsing regulation {} of {}: {}", index, key, e)
                    }
                }
            }
            zones.insert(zone, regulations);
        }

        if zones.is_empty() {
            return Err(RegulationDataError::NoZones);
        }

        Ok(Self { zones })
    }

    /// Regulations of a zone in data order
    pub fn zone(&self, zone: ZoneId) -> Option<&[Regulation]> {
        self.zones.get(&zone).map(Vec::as_slice)
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.keys().copied()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            zones: self.zones.len(),
            regulations: self.zones.values().map(Vec::len).sum(),
            zones_with_catch_all: self
                .zones
                .values()
                .filter(|regs| regs.iter().any(Regulation::is_catch_all))
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub zones: usize,
    pub regulations: usize,
    pub zones_with_catch_all: usize,
}

impl std::fmt::Display for TableStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zones: {}, Regulations: {}, Zones with catch-all: {}",
            self.zones, self.regulations, self.zones_with_catch_all
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "zone_3": [
            {"species": "Brook Trout", "catch_limit": "10 per day", "note": "Not specified", "fishing_device": "Not specified"},
            {"species": "Other species", "catch_limit": "2 per day", "note": "Not specified", "fishing_device": "Not specified"}
        ],
        "zone_5": [
            {"species": "Walleye", "catch_limit": "6 per day", "note": "Minimum 32 cm", "fishing_device": "Not specified"},
            {"species": "missing catch limit"}
        ],
        "zone_x": [],
        "metadata": []
    }"#;

    #[test]
    fn test_parse_json() {
        let table = RegulationTable::parse_json(SAMPLE_JSON).unwrap();
        let stats = table.stats();
        assert_eq!(stats.zones, 2);
        assert_eq!(stats.regulations, 3); // malformed row skipped
        assert_eq!(stats.zones_with_catch_all, 1);
    }

    #[test]
    fn test_zone_order_preserved() {
        let table = RegulationTable::parse_json(SAMPLE_JSON).unwrap();
        let zone = table.zone(ZoneId(3)).unwrap();
        assert_eq!(zone[0].species, "Brook Trout");
        assert_eq!(zone[1].species, "Other species");
        assert_eq!(zone[1].note, None);
    }

    #[test]
    fn test_unknown_zone() {
        let table = RegulationTable::parse_json(SAMPLE_JSON).unwrap();
        assert!(table.zone(ZoneId(99)).is_none());
        assert_eq!(table.zone_ids().collect::<Vec<_>>(), vec![ZoneId(3), ZoneId(5)]);
    }

    #[test]
    fn test_non_list_values_are_skipped() {
        let table = RegulationTable::parse_json(
            r#"{
                "zone_5": [{"species": "Walleye", "catch_limit": "6 per day"}],
                "zone_7": {"species": "Northern Pike", "catch_limit": "10 per day"},
                "version": "2025.1",
                "metadata": {"source": "provincial summary"}
            }"#,
        )
        .unwrap();

        assert_eq!(table.zone_ids().collect::<Vec<_>>(), vec![ZoneId(5)]);
        assert_eq!(table.zone(ZoneId(5)).unwrap()[0].species, "Walleye");
    }

    #[test]
    fn test_no_valid_zones_is_error() {
        let result = RegulationTable::parse_json(r#"{"regions": []}"#);
        assert!(matches!(result, Err(RegulationDataError::NoZones)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = RegulationTable::load_from_file("does/not/exist.json").await;
        assert!(matches!(result, Err(RegulationDataError::Io { .. })));
    }
}
