//! Regulation store - shared, swappable snapshot of the static data
//!
//! Readers take an `Arc` of the current snapshot and evaluate against it
//! without holding the lock. `reload` builds a complete new snapshot and
//! swaps it in, so no reader ever sees a half-loaded table.

use super::matcher::evaluate;
use super::names::SpeciesDictionary;
use super::table::RegulationTable;
use super::types::{RegulationDataError, ZoneId};
use aquascan_common::RegulationVerdict;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Regulation table and species dictionary loaded together
#[derive(Debug, Default)]
pub struct RegulationData {
    pub table: RegulationTable,
    pub dictionary: SpeciesDictionary,
}

impl RegulationData {
    pub fn new(table: RegulationTable, dictionary: SpeciesDictionary) -> Self {
        Self { table, dictionary }
    }

    pub fn evaluate(
        &self,
        scientific_name: &str,
        common_name: Option<&str>,
        zone: ZoneId,
    ) -> RegulationVerdict {
        evaluate(scientific_name, common_name, zone, &self.table, &self.dictionary)
    }
}

pub struct RegulationStore {
    regulations_path: PathBuf,
    species_names_path: PathBuf,
    data: RwLock<Arc<RegulationData>>,
}

impl RegulationStore {
    /// Load both data files
    pub async fn load(
        regulations_path: impl Into<PathBuf>,
        species_names_path: impl Into<PathBuf>,
    ) -> Result<Self, RegulationDataError> {
        let regulations_path = regulations_path.into();
        let species_names_path = species_names_path.into();
        let data = Self::read(&regulations_path, &species_names_path).await?;

        Ok(Self {
            regulations_path,
            species_names_path,
            data: RwLock::new(Arc::new(data)),
        })
    }

    /// Wrap already-built data (no files behind it; `reload` will fail)
    pub fn from_data(data: RegulationData) -> Self {
        Self {
            regulations_path: PathBuf::new(),
            species_names_path: PathBuf::new(),
            data: RwLock::new(Arc::new(data)),
        }
    }

    async fn read(
        regulations_path: &Path,
        species_names_path: &Path,
    ) -> Result<RegulationData, RegulationDataError> {
        let table = RegulationTable::load_from_file(regulations_path).await?;
        let dictionary = SpeciesDictionary::load_from_file(species_names_path).await?;
        Ok(RegulationData::new(table, dictionary))
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Arc<RegulationData> {
        self.data.read().await.clone()
    }

    /// Re-read both files and replace the snapshot wholesale.
    /// On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<RegulationData>, RegulationDataError> {
        let data = Arc::new(Self::read(&self.regulations_path, &self.species_names_path).await?);
        *self.data.write().await = data.clone();
        tracing::info!("Regulation data reloaded: {}", data.table.stats());
        Ok(data)
    }

    pub async fn evaluate(
        &self,
        scientific_name: &str,
        common_name: Option<&str>,
        zone: ZoneId,
    ) -> RegulationVerdict {
        self.snapshot().await.evaluate(scientific_name, common_name, zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquascan_common::VerdictKind;
    use tempfile::TempDir;

    async fn write_data(dir: &TempDir, regulations: &str) -> (PathBuf, PathBuf) {
        let regulations_path = dir.path().join("zone_regulations.json");
        let names_path = dir.path().join("species_names.json");
        tokio::fs::write(&regulations_path, regulations).await.unwrap();
        tokio::fs::write(&names_path, r#"{"Sander vitreus": "Walleye"}"#).await.unwrap();
        (regulations_path, names_path)
    }

    #[tokio::test]
    async fn test_load_and_evaluate() {
        let dir = TempDir::new().unwrap();
        let (regs, names) = write_data(
            &dir,
            r#"{"zone_5": [{"species": "Walleye", "catch_limit": "6 per day", "note": "Not specified", "fishing_device": "Not specified"}]}"#,
        )
        .await;

        let store = RegulationStore::load(regs, names).await.unwrap();
        let verdict = store.evaluate("Sander vitreus", None, ZoneId(5)).await;
        assert_eq!(verdict.kind, VerdictKind::Allowed);
    }

    #[tokio::test]
    async fn test_reload_replaces_snapshot() {
        let dir = TempDir::new().unwrap();
        let (regs, names) = write_data(
            &dir,
            r#"{"zone_5": [{"species": "Walleye", "catch_limit": "6 per day"}]}"#,
        )
        .await;
        let store = RegulationStore::load(&regs, &names).await.unwrap();
        let before = store.snapshot().await;

        tokio::fs::write(
            &regs,
            r#"{"zone_5": [{"species": "Walleye", "catch_limit": "Prohibited"}]}"#,
        )
        .await
        .unwrap();
        store.reload().await.unwrap();

        // Old snapshot is untouched, new one sees the change
        assert_eq!(
            before.evaluate("Sander vitreus", None, ZoneId(5)).kind,
            VerdictKind::Allowed
        );
        assert_eq!(
            store.evaluate("Sander vitreus", None, ZoneId(5)).await.kind,
            VerdictKind::Prohibited
        );
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let (regs, names) = write_data(
            &dir,
            r#"{"zone_5": [{"species": "Walleye", "catch_limit": "6 per day"}]}"#,
        )
        .await;
        let store = RegulationStore::load(&regs, &names).await.unwrap();

        tokio::fs::write(&regs, "not json").await.unwrap();
        assert!(store.reload().await.is_err());
        assert_eq!(
            store.evaluate("Sander vitreus", None, ZoneId(5)).await.kind,
            VerdictKind::Allowed
        );
    }
}
