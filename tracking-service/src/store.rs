use parceltrack_common::{ShipmentRecord, TrackingNumber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not write tracking data: {0}")]
    Write(#[from] std::io::Error),
    #[error("could not serialise tracking data: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Last-known carrier state of one tracked shipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(
        rename = "maxProgress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackingEntry {
    pub fn to_record(&self, tracking_number: &str) -> ShipmentRecord {
        ShipmentRecord {
            tracking_number: tracking_number.to_string(),
            tracking_name: self.tracking_name.clone(),
            status: self.status.clone(),
            progress: self.progress,
            max_progress: self.max_progress,
            last_update: self.last_update.clone(),
            last_update_timestamp: None,
        }
    }
}

/// Tracked shipments, keyed by tracking number, persisted as one JSON
/// file across restarts.
pub struct TrackingStore {
    path: PathBuf,
    entries: BTreeMap<TrackingNumber, TrackingEntry>,
}

impl TrackingStore {
    /// Load persisted tracking data. A missing or unreadable file yields
    /// an empty store; it never fails startup.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(
                        "invalid tracking data in {}: {error}, starting empty",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                warn!(
                    "could not read tracking data from {}: {error}, starting empty",
                    path.display()
                );
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn contains(&self, tracking_number: &str) -> bool {
        self.entries.contains_key(tracking_number)
    }

    pub fn get(&self, tracking_number: &str) -> Option<&TrackingEntry> {
        self.entries.get(tracking_number)
    }

    pub fn insert(&mut self, tracking_number: TrackingNumber, entry: TrackingEntry) {
        self.entries.insert(tracking_number, entry);
    }

    pub fn remove(&mut self, tracking_number: &str) -> Option<TrackingEntry> {
        self.entries.remove(tracking_number)
    }

    pub fn tracking_numbers(&self) -> Vec<TrackingNumber> {
        self.entries.keys().cloned().collect()
    }

    pub fn records(&self) -> Vec<ShipmentRecord> {
        self.entries
            .iter()
            .map(|(tracking_number, entry)| entry.to_record(tracking_number))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(status: &str) -> TrackingEntry {
        TrackingEntry {
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn survives_a_save_and_reload_round() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("trackings.json");

        let mut store = TrackingStore::load(&path);
        assert!(store.is_empty());

        let mut named = entry("In delivery");
        named.tracking_name = Some("New shoes".to_string());
        store.insert("00340434161094000001".to_string(), named.clone());
        store.insert("A1".to_string(), entry("in transit"));
        store.save().expect("save should succeed");

        let reloaded = TrackingStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("00340434161094000001"), Some(&named));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("trackings.json");
        std::fs::write(&path, "not json").expect("write file");

        assert!(TrackingStore::load(&path).is_empty());
    }

    #[test]
    fn removal_is_persisted() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("trackings.json");

        let mut store = TrackingStore::load(&path);
        store.insert("A1".to_string(), entry("in transit"));
        store.save().expect("save should succeed");

        assert!(store.remove("A1").is_some());
        assert!(store.remove("A1").is_none());
        store.save().expect("save should succeed");

        assert!(TrackingStore::load(&path).is_empty());
    }

    #[test]
    fn records_carry_tracking_numbers_in_stable_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = TrackingStore::load(&dir.path().join("trackings.json"));
        store.insert("B2".to_string(), entry("delivered"));
        store.insert("A1".to_string(), entry("in transit"));

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tracking_number, "A1");
        assert_eq!(records[1].tracking_number, "B2");
    }
}
