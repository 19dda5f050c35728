use crate::carrier::{local_timestamp, CarrierError, CarrierUpdate, DhlClient};
use crate::notify::Notifier;
use crate::store::{TrackingEntry, TrackingStore};
use metrics::{counter, gauge};
use parceltrack_common::metrics::{failures, names};
use std::sync::Mutex;
use tracing::{debug, warn};

/// A status transition observed while applying a carrier update.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub tracking_name: Option<String>,
    pub old_status: String,
    pub new_status: String,
}

/// One refresh pass over every tracked shipment.
///
/// The store lock is only held while applying results; carrier requests
/// and notifications run unlocked, so the HTTP interface stays
/// responsive during a pass.
pub async fn run_update_pass(
    store: &Mutex<TrackingStore>,
    carrier: &DhlClient,
    notifier: &Notifier,
    notify_on_change: bool,
) {
    let tracking_numbers = store
        .lock()
        .expect("should be able to lock the tracking store")
        .tracking_numbers();
    debug!("refreshing {} tracked shipments", tracking_numbers.len());

    for tracking_number in tracking_numbers {
        let update = carrier.fetch(&tracking_number).await;
        counter!(names::CARRIER_REQUESTS).increment(1);
        if let Err(error) = &update {
            let failure_kind = match error {
                CarrierError::Decode(_) => failures::FailureKind::UnableToDecodeResponse,
                _ => failures::FailureKind::CarrierRequestFailed,
            };
            counter!(names::FAILURES, &[failures::get_label(failure_kind)]).increment(1);
        }

        let change = {
            let mut store = store
                .lock()
                .expect("should be able to lock the tracking store");
            apply_update(&mut store, &tracking_number, update)
        };

        if notify_on_change {
            if let Some(change) = change {
                notifier
                    .status_changed(
                        &tracking_number,
                        change.tracking_name.as_deref(),
                        &change.old_status,
                        &change.new_status,
                    )
                    .await;
            }
        }
    }

    let store = store
        .lock()
        .expect("should be able to lock the tracking store");
    if let Err(error) = store.save() {
        counter!(
            names::FAILURES,
            &[failures::get_label(failures::FailureKind::StoreWriteFailed)]
        )
        .increment(1);
        warn!("could not persist tracking data: {error}");
    }
    gauge!(names::SHIPMENTS_TRACKED).set(store.len() as f64);
    counter!(names::UPDATE_PASSES).increment(1);
}

/// Fold one carrier result into the store, preserving the package name.
///
/// Returns the status transition when it changed and the shipment is
/// still tracked. A shipment removed mid-pass is left removed.
pub fn apply_update(
    store: &mut TrackingStore,
    tracking_number: &str,
    update: Result<CarrierUpdate, CarrierError>,
) -> Option<StatusChange> {
    let previous = store.get(tracking_number)?.clone();
    let entry = entry_from_update(update, previous.tracking_name.clone());

    let change = (previous.status != entry.status).then(|| StatusChange {
        tracking_name: entry.tracking_name.clone(),
        old_status: previous.status,
        new_status: entry.status.clone(),
    });

    store.insert(tracking_number.to_string(), entry);
    change
}

/// Build a store entry from one carrier result. Failures become an
/// `"Error"` status stamped with the current time, as the overview
/// displays them.
pub fn entry_from_update(
    update: Result<CarrierUpdate, CarrierError>,
    tracking_name: Option<String>,
) -> TrackingEntry {
    match update {
        Ok(update) => TrackingEntry {
            status: update.status,
            tracking_name,
            last_update: Some(update.last_update),
            progress: update.progress,
            max_progress: update.max_progress,
            error: None,
        },
        Err(error) => TrackingEntry {
            status: "Error".to_string(),
            tracking_name,
            last_update: Some(local_timestamp()),
            progress: None,
            max_progress: None,
            error: Some(error.to_string()),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn store_with(tracking_number: &str, entry: TrackingEntry) -> (tempfile::TempDir, TrackingStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = TrackingStore::load(&dir.path().join("trackings.json"));
        store.insert(tracking_number.to_string(), entry);
        (dir, store)
    }

    fn update(status: &str) -> CarrierUpdate {
        CarrierUpdate {
            status: status.to_string(),
            last_update: "01.03.2025 09:30:00".to_string(),
            progress: Some(2.0),
            max_progress: Some(4.0),
        }
    }

    #[test]
    fn status_change_is_reported_and_name_preserved() {
        let entry = TrackingEntry {
            status: "In transport".to_string(),
            tracking_name: Some("New shoes".to_string()),
            ..Default::default()
        };
        let (_dir, mut store) = store_with("A1", entry);

        let change = apply_update(&mut store, "A1", Ok(update("Delivered")));
        assert_eq!(
            change,
            Some(StatusChange {
                tracking_name: Some("New shoes".to_string()),
                old_status: "In transport".to_string(),
                new_status: "Delivered".to_string(),
            })
        );

        let stored = store.get("A1").expect("entry should remain");
        assert_eq!(stored.tracking_name.as_deref(), Some("New shoes"));
        assert_eq!(stored.progress, Some(2.0));
    }

    #[test]
    fn unchanged_status_reports_no_transition() {
        let entry = TrackingEntry {
            status: "In transport".to_string(),
            ..Default::default()
        };
        let (_dir, mut store) = store_with("A1", entry);

        assert_eq!(apply_update(&mut store, "A1", Ok(update("In transport"))), None);
    }

    #[test]
    fn carrier_failure_marks_the_entry_as_error() {
        let entry = TrackingEntry {
            status: "In transport".to_string(),
            ..Default::default()
        };
        let (_dir, mut store) = store_with("A1", entry);

        let change = apply_update(
            &mut store,
            "A1",
            Err(CarrierError::Request("connection refused".to_string())),
        );
        assert!(change.is_some());

        let stored = store.get("A1").expect("entry should remain");
        assert_eq!(stored.status, "Error");
        assert!(stored
            .error
            .as_deref()
            .expect("error message should be recorded")
            .contains("connection refused"));
    }

    #[test]
    fn shipment_removed_mid_pass_stays_removed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = TrackingStore::load(&dir.path().join("trackings.json"));

        assert_eq!(apply_update(&mut store, "A1", Ok(update("Delivered"))), None);
        assert!(store.is_empty());
    }
}
