use crate::carrier::{DhlClient, TIMESTAMP_FORMAT};
use crate::store::TrackingStore;
use crate::updater::entry_from_update;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use parceltrack_common::ShipmentRecord;
use serde::Deserialize;
use status_panel::render::{render, HtmlBackend, RenderBackend};
use status_panel::PanelState;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<TrackingStore>>,
    pub carrier: Arc<DhlClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/trackings", get(get_trackings))
        .route("/add", post(add_tracking))
        .route("/delete/:tracking_number", post(delete_tracking))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The current tracking data as JSON, timestamps normalised.
async fn get_trackings(State(state): State<AppState>) -> Json<Vec<ShipmentRecord>> {
    let records = {
        let store = state
            .store
            .lock()
            .expect("should be able to lock the tracking store");
        store.records()
    };
    Json(records.into_iter().map(normalise_record).collect())
}

#[derive(Debug, Deserialize)]
struct AddForm {
    tracking_number: String,
    #[serde(default)]
    package_name: Option<String>,
}

/// Add a new tracking number. Empty and duplicate numbers are silently
/// ignored, matching the form-driven flow of the overview page.
async fn add_tracking(State(state): State<AppState>, Form(form): Form<AddForm>) -> Redirect {
    let tracking_number = form.tracking_number.trim().to_string();
    if tracking_number.is_empty() {
        return Redirect::to("/");
    }
    {
        let store = state
            .store
            .lock()
            .expect("should be able to lock the tracking store");
        if store.contains(&tracking_number) {
            return Redirect::to("/");
        }
    }

    // Initial status fetch before the shipment appears in the store.
    let update = state.carrier.fetch(&tracking_number).await;
    let tracking_name = form.package_name.filter(|name| !name.is_empty());
    let entry = entry_from_update(update, tracking_name);

    let mut store = state
        .store
        .lock()
        .expect("should be able to lock the tracking store");
    store.insert(tracking_number, entry);
    if let Err(error) = store.save() {
        warn!("could not persist tracking data: {error}");
    }

    Redirect::to("/")
}

async fn delete_tracking(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Redirect {
    let mut store = state
        .store
        .lock()
        .expect("should be able to lock the tracking store");
    if store.remove(&tracking_number).is_some() {
        if let Err(error) = store.save() {
            warn!("could not persist tracking data: {error}");
        }
    }
    Redirect::to("/")
}

/// HTML overview of the active shipments, rendered through the panel's
/// markup backend.
async fn overview(State(state): State<AppState>) -> Html<String> {
    let records = {
        let store = state
            .store
            .lock()
            .expect("should be able to lock the tracking store");
        store.records()
    };

    let panel_state = if records.is_empty() {
        PanelState::Empty
    } else {
        PanelState::Rendered(records.into_iter().map(normalise_record).collect())
    };
    let card = HtmlBackend.render(&render(&panel_state));

    Html(overview_page(&card))
}

fn overview_page(card: &str) -> String {
    format!(
        concat!(
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">",
            "<title>Parcel Tracker</title><style>",
            "body{{font-family:sans-serif;max-width:48rem;margin:2rem auto;}}",
            ".row{{padding:0.25rem 0.5rem;}}",
            ".row-dark{{background:#eee;}}",
            ".error{{color:red;}}",
            ".progress{{background:#ddd;height:0.5rem;}}",
            ".progress-fill{{background:#4a6;height:100%;}}",
            "</style></head><body>",
            "{card}",
            "<form method=\"post\" action=\"/add\">",
            "<input name=\"tracking_number\" placeholder=\"Tracking number\" required>",
            "<input name=\"package_name\" placeholder=\"Package name (optional)\">",
            "<button type=\"submit\">Add</button>",
            "</form></body></html>"
        ),
        card = card
    )
}

fn normalise_record(mut record: ShipmentRecord) -> ShipmentRecord {
    if let Some(last_update) = record.last_update.as_deref() {
        let (normalised, timestamp) = normalise_timestamp(last_update);
        record.last_update = Some(normalised);
        record.last_update_timestamp = timestamp;
    }
    record
}

/// Accepts both the service's local stamp format and the RFC 3339 stamps
/// the carrier emits; re-emits the local format plus a unix timestamp.
/// Unparseable stamps pass through with no timestamp.
fn normalise_timestamp(last_update: &str) -> (String, Option<i64>) {
    if let Ok(naive) = NaiveDateTime::parse_from_str(last_update, TIMESTAMP_FORMAT) {
        let timestamp = Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|datetime| datetime.timestamp());
        return (last_update.to_string(), timestamp);
    }

    if let Ok(parsed) = DateTime::parse_from_str(last_update, "%Y-%m-%dT%H:%M:%S%z") {
        return (
            parsed
                .with_timezone(&Local)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            Some(parsed.timestamp()),
        );
    }

    (last_update.to_string(), None)
}
