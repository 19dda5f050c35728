use parceltrack_common::ShipmentRecord;
use serde_json::Value;

/// Display state of a panel. Exactly one variant holds at any time;
/// transitions drive re-rendering. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Loading,
    Rendered(Vec<ShipmentRecord>),
    Empty,
    /// The payload was valid JSON but not a shipment list; it is shown
    /// pretty-printed rather than treated as an error.
    Fallback(Value),
    Failed(String),
}

impl PanelState {
    /// Classify a successfully fetched payload.
    ///
    /// A non-empty array of shipment-like objects becomes `Rendered` in
    /// input order, an empty array becomes `Empty`, and anything else
    /// degrades to the `Fallback` diagnostic display.
    pub fn from_payload(payload: Value) -> Self {
        match payload {
            Value::Array(items) if items.is_empty() => PanelState::Empty,
            Value::Array(items) => {
                let records: Result<Vec<ShipmentRecord>, _> = items
                    .iter()
                    .map(|item| serde_json::from_value(item.clone()))
                    .collect();
                match records {
                    Ok(records) => PanelState::Rendered(records),
                    Err(_) => PanelState::Fallback(Value::Array(items)),
                }
            }
            other => PanelState::Fallback(other),
        }
    }
}
