use serde::{Deserialize, Serialize};

/// One tracked shipment as served over the wire.
///
/// Field names follow the JSON produced by the tracking service, so this
/// type deserialises the `/trackings` payload directly. `last_update` and
/// `last_update_timestamp` are service-side extras; a minimal record of
/// just `tracking_number` and `status` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub tracking_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_name: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(
        rename = "maxProgress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
}

impl ShipmentRecord {
    pub fn new(tracking_number: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            tracking_name: None,
            status: status.into(),
            progress: None,
            max_progress: None,
            last_update: None,
            last_update_timestamp: None,
        }
    }

    /// The human-facing name, if one was assigned. An empty string counts
    /// as unassigned.
    pub fn display_name(&self) -> Option<&str> {
        self.tracking_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Row label: the package name with the tracking number in
    /// parentheses, or the bare tracking number when no name is set.
    pub fn display_label(&self) -> String {
        match self.display_name() {
            Some(name) => format!("{} ({})", name, self.tracking_number),
            None => self.tracking_number.clone(),
        }
    }

    /// Delivery progress as a whole percentage, clamped to 0..=100.
    ///
    /// Defined only when both progress fields are present and the maximum
    /// is strictly positive.
    pub fn progress_percent(&self) -> Option<u8> {
        let progress = self.progress?;
        let max_progress = self.max_progress?;
        if max_progress <= 0.0 {
            return None;
        }
        let percent = (progress / max_progress * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn label_prefers_name_with_number_in_parentheses() {
        let mut record = ShipmentRecord::new("00340434161094000001", "In delivery");
        record.tracking_name = Some("New shoes".to_string());
        assert_eq!(
            record.display_label(),
            "New shoes (00340434161094000001)"
        );
    }

    #[test]
    fn label_is_bare_number_without_name() {
        let record = ShipmentRecord::new("A1", "in transit");
        assert_eq!(record.display_label(), "A1");
    }

    #[test]
    fn empty_name_counts_as_unassigned() {
        let mut record = ShipmentRecord::new("A1", "in transit");
        record.tracking_name = Some(String::new());
        assert_eq!(record.display_label(), "A1");
    }

    #[test]
    fn progress_three_of_four_is_75_percent() {
        let mut record = ShipmentRecord::new("A1", "in transit");
        record.progress = Some(3.0);
        record.max_progress = Some(4.0);
        assert_eq!(record.progress_percent(), Some(75));
    }

    #[test]
    fn zero_max_progress_yields_no_percentage() {
        let mut record = ShipmentRecord::new("A1", "in transit");
        record.progress = Some(3.0);
        record.max_progress = Some(0.0);
        assert_eq!(record.progress_percent(), None);
    }

    #[test]
    fn missing_progress_fields_yield_no_percentage() {
        let record = ShipmentRecord::new("A1", "in transit");
        assert_eq!(record.progress_percent(), None);
    }

    #[test]
    fn overshooting_progress_clamps_to_100() {
        let mut record = ShipmentRecord::new("A1", "delivered");
        record.progress = Some(9.0);
        record.max_progress = Some(4.0);
        assert_eq!(record.progress_percent(), Some(100));
    }

    #[test]
    fn deserialises_wire_field_names() {
        let record: ShipmentRecord = serde_json::from_str(
            r#"{
                "tracking_number": "00340434161094000001",
                "tracking_name": "New shoes",
                "status": "In delivery",
                "progress": 3,
                "maxProgress": 4
            }"#,
        )
        .expect("record should deserialise");
        assert_eq!(record.progress_percent(), Some(75));
        assert_eq!(record.tracking_name.as_deref(), Some("New shoes"));
    }

    #[test]
    fn minimal_record_deserialises() {
        let record: ShipmentRecord =
            serde_json::from_str(r#"{"tracking_number": "A1", "status": "in transit"}"#)
                .expect("record should deserialise");
        assert_eq!(record.tracking_number, "A1");
        assert_eq!(record.progress_percent(), None);
    }
}
