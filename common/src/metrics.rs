use metrics::{describe_gauge, gauge};

pub fn component_info_metric(name: &'static str) {
    static NAME: &str = "parcel_tracker_component_info";

    describe_gauge!(NAME, "Basic information about the component");

    let git_rev = option_env!("GIT_VERSION").unwrap_or("unknown");
    gauge!(NAME, "component" => name, "git_version" => git_rev).set(1);
}

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "parcel_tracker_";

    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const CARRIER_REQUESTS: &str = concatcp!(METRIC_NAME_PREFIX, "carrier_requests");
    pub const NOTIFICATIONS_SENT: &str = concatcp!(METRIC_NAME_PREFIX, "notifications_sent");
    pub const SHIPMENTS_TRACKED: &str = concatcp!(METRIC_NAME_PREFIX, "shipments_tracked");
    pub const UPDATE_PASSES: &str = concatcp!(METRIC_NAME_PREFIX, "update_passes");
}

pub mod failures {
    #[derive(Debug, Clone, Eq, Hash, PartialEq)]
    pub enum FailureKind {
        CarrierRequestFailed,
        NotificationFailed,
        StoreWriteFailed,
        UnableToDecodeResponse,
    }

    // Label building function
    pub fn get_label(failure_kind: FailureKind) -> (&'static str, &'static str) {
        (
            "failure_kind",
            match failure_kind {
                FailureKind::CarrierRequestFailed => "carrier_request_failed",
                FailureKind::NotificationFailed => "notification_failed",
                FailureKind::StoreWriteFailed => "store_write_failed",
                FailureKind::UnableToDecodeResponse => "unable_to_decode_response",
            },
        )
    }
}
