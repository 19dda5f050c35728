pub mod metrics;
pub mod record;

pub use record::ShipmentRecord;

pub type TrackingNumber = String;

/// Poll cadence the panel falls back to when the configuration names none.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Refresh cadence the tracking service falls back to, in minutes.
pub const DEFAULT_UPDATE_INTERVAL_MINUTES: u64 = 10;
