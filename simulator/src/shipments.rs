use parceltrack_common::ShipmentRecord;
use rand::Rng;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Delivery lifecycle a generated shipment moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter)]
pub enum DeliveryPhase {
    #[strum(to_string = "Order data transmitted electronically")]
    Announced,
    #[strum(to_string = "Processed in the parcel centre")]
    ParcelCentre,
    #[strum(to_string = "In transport")]
    InTransport,
    #[strum(to_string = "In delivery")]
    InDelivery,
    #[strum(to_string = "Delivered")]
    Delivered,
}

impl DeliveryPhase {
    fn random(rng: &mut impl Rng) -> Self {
        DeliveryPhase::iter()
            .nth(rng.random_range(0..DeliveryPhase::COUNT))
            .unwrap_or(DeliveryPhase::Announced)
    }

    fn advanced(self) -> Self {
        match self {
            DeliveryPhase::Announced => DeliveryPhase::ParcelCentre,
            DeliveryPhase::ParcelCentre => DeliveryPhase::InTransport,
            DeliveryPhase::InTransport => DeliveryPhase::InDelivery,
            DeliveryPhase::InDelivery | DeliveryPhase::Delivered => DeliveryPhase::Delivered,
        }
    }
}

const PACKAGE_NAMES: [&str; 6] = [
    "New shoes",
    "Bicycle parts",
    "Record player",
    "Coffee beans",
    "Spare charger",
    "Birthday present",
];

#[derive(Debug, Clone)]
pub struct SimulatedShipment {
    pub tracking_number: String,
    pub tracking_name: Option<String>,
    pub phase: DeliveryPhase,
}

impl SimulatedShipment {
    pub fn random(rng: &mut impl Rng) -> Self {
        // Roughly a third of shipments go unnamed, exercising the
        // panel's label fallback.
        let tracking_name = if rng.random_bool(2.0 / 3.0) {
            PACKAGE_NAMES
                .get(rng.random_range(0..PACKAGE_NAMES.len()))
                .map(|name| (*name).to_string())
        } else {
            None
        };

        Self {
            tracking_number: format!("0034043416{:010}", rng.random_range(0..10_000_000_000_u64)),
            tracking_name,
            phase: DeliveryPhase::random(rng),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.phase == DeliveryPhase::Delivered
    }

    pub fn advance(&mut self) {
        self.phase = self.phase.advanced();
    }

    pub fn to_record(&self) -> ShipmentRecord {
        let mut record = ShipmentRecord::new(self.tracking_number.clone(), self.phase.to_string());
        record.tracking_name = self.tracking_name.clone();
        record.progress = Some(self.phase as usize as f64);
        record.max_progress = Some((DeliveryPhase::COUNT - 1) as f64);
        record
    }
}

pub fn generate_fleet(count: usize, rng: &mut impl Rng) -> Vec<SimulatedShipment> {
    (0..count).map(|_| SimulatedShipment::random(rng)).collect()
}

/// One simulation tick: shipments move forward at random, and delivered
/// ones are eventually replaced by fresh shipments so the list keeps
/// changing.
pub fn advance_fleet(fleet: &mut [SimulatedShipment], rng: &mut impl Rng) {
    for shipment in fleet.iter_mut() {
        if shipment.is_delivered() {
            if rng.random_bool(0.3) {
                *shipment = SimulatedShipment::random(rng);
            }
        } else if rng.random_bool(0.5) {
            shipment.advance();
        }
    }
}
