//! Shipment status panel: polls an endpoint on a timer and renders the
//! returned shipment list through a swappable backend.

pub mod config;
pub mod error;
pub mod panel;
pub mod registry;
pub mod render;
pub mod source;
pub mod state;

pub use config::{PanelConfig, RawPanelConfig};
pub use error::{FetchError, PanelError, RegistryError};
pub use panel::StatusPanel;
pub use registry::PanelRegistry;
pub use source::{HttpSource, StatusSource};
pub use state::PanelState;
