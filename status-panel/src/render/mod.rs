//! Structured render description.
//!
//! `render` is a pure function from panel state to a small tree of
//! labelled nodes; backends convert the tree to a concrete UI
//! representation. Row and progress computation lives here, away from
//! any markup syntax.

mod html;
mod tui;

pub use html::HtmlBackend;
pub use tui::TuiBackend;

use crate::state::PanelState;
use parceltrack_common::ShipmentRecord;

pub const PANEL_TITLE: &str = "Parcel Tracker";
pub const LOADING_TEXT: &str = "Loading shipment data…";
pub const EMPTY_TEXT: &str = "No shipments found";
pub const ERROR_PREFIX: &str = "Error fetching data: ";

/// Cosmetic row shading, alternating by index parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowNode {
    pub label: String,
    pub status: String,
    /// Whole percentage in 0..=100; `None` suppresses the bar.
    pub progress_percent: Option<u8>,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The titled card container holding one content region.
    Card { title: String, body: Box<Node> },
    /// One row per shipment, in input order.
    Rows(Vec<RowNode>),
    /// Loading and no-shipments placeholders.
    Placeholder(String),
    /// Pretty-printed fallback for unexpected payload shapes.
    Preformatted(String),
    /// Visibly distinct error message.
    ErrorText(String),
}

impl Node {
    pub fn title(&self) -> Option<&str> {
        match self {
            Node::Card { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn body(&self) -> &Node {
        match self {
            Node::Card { body, .. } => body,
            other => other,
        }
    }
}

/// Converts a node tree into a target UI representation.
pub trait RenderBackend {
    type Output;

    fn render(&self, node: &Node) -> Self::Output;
}

/// Describe the given state as a render tree.
pub fn render(state: &PanelState) -> Node {
    let body = match state {
        PanelState::Loading => Node::Placeholder(LOADING_TEXT.to_string()),
        PanelState::Rendered(records) => Node::Rows(rows(records)),
        PanelState::Empty => Node::Placeholder(EMPTY_TEXT.to_string()),
        PanelState::Fallback(value) => Node::Preformatted(
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        ),
        PanelState::Failed(message) => Node::ErrorText(format!("{ERROR_PREFIX}{message}")),
    };

    Node::Card {
        title: PANEL_TITLE.to_string(),
        body: Box::new(body),
    }
}

fn rows(records: &[ShipmentRecord]) -> Vec<RowNode> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| RowNode {
            label: record.display_label(),
            status: record.status.clone(),
            progress_percent: record.progress_percent(),
            tone: if index % 2 == 0 {
                Tone::Light
            } else {
                Tone::Dark
            },
        })
        .collect()
}
