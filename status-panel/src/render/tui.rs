use super::{Node, RenderBackend, RowNode, Tone};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const BAR_WIDTH: usize = 20;

/// Converts a render tree into styled terminal text.
///
/// The card title is not part of the output; hosts put it on the
/// surrounding block (see `Node::title`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TuiBackend;

impl RenderBackend for TuiBackend {
    type Output = Text<'static>;

    fn render(&self, node: &Node) -> Text<'static> {
        let mut lines = Vec::new();
        push_node(&mut lines, node.body());
        Text::from(lines)
    }
}

fn push_node(lines: &mut Vec<Line<'static>>, node: &Node) {
    match node {
        Node::Card { body, .. } => push_node(lines, body),
        Node::Rows(rows) => {
            for row in rows {
                push_row(lines, row);
            }
        }
        Node::Placeholder(text) => {
            lines.push(Line::styled(
                text.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        Node::Preformatted(text) => {
            for raw_line in text.lines() {
                lines.push(Line::raw(raw_line.to_string()));
            }
        }
        Node::ErrorText(message) => {
            lines.push(Line::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
    }
}

fn push_row(lines: &mut Vec<Line<'static>>, row: &RowNode) {
    let row_style = match row.tone {
        Tone::Light => Style::default(),
        Tone::Dark => Style::default().bg(Color::DarkGray),
    };

    let mut spans = vec![
        Span::styled(
            row.label.clone(),
            row_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(": {}", row.status), row_style),
    ];
    if let Some(percent) = row.progress_percent {
        spans.push(Span::styled(
            format!("  {} {percent:>3}%", bar(percent)),
            row_style.fg(Color::Green),
        ));
    }
    lines.push(Line::from(spans));
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    for position in 0..BAR_WIDTH {
        bar.push(if position < filled { '█' } else { '░' });
    }
    bar
}
