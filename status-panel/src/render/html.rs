use super::{Node, RenderBackend, RowNode, Tone};
use std::fmt::Write;

/// Converts a render tree into HTML markup.
///
/// Used by hosts whose display surface is a web page, and by the
/// tracking service's overview route.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    type Output = String;

    fn render(&self, node: &Node) -> String {
        let mut out = String::new();
        write_node(&mut out, node);
        out
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Card { title, body } => {
            let _ = write!(
                out,
                "<div class=\"parcel-card\"><h2>{}</h2><div class=\"content\">",
                escape(title)
            );
            write_node(out, body);
            out.push_str("</div></div>");
        }
        Node::Rows(rows) => {
            for row in rows {
                write_row(out, row);
            }
        }
        Node::Placeholder(text) => {
            let _ = write!(out, "<p class=\"placeholder\">{}</p>", escape(text));
        }
        Node::Preformatted(text) => {
            let _ = write!(out, "<pre>{}</pre>", escape(text));
        }
        Node::ErrorText(message) => {
            let _ = write!(out, "<p class=\"error\">{}</p>", escape(message));
        }
    }
}

fn write_row(out: &mut String, row: &RowNode) {
    let tone = match row.tone {
        Tone::Light => "row-light",
        Tone::Dark => "row-dark",
    };
    let _ = write!(
        out,
        "<div class=\"row {tone}\"><p><strong>{}</strong>: {}</p>",
        escape(&row.label),
        escape(&row.status)
    );
    if let Some(percent) = row.progress_percent {
        let _ = write!(
            out,
            "<div class=\"progress\"><div class=\"progress-fill\" style=\"width: {percent}%\"></div></div>"
        );
    }
    out.push_str("</div>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
