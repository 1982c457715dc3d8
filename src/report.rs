//! Plain-text report body for the PDF exporter.
//!
//! The exporter lays these lines out around a snapshot of the diagram; this
//! module only decides what the text says.

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

use crate::model::SceneGraph;

pub const REPORT_HEADER: &str = "Automated Forensic Reconstruction";
pub const REPORT_SUBTITLE: &str = "Generated by automated scene analysis";

/// Title used when the graph carries none.
const FALLBACK_TITLE: &str = "Scene Report";

/// Render `graph` as report text, one line per entry.
#[must_use]
pub fn render_text(graph: &SceneGraph) -> String {
    let title = if graph.title.trim().is_empty() { FALLBACK_TITLE } else { graph.title.as_str() };

    let mut lines = vec![
        REPORT_HEADER.to_owned(),
        title.to_owned(),
        REPORT_SUBTITLE.to_owned(),
        String::new(),
        "Forensic narrative:".to_owned(),
        graph.narrative.clone(),
        String::new(),
        "Elements:".to_owned(),
    ];

    lines.extend(graph.elements.iter().map(|e| {
        let (x, y) = e.position.rounded();
        format!("  {} - {} ({x}, {y})", e.name, e.category.slug())
    }));

    if !graph.connections.is_empty() {
        lines.push(String::new());
        lines.push("Connections:".to_owned());
        lines.extend(graph.connections.iter().map(|c| format!("  • {} → {}: {}", c.from, c.to, c.description)));
    }

    lines.join("\n")
}
