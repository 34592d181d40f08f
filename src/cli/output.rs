//! Output formatting for CLI

use crate::models::{MarkerActionKind, WalkEvent};
use crate::services::marker::MarkerReport;
use serde::Serialize;

/// Serialize any report as pretty JSON
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Render a marker report as human-readable lines
#[must_use]
pub fn format_marker_text(report: &MarkerReport) -> String {
    let mut lines = Vec::new();
    let prefix = if report.dry_run { "would " } else { "" };

    for action in &report.actions {
        let verb = match action.kind {
            MarkerActionKind::Created => "create",
            MarkerActionKind::Removed => "remove",
        };
        lines.push(format!("{prefix}{verb} {}", action.path));
    }

    for error in &report.errors {
        lines.push(format!("error [{}] {}: {}", error.code, error.path, error.message));
    }

    lines.push(format!(
        "{} directories scanned, {} empty, {} marker(s) {}{}",
        report.directories_scanned,
        report.empty_directories,
        report.actions.len(),
        if report.dry_run { "planned" } else { "changed" },
        if report.completed { "" } else { " (walk aborted)" },
    ));

    lines.join("\n")
}

/// Render walk events as an indented tree
#[must_use]
pub fn format_events_text(events: &[WalkEvent]) -> String {
    let mut lines = Vec::new();
    let mut depth = 0usize;

    for event in events {
        match event {
            WalkEvent::PreVisit(path) => {
                lines.push(format!("{}{path}/", "  ".repeat(depth)));
                depth += 1;
            }
            WalkEvent::Visit(path) => {
                lines.push(format!("{}{path}", "  ".repeat(depth)));
            }
            WalkEvent::PostVisit(_) => {
                depth = depth.saturating_sub(1);
            }
        }
    }

    lines.join("\n")
}
