//! Plain-text rendering of project details and search results.

use serde_json::Value;

use crate::models::{ProjectDetails, SearchResults, NO_MATCHES};

const LABEL_WIDTH: usize = 14;

/// Render a record as an aligned block.
///
/// Example output:
/// ```text
/// Name:          Tracker
/// Created:       2024-05-20
/// Difficulty:    Hard
/// Technologies:  Rust, SQLite
/// Tags:          cli
/// Summary:       Time tracking for the terminal
/// ```
pub fn render_details(details: &ProjectDetails) -> String {
    let mut output = String::new();
    push_row(&mut output, "Name", &details.name);
    push_row(&mut output, "Created", &details.created_on);
    push_row(&mut output, "Difficulty", &details.difficulty);
    push_row(&mut output, "Technologies", &details.technologies.join(", "));
    push_row(&mut output, "Tags", &details.tags.join(", "));
    push_row(&mut output, "Summary", &details.summary);

    for (key, value) in &details.extra {
        push_row(&mut output, key, &render_value(value));
    }
    output
}

/// One project name per line, or the no-match message.
pub fn render_results(results: &SearchResults) -> String {
    if results.is_empty() {
        return format!("{}\n", NO_MATCHES);
    }

    let mut output = String::new();
    for name in results.names() {
        output.push_str(name);
        output.push('\n');
    }
    output
}

/// Strings unquoted, lists of scalars comma-joined, anything else as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) if items.iter().all(|v| !v.is_array() && !v.is_object()) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn push_row(output: &mut String, label: &str, value: &str) {
    let label = format!("{}:", label);
    output.push_str(&format!("{:<width$} {}", label, value, width = LABEL_WIDTH));
    output.truncate(output.trim_end().len());
    output.push('\n');
}
