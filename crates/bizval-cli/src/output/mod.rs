pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::Colorize;
use serde_json::Value;

use crate::OutputFormat;

/// Render a command's output envelope in the requested format.
///
/// JSON and table output carry the envelope's warnings themselves. CSV and
/// minimal output keep stdout to data only, so warnings go to stderr.
pub fn format_output(format: &OutputFormat, value: &Value) {
    tracing::debug!(?format, "rendering output");
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            csv_out::print_csv(value);
            print_warnings_to_stderr(value);
        }
        OutputFormat::Minimal => {
            minimal::print_minimal(value);
            print_warnings_to_stderr(value);
        }
    }
}

fn print_warnings_to_stderr(value: &Value) {
    for w in envelope_warnings(value) {
        eprintln!("{}: {}", "warning".yellow().bold(), w);
    }
}

/// Warning strings attached to an output envelope; empty for bare values.
fn envelope_warnings(value: &Value) -> Vec<&str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
