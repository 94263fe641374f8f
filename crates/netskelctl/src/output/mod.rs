//! Output formatting for netskelctl
//!
//! Tables for client listings, aligned detail blocks for `info`, JSON for
//! scripting, and colored status messages.

use tabled::{settings::Style, Table, Tabled};

use netskel_core::time::{format_epoch, format_epoch_field};
use netskel_core::types::fields;
use netskel_core::ClientRecord;

/// Placeholder for a value that was never recorded
const MISSING: &str = "-";

/// Format clients as a table of UUID, hostname and last-seen time
pub fn format_clients(records: &[ClientRecord]) -> String {
    if records.is_empty() {
        return "No clients found".to_string();
    }

    #[derive(Tabled)]
    struct ClientRow {
        #[tabled(rename = "Client ID")]
        uuid: String,
        #[tabled(rename = "Hostname")]
        hostname: String,
        #[tabled(rename = "Last Seen")]
        last_seen: String,
    }

    let rows: Vec<ClientRow> = records
        .iter()
        .map(|r| ClientRow {
            uuid: r.uuid.clone(),
            hostname: r.hostname().unwrap_or(MISSING).to_string(),
            last_seen: r
                .last_seen()
                .and_then(format_epoch)
                .unwrap_or_else(|| MISSING.to_string()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format one client as `[uuid]` followed by its fields, aligned
///
/// Epoch fields are shown as local time.
pub fn format_client_details(record: &ClientRecord) -> String {
    let width = record.fields.keys().map(String::len).max().unwrap_or(0);

    let mut output = format!("[{}]\n", record.uuid);
    for (name, value) in &record.fields {
        let shown = if fields::is_epoch(name) {
            format_epoch_field(value)
        } else {
            value.clone()
        };
        output.push_str(&format!("  {:<width$}: {}\n", name, shown, width = width));
    }
    output
}

/// Format clients as pretty-printed JSON
pub fn format_json(records: &[ClientRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red to stderr
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow to stderr
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
