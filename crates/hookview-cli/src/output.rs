//! Terminal rendering for CLI commands: tables, JSON, events, and status lines.

use serde::Serialize;
use tabled::{Table, Tabled};

use hookview_client::ConnectionState;
use hookview_core::events::CapturedEvent;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows as a table, or as a JSON array
pub fn print_rows<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table if rows.is_empty() => println!("Nothing to show."),
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Json => print_json(rows, true),
    }
}

/// Print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => print_error(&format!("Failed to render JSON: {e}")),
    }
}

/// Print one captured event.
///
/// JSON output is one compact object per line so it can be piped.
pub fn print_event(event: &CapturedEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(event, false),
        OutputFormat::Table => {
            println!(
                "── {} ── {}",
                event.received_at().format("%Y-%m-%d %H:%M:%S%.3f"),
                event.id()
            );
            print_json(event.payload(), true);
        }
    }
}

/// Print a connection state change
pub fn print_state(state: ConnectionState) {
    let marker = match state {
        ConnectionState::Connected => "●",
        ConnectionState::Connecting => "◌",
        ConnectionState::Disconnected => "○",
        ConnectionState::Error => "✗",
    };
    println!("{marker} {}", state.label());
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    eprintln!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<20} {}", format!("{}:", key), value);
}
