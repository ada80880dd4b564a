//! Output formatting for verdent-cli (table, json)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print a single item in the configured format
    pub fn print_one<T: Tabled + Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Table => {
                let table = Table::new([data]).to_string();
                println!("{}", table);
            }
            OutputFormat::Json => print_json(data),
        }
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                print_json(&map);
            }
        }
    }

    /// Print an arbitrary JSON payload
    ///
    /// Objects become key-value pairs in table mode; anything else is
    /// printed as JSON either way.
    pub fn print_value(&self, value: &serde_json::Value) {
        match (self.format, value) {
            (OutputFormat::Table, serde_json::Value::Object(map)) if !map.is_empty() => {
                let pairs: Vec<(&str, String)> = map
                    .iter()
                    .map(|(k, v)| (k.as_str(), format_value(v)))
                    .collect();
                self.print_kv(&pairs);
            }
            _ => print_json(value),
        }
    }

    /// Print a bare value (token, URL) so it can be captured by scripts
    pub fn print_raw(&self, value: &str) {
        match self.format {
            OutputFormat::Table => println!("{}", value),
            OutputFormat::Json => print_json(&value),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(data: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "null".to_string())
    );
}

/// Render a JSON value for a table cell
pub fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Credit balance display for credits command
#[derive(Debug, Tabled, Serialize)]
pub struct CreditsRow {
    #[tabled(rename = "Consumed")]
    pub consumed: f64,
    #[tabled(rename = "Free")]
    pub free: f64,
    #[tabled(rename = "Remaining")]
    pub total: f64,
}

/// PKCE display for pkce command
#[derive(Debug, Tabled, Serialize)]
pub struct PkceRow {
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Code Verifier")]
    pub code_verifier: String,
    #[tabled(rename = "Code Challenge")]
    pub code_challenge: String,
}
