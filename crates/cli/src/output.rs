// Output formatting for CLI

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }

    /// Render a value as JSON or YAML; text output is handled by each command
    pub fn render_value<T: Serialize>(&self, value: &T) -> Result<Option<String>> {
        match self {
            OutputFormat::Json => serde_json::to_string_pretty(value)
                .map(Some)
                .context("Failed to serialize output as JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map(Some)
                .context("Failed to serialize output as YAML"),
            OutputFormat::Text => Ok(None),
        }
    }

    pub fn print_value<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(rendered) = self.render_value(value)? {
            println!("{}", rendered.trim_end());
        }
        Ok(())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// Print a simple key-value pair for text output
pub fn print_field(label: &str, value: &str) {
    println!("{:<14} {}", format!("{}:", label), value);
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    let header: String = columns
        .iter()
        .map(|(name, width)| format!("{:<width$}", name, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.trim_end());
}

/// Print a table row; cells wider than their column are shown in full
pub fn print_table_row(values: &[(&str, usize)]) {
    let row: String = values
        .iter()
        .map(|(val, width)| format!("{:<width$}", val, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", row.trim_end());
}
