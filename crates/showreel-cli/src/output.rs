//! Output formatting for CLI

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "table" => OutputFormat::Table,
            _ => OutputFormat::Text,
        }
    }
}

/// Pretty JSON for any serializable value
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Render rows as JSON or as a table
pub fn format_rows<T>(rows: &[T], format: &str) -> anyhow::Result<String>
where
    T: Serialize + Tabled,
{
    match OutputFormat::from(format) {
        OutputFormat::Json => to_json(&rows),
        OutputFormat::Table => Ok(Table::new(rows).with(Style::rounded()).to_string()),
        OutputFormat::Text => Ok(Table::new(rows).with(Style::blank()).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: &'static str,
        value: u32,
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from("anything"), OutputFormat::Text);
    }

    #[test]
    fn test_json_rows() {
        let rows = [Row { name: "a", value: 1 }];
        let out = format_rows(&rows, "json").unwrap();
        assert!(out.contains("\"name\": \"a\""));

        let out = format_rows(&rows, "table").unwrap();
        assert!(out.contains("name") && out.contains('1'));
    }
}
