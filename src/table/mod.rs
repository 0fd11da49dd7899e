//! Result table assembly, deduplication, and CSV persistence.
//!
//! [`ResultTable`] turns flattened records into a rectangular table: column
//! order follows first appearance across records, exact-duplicate rows are
//! dropped (first occurrence wins), and the table writes as RFC-4180-style
//! CSV. A minimal parser reads a written table back for verification.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::api::RawRecord;

/// The deduplicated tabular form of a pull, ready for CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Builds a table from flattened records.
    ///
    /// Columns are the union of record keys in order of first appearance.
    /// Rows identical in every cell are dropped; order is otherwise the
    /// accumulation order.
    #[must_use]
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen_columns: HashSet<String> = HashSet::new();
        for record in records {
            for key in record.keys() {
                if seen_columns.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }

        let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len());
        let mut seen_rows: HashSet<Vec<String>> = HashSet::new();
        for record in records {
            let row: Vec<String> = columns
                .iter()
                .map(|column| record.get(column).map_or_else(String::new, render_cell))
                .collect();
            if seen_rows.insert(row.clone()) {
                rows.push(row);
            }
        }

        Self { columns, rows }
    }

    /// The column names, in export order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The deduplicated rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table as CSV text: header row then data rows.
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        push_row(&mut out, &self.columns);
        for row in &self.rows {
            push_row(&mut out, row);
        }
        out
    }

    /// Writes the table to `path`, creating parent directories and fully
    /// replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an IO error when directory creation or the write fails.
    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_csv_string())
    }

    /// Reads a previously written table back from `path`.
    ///
    /// The first row becomes the columns; all parsed values are strings.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the file cannot be read.
    pub fn read_csv(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut rows = parse_rows(&text);
        if rows.is_empty() {
            return Ok(Self {
                columns: Vec::new(),
                rows: Vec::new(),
            });
        }
        let columns = rows.remove(0);
        Ok(Self { columns, rows })
    }
}

/// Renders one JSON value as a CSV cell.
///
/// Nulls render empty (a reload cannot distinguish null from empty string,
/// which matches the downstream tabular tooling).
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Appends one CSV row, quoting fields that need it.
fn push_row(out: &mut String, row: &[String]) {
    let mut first = true;
    for cell in row {
        if first {
            first = false;
        } else {
            out.push(',');
        }
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Minimal CSV parser (quotes + CRLF tolerant).
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row with no final newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: serde_json::Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got: {other:?}"),
        }
    }

    #[test]
    fn test_columns_follow_first_appearance_order() {
        let records = vec![
            record(json!({"Award ID": "A", "Transaction Amount": 1.0})),
            record(json!({"Award ID": "B", "Transaction Amount": 2.0, "Mod": "1"})),
        ];
        let table = ResultTable::from_records(&records);
        assert_eq!(table.columns(), ["Award ID", "Transaction Amount", "Mod"]);
        // Missing cell renders empty
        assert_eq!(table.rows()[0], ["A", "1.0", ""]);
        assert_eq!(table.rows()[1], ["B", "2.0", "1"]);
    }

    #[test]
    fn test_exact_duplicates_are_dropped_first_wins() {
        let records = vec![
            record(json!({"Award ID": "A", "Transaction Amount": 1.0})),
            record(json!({"Award ID": "A", "Transaction Amount": 1.0})),
            record(json!({"Award ID": "B", "Transaction Amount": 2.0})),
        ];
        let table = ResultTable::from_records(&records);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], "A");
        assert_eq!(table.rows()[1][0], "B");
    }

    #[test]
    fn test_rows_differing_in_one_field_are_kept() {
        let records = vec![
            record(json!({"Award ID": "A", "Mod": "0"})),
            record(json!({"Award ID": "A", "Mod": "1"})),
        ];
        let table = ResultTable::from_records(&records);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_render_cell_types() {
        assert_eq!(render_cell(&Value::Null), "");
        assert_eq!(render_cell(&json!("WICHITA")), "WICHITA");
        assert_eq!(render_cell(&json!(250000.5)), "250000.5");
        assert_eq!(render_cell(&json!(42)), "42");
        assert_eq!(render_cell(&json!(true)), "true");
    }

    #[test]
    fn test_csv_quotes_fields_with_commas_and_quotes() {
        let records = vec![record(json!({
            "Recipient Name": "ACME, INC.",
            "Transaction Description": "bolt 1/4\" kit"
        }))];
        let table = ResultTable::from_records(&records);
        let csv = table.to_csv_string();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Recipient Name,Transaction Description");
        assert_eq!(lines.next().unwrap(), "\"ACME, INC.\",\"bolt 1/4\"\" kit\"");
    }

    #[test]
    fn test_parse_rows_round_trips_quoted_fields() {
        let parsed = parse_rows("a,\"x,y\",\"q\"\"q\"\nb,c,d\n");
        assert_eq!(
            parsed,
            vec![
                vec!["a".to_string(), "x,y".to_string(), "q\"q".to_string()],
                vec!["b".to_string(), "c".to_string(), "d".to_string()],
            ]
        );
    }

    #[test]
    fn test_write_and_read_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let records = vec![
            record(json!({
                "Award ID": "A",
                "Recipient Name": "ACME, INC.",
                "naics_code": "336411",
                "pop_state": null
            })),
            record(json!({
                "Award ID": "B",
                "Recipient Name": "BOLTS LLC",
                "naics_code": "332710",
                "pop_state": "TX"
            })),
        ];
        let table = ResultTable::from_records(&records);
        table.write_csv(&path).unwrap();

        let reloaded = ResultTable::read_csv(&path).unwrap();
        assert_eq!(reloaded.len(), table.len());
        assert_eq!(reloaded.columns(), table.columns());
    }

    #[test]
    fn test_write_csv_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let first = ResultTable::from_records(&[record(json!({"Award ID": "A"}))]);
        first.write_csv(&path).unwrap();
        let second = ResultTable::from_records(&[record(json!({"Award ID": "B"}))]);
        second.write_csv(&path).unwrap();

        let reloaded = ResultTable::read_csv(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.rows()[0][0], "B");
    }

    #[test]
    fn test_read_csv_empty_file_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        let table = ResultTable::read_csv(&path).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_empty_record_set_produces_header_only_csv() {
        let table = ResultTable::from_records(&[]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv_string(), "\n");
    }
}
