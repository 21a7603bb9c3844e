//! Generic tabular query results

use std::path::Path;
use rusqlite::types::ValueRef;
use serde::Serialize;
use crate::Result;
use super::schema::IDENTITY_COLUMN;

/// One value in a result row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(i) => Cell::Integer(i),
            ValueRef::Real(f) => Cell::Real(f),
            ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Cell::Blob(b.to_vec()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Real(r) => write!(f, "{}", r),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Ordered columns and ordered rows returned by a query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, compared case-insensitively like SQLite does
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn has_identity(&self) -> bool {
        self.column_index(IDENTITY_COLUMN).is_some()
    }

    /// Values of the identity column, deduplicated, in first-seen order.
    ///
    /// Returns `None` when the result has no identity column; non-integer
    /// cells are skipped.
    pub fn identity_keys(&self) -> Option<Vec<i64>> {
        let idx = self.column_index(IDENTITY_COLUMN)?;
        let mut seen = std::collections::HashSet::new();
        let keys = self
            .rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(Cell::as_i64))
            .filter(|id| seen.insert(*id))
            .collect();
        Some(keys)
    }

    /// All values of one column
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    /// Render as CSV: a header row, then one record per row.
    ///
    /// NULL cells are written as empty fields. Fields holding the delimiter,
    /// a quote or a line break are double-quoted with inner quotes doubled.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_record(&mut out, self.columns.iter().map(String::as_str));
        for row in &self.rows {
            let fields: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Null => String::new(),
                    other => other.to_string(),
                })
                .collect();
            push_record(&mut out, fields.iter().map(String::as_str));
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv())?;
        tracing::info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}

const CSV_DELIMITER: char = ',';

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(CSV_DELIMITER);
        }
        if field.contains(|c: char| matches!(c, CSV_DELIMITER | '"' | '\n' | '\r')) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet::new(
            vec!["ID".to_string(), "name".to_string()],
            vec![
                vec![Cell::Integer(2), Cell::Text("Bolt".to_string())],
                vec![Cell::Integer(1), Cell::Text("Forest".to_string())],
                vec![Cell::Integer(2), Cell::Text("Bolt".to_string())],
                vec![Cell::Null, Cell::Text("Ghost".to_string())],
            ],
        )
    }

    #[test]
    fn test_identity_keys() {
        let rs = sample();
        assert!(rs.has_identity());
        assert_eq!(rs.identity_keys(), Some(vec![2, 1]));
    }

    #[test]
    fn test_no_identity() {
        let rs = ResultSet::new(vec!["name".to_string()], vec![]);
        assert!(!rs.has_identity());
        assert_eq!(rs.identity_keys(), None);
    }

    #[test]
    fn test_column_values() {
        let rs = sample();
        let names: Vec<_> = rs.column("name").unwrap().iter().filter_map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["Bolt", "Forest", "Bolt", "Ghost"]);
        assert!(rs.column("cmc").is_none());
    }

    #[test]
    fn test_csv_quotes_awkward_fields() {
        let rs = ResultSet::new(
            vec!["id".to_string(), "name".to_string(), "text".to_string(), "cmc".to_string()],
            vec![
                vec![
                    Cell::Integer(1),
                    Cell::Text("Jace, the Mind Sculptor".to_string()),
                    Cell::Text("Say \"brainstorm\"".to_string()),
                    Cell::Real(4.0),
                ],
                vec![Cell::Integer(2), Cell::Text("Forest".to_string()), Cell::Null, Cell::Integer(0)],
            ],
        );

        let csv = rs.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,text,cmc");
        assert_eq!(lines[1], "1,\"Jace, the Mind Sculptor\",\"Say \"\"brainstorm\"\"\",4");
        assert_eq!(lines[2], "2,Forest,,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rs = ResultSet::new(vec!["name".to_string()], vec![vec![Cell::Text("Bolt".to_string())]]);

        rs.write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name\nBolt\n");
    }

    #[test]
    fn test_json_shape() {
        let rs = ResultSet::new(
            vec!["id".to_string(), "name".to_string(), "note".to_string()],
            vec![vec![Cell::Integer(1), Cell::Text("Forest".to_string()), Cell::Null]],
        );
        let json = serde_json::to_value(&rs).unwrap();
        assert_eq!(json["columns"][1], "name");
        assert_eq!(json["rows"][0][0], 1);
        assert_eq!(json["rows"][0][1], "Forest");
        assert!(json["rows"][0][2].is_null());
    }
}
