//! In-memory worksheets with keyed upsert
//!
//! A row's key is the text in its first column. Upserting a key that is
//! already present overwrites that row cell by cell; any trailing cells the
//! new row does not reach are left untouched.

use super::errors::SinkError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Worksheet {
    pub headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PartialEq for Worksheet {
    fn eq(&self, other: &Self) -> bool {
        self.headers == other.headers && self.rows == other.rows
    }
}

impl Worksheet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Rebuild the key index after deserializing. The first row wins when a
    /// hand-edited file contains duplicate keys.
    pub fn reindex(&mut self) {
        self.index.clear();
        for (position, row) in self.rows.iter().enumerate() {
            if let Some(key) = row.first().and_then(Cell::as_text) {
                self.index.entry(key.to_string()).or_insert(position);
            }
        }
    }

    pub fn upsert(&mut self, sheet: &str, row: Vec<Cell>) -> Result<UpsertOutcome, SinkError> {
        let key = row
            .first()
            .and_then(Cell::as_text)
            .ok_or_else(|| SinkError::MissingKey {
                sheet: sheet.to_string(),
            })?
            .to_string();

        match self.index.get(&key) {
            Some(&position) => {
                let existing = &mut self.rows[position];
                for (column, cell) in row.into_iter().enumerate() {
                    if column < existing.len() {
                        existing[column] = cell;
                    } else {
                        existing.push(cell);
                    }
                }
                Ok(UpsertOutcome::Updated)
            }
            None => {
                self.index.insert(key, self.rows.len());
                self.rows.push(row);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    pub fn row(&self, key: &str) -> Option<&[Cell]> {
        self.index.get(key).map(|&position| self.rows[position].as_slice())
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Named worksheets persisted together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    sheets: BTreeMap<String, Worksheet>,
}

impl Workbook {
    pub fn reindex(&mut self) {
        self.sheets.values_mut().for_each(Worksheet::reindex);
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.get(name)
    }

    /// Get a sheet, creating it with `headers` if missing or headerless
    pub fn sheet_mut(&mut self, name: &str, headers: &[&str]) -> &mut Worksheet {
        let sheet = self.sheets.entry(name.to_string()).or_default();
        if sheet.headers.is_empty() {
            sheet.headers = headers.iter().map(|h| h.to_string()).collect();
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: f64) -> Vec<Cell> {
        vec![Cell::Text(key.to_string()), Cell::Number(value)]
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let mut sheet = Worksheet::new(vec!["key".into(), "value".into()]);
        assert_eq!(sheet.upsert("s", row("A-1", 1.0)).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(sheet.upsert("s", row("A-2", 2.0)).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(sheet.upsert("s", row("A-1", 9.0)).unwrap(), UpsertOutcome::Updated);

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.row("A-1").unwrap()[1], Cell::Number(9.0));
        // Row order is insertion order
        assert_eq!(sheet.rows()[0][0], Cell::Text("A-1".into()));
    }

    #[test]
    fn test_update_keeps_trailing_cells() {
        let mut sheet = Worksheet::default();
        let mut long = row("A-1", 1.0);
        long.push(Cell::Text("note".into()));
        sheet.upsert("s", long).unwrap();
        sheet.upsert("s", row("A-1", 2.0)).unwrap();

        let stored = sheet.row("A-1").unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[1], Cell::Number(2.0));
        assert_eq!(stored[2], Cell::Text("note".into()));
    }

    #[test]
    fn test_upsert_requires_text_key() {
        let mut sheet = Worksheet::default();
        let result = sheet.upsert("parent_data", vec![Cell::Integer(1)]);
        assert!(matches!(result, Err(SinkError::MissingKey { .. })));
        assert!(sheet.upsert("parent_data", Vec::new()).is_err());
    }

    #[test]
    fn test_reindex_after_deserialize() {
        let mut book = Workbook::default();
        book.sheet_mut("parent_data", &["key", "value"])
            .upsert("parent_data", row("A-1", 1.0))
            .unwrap();

        let json = serde_json::to_string(&book).unwrap();
        let mut loaded: Workbook = serde_json::from_str(&json).unwrap();
        loaded.reindex();

        let sheet = loaded.sheet_mut("parent_data", &["ignored"]);
        assert_eq!(sheet.headers, vec!["key", "value"]);
        assert_eq!(sheet.upsert("parent_data", row("A-1", 5.0)).unwrap(), UpsertOutcome::Updated);
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_cell_serialization_is_tagged() {
        let json = serde_json::to_value(Cell::Integer(42)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer", "value": 42}));
        let empty = serde_json::to_value(Cell::Empty).unwrap();
        assert_eq!(empty, serde_json::json!({"type": "empty"}));
    }
}
