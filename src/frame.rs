//! Fully materialized tables: raw provider exports and their canonical
//! projections.
//!
//! Cells are kept as decoded text; an empty cell is the null value.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{fields::Field, io_utils};

/// A provider export exactly as read: labels are authoritative, no trimming or
/// case-folding is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn read(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;
        let mut rows = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record =
                record.with_context(|| format!("Reading row {} in {:?}", row_idx + 2, path))?;
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {} in {:?}", row_idx + 2, path))?;
            rows.push(decoded);
        }
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`, matching the shape reported after loading.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }
}

/// A table whose columns are canonical fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTable {
    pub fields: Vec<Field>,
    pub rows: Vec<Vec<String>>,
}

impl CanonicalTable {
    pub fn column(&self, field: Field) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// Non-null cell of `field` in `row`.
    pub fn value(&self, row: usize, field: Field) -> Option<&str> {
        let idx = self.column(field)?;
        self.rows
            .get(row)
            .and_then(|r| r.get(idx))
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.as_str().to_string()).collect()
    }
}
