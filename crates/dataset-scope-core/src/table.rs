//! Tabular loading with dataframe-style defaults.

use ahash::AHashSet;
use csv::ReaderBuilder;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Cell values read as missing, in addition to the empty string.
const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    value.is_empty() || NA_VALUES.contains(&value)
}

/// A loaded CSV file. Missing cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn from_path(path: &Path) -> Result<Table> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Parse CSV content. The first record is the header; blank lines are skipped.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::EmptyData("No columns to parse from file".to_string()));
        }
        let columns = dedupe_columns(headers.iter());
        let width = columns.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(Error::Tokenize {
                    line,
                    expected: width,
                    found: record.len(),
                });
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|value| (!is_missing(value)).then(|| value.to_string()))
                .collect();
            row.resize(width, None);
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_deref()))
    }
}

/// Blank headers become `Unnamed: {i}`; repeats get a `.1`, `.2`, ... suffix.
fn dedupe_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = headers
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut seen: AHashSet<String> = AHashSet::with_capacity(raw.len());
    let mut columns = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut suffix = 0;
        while seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}.{}", name, suffix);
        }
        seen.insert(candidate.clone());
        columns.push(candidate);
    }
    columns
}
