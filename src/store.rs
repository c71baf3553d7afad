//! Keyed, read-only tables loaded from delimited text files.
//!
//! A [`Table`] maps the value of one chosen key column to its [`Row`]. Rows
//! share their table's [`Header`] and are never mutated after load. Keys are
//! kept in a `BTreeMap` so every walk over a table is in ascending key order.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    sync::Arc,
};

use log::debug;

use crate::{
    error::{AtlasError, Result},
    io_utils,
};

/// Column names of a table, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        // Repeated column names resolve to the rightmost column.
        let positions = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One record of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    header: Arc<Header>,
    values: Vec<String>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .position(column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How to read a delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: u8,
    pub quote: u8,
    /// Encoding label understood by `encoding_rs`; UTF-8 when `None`.
    pub encoding: Option<String>,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            quote: io_utils::DEFAULT_QUOTE,
            encoding: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    key_column: String,
    header: Arc<Header>,
    rows: BTreeMap<String, Row>,
}

impl Table {
    /// Loads `source` keyed by `key_column`.
    ///
    /// The first record is the header. When a key repeats, the later row
    /// replaces the earlier one. A record whose field count differs from the
    /// header fails the whole load with [`AtlasError::MalformedRecord`].
    pub fn load(source: &Path, key_column: &str, delimiter: u8, quote: u8) -> Result<Self> {
        let format = TableFormat {
            delimiter,
            quote,
            encoding: None,
        };
        Self::load_with(source, key_column, &format)
    }

    pub fn load_with(source: &Path, key_column: &str, format: &TableFormat) -> Result<Self> {
        debug!(
            "Loading {:?} keyed by '{}' with delimiter '{}'",
            source,
            key_column,
            io_utils::printable_delimiter(format.delimiter)
        );
        let encoding = io_utils::resolve_encoding(format.encoding.as_deref())?;
        let mut reader = io_utils::open_csv_reader_from_path(source, format.delimiter, format.quote)?;

        let raw_headers = reader
            .byte_headers()
            .map_err(|err| classify_header_error(source, err))?
            .clone();
        let header = Arc::new(Header::new(io_utils::decode_record(
            &raw_headers,
            encoding,
            source,
        )?));
        let key_index = header
            .position(key_column)
            .ok_or_else(|| AtlasError::MissingColumn {
                path: source.to_path_buf(),
                column: key_column.to_string(),
            })?;

        let mut rows = BTreeMap::new();
        let mut overwritten = 0usize;
        for record in reader.byte_records() {
            let record = record.map_err(|err| classify_csv_error(source, err))?;
            let values = io_utils::decode_record(&record, encoding, source)?;
            let key = values.get(key_index).cloned().unwrap_or_default();
            let row = Row {
                header: Arc::clone(&header),
                values,
            };
            if rows.insert(key.clone(), row).is_some() {
                debug!("Key '{key}' repeats in {source:?}; keeping the later row");
                overwritten += 1;
            }
        }

        debug!(
            "Loaded {} row(s) from {:?} ({} overwritten by a later duplicate)",
            rows.len(),
            source,
            overwritten
        );
        Ok(Self {
            key_column: key_column.to_string(),
            header,
            rows,
        })
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn headers(&self) -> &[String] {
        self.header.names()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.header.position(column).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.rows.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.rows.iter().map(|(key, row)| (key.as_str(), row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An I/O failure while reading the header means the source itself is
/// unreadable (a directory, a revoked handle), not that a record is bad.
fn classify_header_error(path: &Path, err: csv::Error) -> AtlasError {
    let io_kind = match err.kind() {
        csv::ErrorKind::Io(io_err) => Some(io_err.kind()),
        _ => None,
    };
    match io_kind {
        Some(kind) => AtlasError::ResourceNotFound {
            path: path.to_path_buf(),
            source: std::io::Error::new(kind, err),
        },
        None => classify_csv_error(path, err),
    }
}

fn classify_csv_error(path: &Path, err: csv::Error) -> AtlasError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return AtlasError::MalformedRecord {
            path: path.to_path_buf(),
            line: pos.as_ref().map(csv::Position::line).unwrap_or_default(),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    AtlasError::Csv {
        path: path.to_path_buf(),
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_resolves_repeated_names_to_last_column() {
        let header = Header::new(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(header.position("a"), Some(2));
        assert_eq!(header.position("b"), Some(1));
        assert_eq!(header.position("c"), None);
        assert_eq!(header.len(), 3);
        assert!(!header.is_empty());
        assert!(Header::new(Vec::new()).is_empty());
    }

    #[test]
    fn row_iterates_in_header_order() {
        let header = Arc::new(Header::new(vec!["code".into(), "1990".into()]));
        let row = Row {
            header,
            values: vec!["CAN".into(), "1000".into()],
        };
        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(pairs, vec![("code", "CAN"), ("1990", "1000")]);
        assert_eq!(row.get("1990"), Some("1000"));
        assert_eq!(row.get("1991"), None);
    }
}
