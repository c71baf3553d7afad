//! Error types for table loading, code reconciliation and the GDP join.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtlasError>;

/// Failures raised by the pipeline.
///
/// Codes that do not resolve and years without data are not errors; they end
/// up in the unmatched / no-data sets of the join result.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Source table missing or unreadable.
    #[error("cannot open {path}: {source}")]
    ResourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record whose field count disagrees with the header.
    #[error("malformed record at line {line} of {path}: expected {expected} field(s), found {found}")]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A GDP figure that is not a strictly positive decimal number.
    #[error("invalid GDP value '{value}' for {code} in {year}")]
    InvalidNumericData {
        code: String,
        year: String,
        value: String,
    },

    #[error("column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("failed to decode {path} as {encoding}")]
    Decode { path: PathBuf, encoding: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("year '{year}' outside the configured range {min}..={max}")]
    YearOutOfRange { year: String, min: i32, max: i32 },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
