//! Error types for dataset loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading a dataset file.
///
/// Every variant is fatal for the load: there is no partial recovery.
#[derive(Debug, Error)]
pub enum LoadError {
    // === File System Errors ===
    /// Data file not found.
    #[error("data file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension does not map to a known format.
    #[error("unsupported file extension '.{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Schema Errors ===
    /// Required column not present in the header / schema.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Column present but stored with a type we cannot read.
    #[error("column '{column}' in {path} has unsupported type {found}")]
    ColumnType {
        column: String,
        found: String,
        path: PathBuf,
    },

    /// A cell that cannot be interpreted (e.g. unknown continent, null key).
    #[error("invalid {column} value '{value}' in row {row} of {path}")]
    InvalidValue {
        column: String,
        value: String,
        row: usize,
        path: PathBuf,
    },

    /// File parsed but contains no data rows.
    #[error("no data rows in {path}")]
    Empty { path: PathBuf },

    // === Format Errors ===
    /// Malformed delimited text (bad quoting, unparseable number, ...).
    #[error("failed to parse delimited file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed JSON document.
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parquet / Arrow decoding failure.
    #[error("failed to read parquet {path}: {message}")]
    Parquet { path: PathBuf, message: String },
}

impl LoadError {
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::MissingColumn {
            column: "life_exp".to_string(),
            path: PathBuf::from("data/gapminder.csv"),
        };
        assert_eq!(
            err.to_string(),
            "required column 'life_exp' not found in data/gapminder.csv"
        );
    }

    #[test]
    fn test_not_found_io_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = LoadError::from_io(std::path::Path::new("x.csv"), io);
        assert!(matches!(err, LoadError::FileNotFound { .. }));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LoadError::from_io(std::path::Path::new("x.csv"), io);
        assert!(matches!(err, LoadError::FileRead { .. }));
    }
}
