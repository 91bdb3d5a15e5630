use polars::error::PolarsError;
use std::path::PathBuf;
use std::time::SystemTimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to list directory '{0}'")]
    DirectoryRead(PathBuf, #[source] std::io::Error),

    #[error("No CSV objects found in '{0}'")]
    NoObjects(PathBuf),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read metadata for cache file '{0}'")]
    CacheMetadataRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to calculate cache age for {0:?}")]
    SystemTimeCalculation(PathBuf, #[source] SystemTimeError),

    // Errors during parquet cache writing (inside blocking task)
    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to read parquet cache file '{0}'")]
    ParquetRead(PathBuf, #[source] PolarsError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download or decompression failed for '{object}'")]
    DownloadIo {
        object: String,
        #[source]
        source: std::io::Error,
    },

    // Errors during CSV reading (inside blocking task)
    #[error("I/O error staging CSV data for '{object}'")]
    CsvReadIo {
        object: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error reading CSV data from '{object}'")]
    CsvReadPolars {
        object: String,
        #[source]
        source: PolarsError,
    },

    #[error("CSV in '{object}' has {found} columns and no known header, expected {expected}")]
    SchemaMismatch {
        object: String,
        expected: usize,
        found: usize,
    },

    #[error("Required column '{column}' not readable in '{object}'")]
    ColumnNotFound {
        object: String,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
