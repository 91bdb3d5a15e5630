use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Failed to build DataFrame for view '{view}'")]
    Frame {
        view: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to create export directory '{0}'")]
    ExportDirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing export file '{0}'")]
    ExportIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing export file '{0}'")]
    ExportPolars(PathBuf, #[source] PolarsError),

    #[error("JSON encoding error writing export file '{0}'")]
    ExportJson(PathBuf, #[source] serde_json::Error),

    #[error("Unknown view '{0}'")]
    UnknownView(String),

    #[error("View computation task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
