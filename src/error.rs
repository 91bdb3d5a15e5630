use crate::records::error::RecordError;
use crate::views::error::ViewError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Records(#[from] RecordError),

    #[error(transparent)]
    Views(#[from] ViewError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] anyhow::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] anyhow::Error),
}
