//! Where collector CSV objects are read from.

use std::fmt;
use std::path::PathBuf;

/// A location holding collector CSV objects.
///
/// The collector writes one object per day (`weather_data_YYYY-MM-DD.csv`) under a
/// fixed storage prefix. A [`RecordSource::Directory`] stands in for that prefix when
/// the objects are synced locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordSource {
    /// A single CSV file, optionally gzip compressed (`.csv.gz`).
    File(PathBuf),
    /// Every `*.csv` / `*.csv.gz` file directly inside the directory.
    Directory(PathBuf),
    /// An HTTP(S) object URL, e.g. a public or presigned object-storage URL.
    Url(String),
}

impl RecordSource {
    /// Interprets a CLI-style argument: `http://` / `https://` prefixes become
    /// [`RecordSource::Url`], existing directories become [`RecordSource::Directory`],
    /// anything else is treated as a file.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            return RecordSource::Url(value.to_string());
        }
        let path = PathBuf::from(value);
        if path.is_dir() {
            RecordSource::Directory(path)
        } else {
            RecordSource::File(path)
        }
    }

    pub(crate) fn is_gzip_name(name: &str) -> bool {
        name.ends_with(".gz")
    }

    pub(crate) fn is_csv_name(name: &str) -> bool {
        name.ends_with(".csv") || name.ends_with(".csv.gz")
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::File(path) => write!(f, "file {}", path.display()),
            RecordSource::Directory(path) => write!(f, "directory {}", path.display()),
            RecordSource::Url(url) => write!(f, "url {}", url),
        }
    }
}
