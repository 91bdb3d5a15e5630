//! Writing view results to files for dashboards and downstream jobs.

use crate::types::schema::TIMESTAMP_FORMAT;
use crate::views::error::ViewError;
use crate::views::frame::ToDataFrame;
use log::info;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" => Ok(ExportFormat::Parquet),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown export format '{}', expected csv, parquet or json",
                other
            )),
        }
    }
}

/// Writes `rows` to `<dir>/<name>.<ext>` and returns the written path.
///
/// CSV and Parquet go through the rows' DataFrame; JSON is an array of row objects.
pub fn export_rows<T>(
    rows: &[T],
    name: &'static str,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ViewError>
where
    T: Serialize,
    [T]: ToDataFrame,
{
    std::fs::create_dir_all(dir).map_err(|e| ViewError::ExportDirCreation(dir.to_path_buf(), e))?;
    let path = dir.join(format!("{}.{}", name, format.extension()));
    let file = File::create(&path).map_err(|e| ViewError::ExportIo(path.clone(), e))?;

    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(BufWriter::new(file), rows)
                .map_err(|e| ViewError::ExportJson(path.clone(), e))?;
        }
        ExportFormat::Csv => {
            let mut df = rows
                .to_dataframe()
                .map_err(|e| ViewError::Frame { view: name, source: e })?;
            CsvWriter::new(BufWriter::new(file))
                .include_header(true)
                .with_datetime_format(Some(TIMESTAMP_FORMAT.to_string()))
                .finish(&mut df)
                .map_err(|e| ViewError::ExportPolars(path.clone(), e))?;
        }
        ExportFormat::Parquet => {
            let mut df = rows
                .to_dataframe()
                .map_err(|e| ViewError::Frame { view: name, source: e })?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| ViewError::ExportPolars(path.clone(), e))?;
        }
    }

    info!("Exported {} rows of {} to {}", rows.len(), name, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::word_cloud::WordCloudEntry;

    fn entries() -> Vec<WordCloudEntry> {
        vec![
            WordCloudEntry {
                forecast_text: "Partly Sunny".into(),
                region: "Denver_CO".into(),
                word_count: 4,
            },
            WordCloudEntry {
                forecast_text: "Snow Showers".into(),
                region: "Salt_Lake_City_UT".into(),
                word_count: 2,
            },
        ]
    }

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("parquet".parse::<ExportFormat>(), Ok(ExportFormat::Parquet));
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn csv_export_has_header_and_rows() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = export_rows(&entries(), "forecast_word_cloud", ExportFormat::Csv, dir.path())?;

        assert_eq!(path, dir.path().join("forecast_word_cloud.csv"));
        let text = std::fs::read_to_string(&path)?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("forecast_text,region,word_count"));
        assert_eq!(lines.next(), Some("Partly Sunny,Denver_CO,4"));
        Ok(())
    }

    #[test]
    fn json_export_is_an_array_of_rows() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = export_rows(&entries(), "forecast_word_cloud", ExportFormat::Json, dir.path())?;

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(value[1]["region"], "Salt_Lake_City_UT");
        assert_eq!(value[1]["word_count"], 2);
        Ok(())
    }

    #[test]
    fn parquet_export_reads_back() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = export_rows(
            &entries(),
            "forecast_word_cloud",
            ExportFormat::Parquet,
            dir.path(),
        )?;

        let df = LazyFrame::scan_parquet(&path, Default::default())?.collect()?;
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("word_count")?.u32()?.get(0), Some(4));
        Ok(())
    }
}
