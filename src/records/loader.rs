use crate::records::error::RecordError;
use crate::records::extractor::{conform_columns, extract_readings};
use crate::records::report::LoadReport;
use crate::types::reading::WeatherReading;
use crate::types::record_source::RecordSource;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Default freshness window for remote objects. The collector appends once an hour.
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Loads collector CSV objects into [`WeatherReading`]s.
///
/// Remote objects are cached twice: as Parquet files in `cache_dir` (surviving restarts)
/// and as in-memory frames. Both expire after `cache_max_age`. Local files are always
/// read fresh.
pub struct RecordLoader {
    cache_dir: PathBuf,
    cache_max_age: Duration,
    download_client: Client,
    frame_cache: Mutex<HashMap<String, (Instant, DataFrame)>>,
}

impl RecordLoader {
    pub fn new(cache_dir: &Path, cache_max_age: Duration) -> RecordLoader {
        RecordLoader {
            cache_dir: cache_dir.to_path_buf(),
            cache_max_age,
            download_client: Client::new(),
            frame_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Reads every object behind `source` and extracts readings, concatenated in
    /// object order. Per-row problems are counted in the returned [`LoadReport`].
    pub async fn load(
        &self,
        source: &RecordSource,
    ) -> Result<(Vec<WeatherReading>, LoadReport), RecordError> {
        let mut report = LoadReport::default();
        let mut readings = Vec::new();

        match source {
            RecordSource::File(path) => {
                let df = self.read_local(path).await?;
                readings = extract_readings(&df, &path.display().to_string(), &mut report)?;
            }
            RecordSource::Directory(dir) => {
                let mut last_error = None;
                for path in Self::list_objects(dir).await? {
                    let mut object_report = LoadReport::default();
                    match self.load_local_object(&path, &mut object_report).await {
                        Ok(mut object_readings) => {
                            debug!("{}: {}", path.display(), object_report);
                            report.merge(&object_report);
                            readings.append(&mut object_readings);
                        }
                        Err(e) => {
                            warn!("Skipping {}: {}", path.display(), e);
                            report.objects_failed += 1;
                            last_error = Some(e);
                        }
                    }
                }
                if report.objects_read == 0 {
                    if let Some(e) = last_error {
                        return Err(e);
                    }
                }
            }
            RecordSource::Url(url) => {
                let df = self.get_remote_frame(url).await?;
                readings = extract_readings(&df, url, &mut report)?;
            }
        }

        info!("Loaded {}: {}", source, report);
        Ok((readings, report))
    }

    /// Reads one local object and extracts its readings into `report`.
    async fn load_local_object(
        &self,
        path: &Path,
        report: &mut LoadReport,
    ) -> Result<Vec<WeatherReading>, RecordError> {
        let df = self.read_local(path).await?;
        extract_readings(&df, &path.display().to_string(), report)
    }

    /// Lists CSV objects directly inside `dir`, sorted by file name so that the
    /// collector's dated objects are read oldest first.
    async fn list_objects(dir: &Path) -> Result<Vec<PathBuf>, RecordError> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| RecordError::DirectoryRead(dir.to_path_buf(), e))?;
        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RecordError::DirectoryRead(dir.to_path_buf(), e))?
        {
            let path = entry.path();
            let is_csv = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(RecordSource::is_csv_name);
            if is_csv && path.is_file() {
                objects.push(path);
            }
        }
        if objects.is_empty() {
            return Err(RecordError::NoObjects(dir.to_path_buf()));
        }
        objects.sort();
        Ok(objects)
    }

    async fn read_local(&self, path: &Path) -> Result<DataFrame, RecordError> {
        let object = path.display().to_string();
        let file = fs::File::open(path)
            .await
            .map_err(|e| RecordError::FileRead(path.to_path_buf(), e))?;

        let mut bytes = Vec::new();
        let is_gzip = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(RecordSource::is_gzip_name);
        if is_gzip {
            let mut decoder = GzipDecoder::new(BufReader::new(file));
            decoder
                .read_to_end(&mut bytes)
                .await
                .map_err(|e| RecordError::DownloadIo {
                    object: object.clone(),
                    source: e,
                })?;
        } else {
            let mut file = file;
            file.read_to_end(&mut bytes)
                .await
                .map_err(|e| RecordError::FileRead(path.to_path_buf(), e))?;
        }

        Self::csv_to_dataframe(bytes, &object).await
    }

    /// Returns the frame for a remote object, from memory, from the Parquet cache,
    /// or by downloading it, in that order.
    ///
    /// Memory entries carry the instant the object was downloaded, not the instant
    /// they entered memory, so the two caches share one `cache_max_age`.
    async fn get_remote_frame(&self, url: &str) -> Result<DataFrame, RecordError> {
        let key = Self::object_path(url);
        {
            let cache = self.frame_cache.lock().await;
            if let Some((fetched_at, df)) = cache.get(key) {
                if fetched_at.elapsed() < self.cache_max_age {
                    debug!("In-memory cache hit for {}", key);
                    return Ok(df.clone());
                }
            }
        }

        let (fetched_at, df) = self.load_remote_frame(url).await?;

        let mut cache = self.frame_cache.lock().await;
        match cache.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                // another load finished first; keep the more recent download
                if entry.get().0 < fetched_at {
                    entry.insert((fetched_at, df.clone()));
                    Ok(df)
                } else {
                    Ok(entry.get().1.clone())
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((fetched_at, df.clone()));
                Ok(df)
            }
        }
    }

    /// Loads a remote object from the Parquet cache if it is younger than
    /// `cache_max_age`, otherwise downloads and re-caches it. Also returns when the
    /// object was downloaded.
    async fn load_remote_frame(&self, url: &str) -> Result<(Instant, DataFrame), RecordError> {
        let parquet_path = self.cache_dir.join(Self::cache_file_name(url));

        if let Some(age) = Self::cached_age(&parquet_path).await? {
            if age < self.cache_max_age {
                info!("Cache hit for {} at {:?} (age {:?})", url, parquet_path, age);
                let fetched_at = Instant::now().checked_sub(age).unwrap_or_else(Instant::now);
                return Ok((fetched_at, Self::read_cached(parquet_path).await?));
            }
            debug!("Cached {:?} is {:?} old, refreshing", parquet_path, age);
        }

        warn!("Cache miss for {}. Downloading and processing.", url);
        let raw_bytes = self.download(url).await?;
        let fetched_at = Instant::now();
        let df = Self::csv_to_dataframe(raw_bytes, url).await?;

        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| RecordError::CacheDirCreation(self.cache_dir.clone(), e))?;
        Self::cache_dataframe(df.clone(), &parquet_path).await?;
        info!("Cached {} to {:?}", url, parquet_path);

        Ok((fetched_at, df))
    }

    /// Filesystem-safe cache name for a URL's object path. Query strings and
    /// fragments do not take part, so re-signed URLs of one object share a file.
    fn cache_file_name(url: &str) -> String {
        let object = Self::object_path(url);
        let mut hasher = DefaultHasher::new();
        object.hash(&mut hasher);
        let stem: String = object
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .take(64)
            .collect();
        format!("{}-{:016x}.parquet", stem, hasher.finish())
    }

    /// URL without query string or fragment, e.g. for presigned object URLs.
    fn object_path(url: &str) -> &str {
        url.split(['?', '#']).next().unwrap_or(url)
    }

    /// Age of a cached Parquet file, or `None` if there is none.
    async fn cached_age(path: &Path) -> Result<Option<Duration>, RecordError> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RecordError::CacheMetadataRead(path.to_path_buf(), e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| RecordError::CacheMetadataRead(path.to_path_buf(), e))?;
        let age = SystemTime::now()
            .duration_since(modified)
            .map_err(|e| RecordError::SystemTimeCalculation(path.to_path_buf(), e))?;
        Ok(Some(age))
    }

    /// Downloads a remote object, decompressing it when the object name ends in `.gz`.
    async fn download(&self, url: &str) -> Result<Vec<u8>, RecordError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| RecordError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    RecordError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    RecordError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let stream_reader = StreamReader::new(stream);
        let mut bytes = Vec::new();
        let read = if RecordSource::is_gzip_name(Self::object_path(url)) {
            GzipDecoder::new(stream_reader).read_to_end(&mut bytes).await
        } else {
            let mut reader = stream_reader;
            reader.read_to_end(&mut bytes).await
        };
        read.map_err(|e| RecordError::DownloadIo {
            object: url.to_string(),
            source: e,
        })?;

        info!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }

    /// Parses raw CSV bytes (with header) into an all-string DataFrame in the
    /// collector's column layout, using a blocking task.
    async fn csv_to_dataframe(bytes: Vec<u8>, object: &str) -> Result<DataFrame, RecordError> {
        let object_owned = object.to_string();

        task::spawn_blocking(move || {
            let io_err = |e| RecordError::CsvReadIo {
                object: object_owned.clone(),
                source: e,
            };
            let mut temp_file = NamedTempFile::new().map_err(io_err)?;
            temp_file.write_all(&bytes).map_err(io_err)?;
            temp_file.flush().map_err(io_err)?;

            // Reading every column as a string keeps one bad cell from failing the file;
            // typed parsing happens per row in the extractor.
            let df = CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(0))
                .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(|e| RecordError::CsvReadPolars {
                    object: object_owned.clone(),
                    source: e,
                })?
                .finish()
                .map_err(|e| RecordError::CsvReadPolars {
                    object: object_owned.clone(),
                    source: e,
                })?;

            conform_columns(df, &object_owned)
        })
        .await?
    }

    async fn read_cached(path: PathBuf) -> Result<DataFrame, RecordError> {
        task::spawn_blocking(move || {
            LazyFrame::scan_parquet(&path, Default::default())
                .and_then(|lf| lf.collect())
                .map_err(|e| RecordError::ParquetRead(path.clone(), e))
        })
        .await?
    }

    /// Writes a DataFrame to a Parquet file using spawn_blocking.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), RecordError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| RecordError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| RecordError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), RecordError>(())
        })
        .await??;
        Ok(())
    }
}
