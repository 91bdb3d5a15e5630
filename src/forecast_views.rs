//! Entry point for loading collector output into a [`ReadingSnapshot`].

use crate::error::ForecastError;
use crate::records::loader::{RecordLoader, DEFAULT_CACHE_MAX_AGE};
use crate::snapshot::ReadingSnapshot;
use crate::types::record_source::RecordSource;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Loads weather readings and hands out snapshots the analytical views run on.
///
/// Downloaded objects are cached on disk under the cache folder and in memory, so
/// repeated snapshots of the same URL within the cache age skip the network.
///
/// # Examples
///
/// ```rust,no_run
/// # use forecast_views::{ForecastViews, ForecastError, RecordSource};
/// # async fn run() -> Result<(), ForecastError> {
/// let client = ForecastViews::new().await?;
/// let snapshot = client
///     .snapshot()
///     .source(RecordSource::parse("data/weather_data_2024-07-20.csv"))
///     .call()
///     .await?;
/// println!("{} regions", snapshot.current_weather().len());
/// # Ok(())
/// # }
/// ```
pub struct ForecastViews {
    loader: RecordLoader,
}

#[bon]
impl ForecastViews {
    /// Creates a client caching under `cache_folder`, which is created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::CacheDirCreation`] if the directory cannot be created.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, ForecastError> {
        Self::configured()
            .cache_folder(cache_folder)
            .call()
            .await
    }

    /// Creates a client caching in `$FORECAST_VIEWS_CACHE_DIR`, or else the platform
    /// cache directory (e.g. `~/.cache/forecast_views_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::CacheDirResolution`] if no cache directory is known for
    /// this platform, or [`ForecastError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, ForecastError> {
        Self::configured().call().await
    }

    /// Creates a client with explicit options.
    ///
    /// `cache_max_age` bounds how long a downloaded object is reused before it is
    /// fetched again; it defaults to one hour.
    #[builder]
    pub async fn configured(
        cache_folder: Option<PathBuf>,
        #[builder(default = DEFAULT_CACHE_MAX_AGE)] cache_max_age: Duration,
    ) -> Result<Self, ForecastError> {
        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(ForecastError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| ForecastError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            loader: RecordLoader::new(&cache_folder, cache_max_age),
        })
    }

    /// Loads every object behind `source` and builds a snapshot of it.
    ///
    /// Trailing-window views measure from `as_of`, which defaults to the current time.
    /// Rows that cannot be placed (no region, no usable timestamp) are dropped and
    /// counted in the snapshot's [`LoadReport`](crate::LoadReport).
    #[builder]
    pub async fn snapshot(
        &self,
        source: RecordSource,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<ReadingSnapshot, ForecastError> {
        let (readings, report) = self.loader.load(&source).await?;
        let as_of = as_of.unwrap_or_else(Utc::now);
        Ok(ReadingSnapshot::new(&readings, as_of, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::error::RecordError;
    use chrono::TimeZone;

    const CSV: &str = concat!(
        "timestamp,region,temperature_celsius,temperature_fahrenheit,humidity,wind_speed_ms,",
        "wind_direction,barometric_pressure,visibility,dew_point,heat_index,wind_chill,",
        "present_weather,forecast_temp,short_forecast,detailed_forecast,snow_level,",
        "ice_accumulation,precipitation_probability,max_temperature,min_temperature,uv_index,",
        "has_alerts\n",
        "2024-07-20 10:00:00,Boston_MA,25.0,77.0,60,3.1,180,101325,16000,15,,,{},78,Sunny,",
        "Sunny all day,,,10,,,,No\n",
        "2024-07-20 11:00:00,Boston_MA,,,61,3.4,190,101500,16000,15,,,{},79,Sunny,",
        "Sunny all day,,,10,,,,No\n",
        ",Boston_MA,26.0,78.8,61,3.4,190,101500,16000,15,,,{},79,Sunny,,,,10,,,,No\n",
    );

    #[tokio::test]
    async fn snapshot_from_local_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("weather_data_2024-07-20.csv");
        std::fs::write(&path, CSV)?;

        let client = ForecastViews::with_cache_folder(dir.path().join("cache")).await?;
        let as_of = Utc.with_ymd_and_hms(2024, 7, 20, 12, 0, 0).unwrap();
        let snapshot = client
            .snapshot()
            .source(RecordSource::parse(path.to_str().unwrap()))
            .as_of(as_of)
            .call()
            .await?;

        assert_eq!(snapshot.as_of(), as_of);
        assert_eq!(snapshot.report().rows_kept, 2);
        assert_eq!(snapshot.report().missing_timestamp, 1);
        assert_eq!(snapshot.forecast_view()[1].temperature_celsius, Some(25.0));

        let kpi = snapshot.barometric_pressure_kpi();
        assert_eq!(kpi.len(), 2);
        assert_eq!(kpi[0].current_pressure_inhg, 29.92);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_a_record_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let client = ForecastViews::configured()
            .cache_folder(dir.path().to_path_buf())
            .cache_max_age(Duration::from_secs(60))
            .call()
            .await?;

        let result = client
            .snapshot()
            .source(RecordSource::File(dir.path().join("absent.csv")))
            .call()
            .await;
        assert!(matches!(
            result,
            Err(ForecastError::Records(RecordError::FileRead(..)))
        ));
        Ok(())
    }
}
