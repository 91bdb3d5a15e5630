use crate::records::error::RecordError;
use crate::records::report::{DropReason, LoadReport};
use crate::types::reading::WeatherReading;
use crate::types::schema::*;
use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};
use polars::prelude::*;

/// Placeholder the collector writes when an upstream object was missing entirely.
const EMPTY_OBJECT_MARKER: &str = "{}";

/// Fallback layouts accepted after [`TIMESTAMP_FORMAT`].
const ALT_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Renames or selects columns so that `df` holds exactly the 23 reading columns.
///
/// Files with a proper header are matched by name and extra columns are ignored.
/// A file with exactly 23 columns under other names is mapped positionally.
pub(crate) fn conform_columns(df: DataFrame, object: &str) -> Result<DataFrame, RecordError> {
    let has_all_named = READING_COLUMNS
        .iter()
        .all(|name| df.column(name).is_ok());

    if has_all_named {
        return df
            .select(READING_COLUMNS)
            .map_err(|e| RecordError::CsvReadPolars {
                object: object.to_string(),
                source: e,
            });
    }

    if df.width() != READING_COLUMNS.len() {
        warn!(
            "CSV column count ({}) does not match schema length ({}) for {}",
            df.width(),
            READING_COLUMNS.len(),
            object
        );
        return Err(RecordError::SchemaMismatch {
            object: object.to_string(),
            expected: READING_COLUMNS.len(),
            found: df.width(),
        });
    }

    debug!("Header of {} not recognized, mapping columns by position", object);
    let mut df = df;
    df.set_column_names(READING_COLUMNS.iter().copied())
        .map_err(|e| RecordError::CsvReadPolars {
            object: object.to_string(),
            source: e,
        })?;
    Ok(df)
}

/// Borrowed string view of one input column.
fn str_column<'a>(
    df: &'a DataFrame,
    column: &str,
    object: &str,
) -> Result<&'a StringChunked, RecordError> {
    df.column(column)
        .and_then(|c| c.str())
        .map_err(|e| RecordError::ColumnNotFound {
            object: object.to_string(),
            column: column.to_string(),
            source: e,
        })
}

/// Trims a raw cell and maps empty cells to `None`.
fn cell(ca: &StringChunked, idx: usize) -> Option<&str> {
    ca.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn opt_string(ca: &StringChunked, idx: usize) -> Option<String> {
    cell(ca, idx).map(str::to_string)
}

/// Parses a numeric cell. Placeholders and garbage become `None`, never an error.
fn opt_float(ca: &StringChunked, idx: usize) -> Option<f64> {
    cell(ca, idx)
        .filter(|s| *s != EMPTY_OBJECT_MARKER)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// The collector writes whole numbers without a fraction, but tolerate `230.0`.
fn opt_int(ca: &StringChunked, idx: usize) -> Option<i64> {
    let raw = cell(ca, idx)?;
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

/// Parses a collector timestamp as naive UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            ALT_TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Converts a conformed all-string DataFrame into readings.
///
/// Rows missing either grouping key, or with a timestamp that does not parse, are
/// dropped, logged and counted in `report`. Nothing else can make a row fail.
pub(crate) fn extract_readings(
    df: &DataFrame,
    object: &str,
    report: &mut LoadReport,
) -> Result<Vec<WeatherReading>, RecordError> {
    let timestamp = str_column(df, COL_TIMESTAMP, object)?;
    let region = str_column(df, COL_REGION, object)?;
    let temp_c = str_column(df, COL_TEMP_C, object)?;
    let temp_f = str_column(df, COL_TEMP_F, object)?;
    let humidity = str_column(df, COL_HUMIDITY, object)?;
    let wind_speed = str_column(df, COL_WIND_SPEED, object)?;
    let wind_dir = str_column(df, COL_WIND_DIR, object)?;
    let pressure = str_column(df, COL_PRESSURE, object)?;
    let visibility = str_column(df, COL_VISIBILITY, object)?;
    let dew_point = str_column(df, COL_DEW_POINT, object)?;
    let heat_index = str_column(df, COL_HEAT_INDEX, object)?;
    let wind_chill = str_column(df, COL_WIND_CHILL, object)?;
    let present_weather = str_column(df, COL_PRESENT_WEATHER, object)?;
    let forecast_temp = str_column(df, COL_FORECAST_TEMP, object)?;
    let short_forecast = str_column(df, COL_SHORT_FORECAST, object)?;
    let detailed_forecast = str_column(df, COL_DETAILED_FORECAST, object)?;
    let snow = str_column(df, COL_SNOW, object)?;
    let ice = str_column(df, COL_ICE, object)?;
    let precip = str_column(df, COL_PRECIP_PROB, object)?;
    let max_temp = str_column(df, COL_MAX_TEMP, object)?;
    let min_temp = str_column(df, COL_MIN_TEMP, object)?;
    let uv_index = str_column(df, COL_UV_INDEX, object)?;
    let has_alerts = str_column(df, COL_HAS_ALERTS, object)?;

    report.objects_read += 1;
    report.rows_read += df.height();

    let mut readings = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        // +2: one for the header line, one for 1-based line numbers
        let line = idx + 2;

        let Some(region_value) = cell(region, idx) else {
            warn!("Dropping {} line {}: {}", object, line, DropReason::MissingRegion);
            report.record_drop(DropReason::MissingRegion);
            continue;
        };
        let Some(raw_ts) = cell(timestamp, idx) else {
            warn!("Dropping {} line {}: {}", object, line, DropReason::MissingTimestamp);
            report.record_drop(DropReason::MissingTimestamp);
            continue;
        };
        let Some(ts) = parse_timestamp(raw_ts) else {
            warn!(
                "Dropping {} line {}: {} '{}'",
                object,
                line,
                DropReason::UnparseableTimestamp,
                raw_ts
            );
            report.record_drop(DropReason::UnparseableTimestamp);
            continue;
        };

        readings.push(WeatherReading {
            region: region_value.to_string(),
            timestamp: ts,
            temperature_celsius: opt_float(temp_c, idx),
            temperature_fahrenheit: opt_float(temp_f, idx),
            humidity: opt_float(humidity, idx),
            wind_speed_ms: opt_float(wind_speed, idx),
            wind_direction: opt_int(wind_dir, idx),
            barometric_pressure: opt_float(pressure, idx),
            visibility: opt_float(visibility, idx),
            dew_point: opt_float(dew_point, idx),
            heat_index: opt_float(heat_index, idx),
            wind_chill: opt_float(wind_chill, idx),
            present_weather: opt_string(present_weather, idx),
            forecast_temp: opt_int(forecast_temp, idx),
            short_forecast: opt_string(short_forecast, idx),
            detailed_forecast: opt_string(detailed_forecast, idx),
            snow_level: opt_float(snow, idx),
            ice_accumulation: opt_float(ice, idx),
            precipitation_probability: opt_float(precip, idx),
            max_temperature: opt_float(max_temp, idx),
            min_temperature: opt_float(min_temp, idx),
            uv_index: opt_float(uv_index, idx),
            has_alerts: opt_string(has_alerts, idx),
        });
    }
    report.rows_kept += readings.len();

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Builds an all-string frame in collector layout from
    /// (timestamp, region, temp_c, pressure, short_forecast) rows.
    fn frame(rows: &[(&str, &str, &str, &str, &str)]) -> DataFrame {
        let n = rows.len();
        let blank = vec![""; n];
        let mut columns: Vec<Column> = Vec::with_capacity(READING_COLUMNS.len());
        for name in READING_COLUMNS {
            let values: Vec<&str> = match name {
                COL_TIMESTAMP => rows.iter().map(|r| r.0).collect(),
                COL_REGION => rows.iter().map(|r| r.1).collect(),
                COL_TEMP_C => rows.iter().map(|r| r.2).collect(),
                COL_PRESSURE => rows.iter().map(|r| r.3).collect(),
                COL_SHORT_FORECAST => rows.iter().map(|r| r.4).collect(),
                COL_WIND_DIR => vec!["230"; n],
                COL_HAS_ALERTS => vec!["No"; n],
                _ => blank.clone(),
            };
            columns.push(Column::new(name.into(), values));
        }
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn parses_collector_and_fallback_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 11, 5)
            .unwrap()
            .and_hms_opt(14, 0, 3)
            .unwrap();
        assert_eq!(parse_timestamp("2024-11-05 14:00:03"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-11-05T14:00:03 "), Some(expected));
        assert_eq!(parse_timestamp("2024-11-05T16:00:03+02:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn numeric_placeholders_become_null() {
        let df = frame(&[
            ("2024-11-05 14:00:03", "R1", "{}", "101325", "Sunny"),
            ("2024-11-05 15:00:03", "R1", "nan", "abc", "{}"),
            ("2024-11-05 16:00:03", "R1", "-3.5", "", ""),
        ]);
        let mut report = LoadReport::default();
        let readings = extract_readings(&df, "test.csv", &mut report).unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].temperature_celsius, None);
        assert_eq!(readings[0].barometric_pressure, Some(101325.0));
        assert_eq!(readings[0].wind_direction, Some(230));
        assert_eq!(readings[1].temperature_celsius, None);
        assert_eq!(readings[1].barometric_pressure, None);
        // String fields keep the placeholder, the word cloud decides what it means
        assert_eq!(readings[1].short_forecast.as_deref(), Some("{}"));
        assert_eq!(readings[2].temperature_celsius, Some(-3.5));
        assert_eq!(readings[2].short_forecast, None);
        assert_eq!(readings[2].has_alerts.as_deref(), Some("No"));
    }

    #[test]
    fn rows_without_keys_are_dropped_and_counted() {
        let df = frame(&[
            ("2024-11-05 14:00:03", "R1", "1", "", ""),
            ("2024-11-05 14:00:03", "  ", "1", "", ""),
            ("", "R2", "1", "", ""),
            ("05/11/2024 2pm", "R2", "1", "", ""),
            ("2024-11-05 15:00:03", "R2", "1", "", ""),
        ]);
        let mut report = LoadReport::default();
        let readings = extract_readings(&df, "test.csv", &mut report).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(report.objects_read, 1);
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.rows_kept, 2);
        assert_eq!(report.missing_region, 1);
        assert_eq!(report.missing_timestamp, 1);
        assert_eq!(report.unparseable_timestamp, 1);
    }

    #[test]
    fn conform_selects_named_columns_and_ignores_extras() {
        let df = frame(&[("2024-11-05 14:00:03", "R1", "1", "", "")]);
        let extra = Column::new("execution_timestamp".into(), vec!["2024-11-05 14:00:00"]);
        let mut with_extra = df.clone();
        with_extra.with_column(extra).unwrap();

        let conformed = conform_columns(with_extra, "x.csv").unwrap();
        assert_eq!(conformed.width(), READING_COLUMNS.len());
        assert!(conformed.column("execution_timestamp").is_err());
    }

    #[test]
    fn conform_maps_unnamed_columns_by_position() {
        let names: Vec<String> = (0..READING_COLUMNS.len())
            .map(|i| format!("column_{}", i + 1))
            .collect();
        let mut df = frame(&[("2024-11-05 14:00:03", "R1", "1", "", "")]);
        df.set_column_names(names.iter().map(String::as_str)).unwrap();

        let conformed = conform_columns(df, "x.csv").unwrap();
        assert_eq!(
            conformed.column(COL_REGION).unwrap().str().unwrap().get(0),
            Some("R1")
        );
    }

    #[test]
    fn conform_rejects_wrong_width() {
        let df = DataFrame::new(vec![Column::new("a".into(), vec!["1"])]).unwrap();
        let err = conform_columns(df, "x.csv").unwrap_err();
        assert!(matches!(
            err,
            RecordError::SchemaMismatch {
                expected: 23,
                found: 1,
                ..
            }
        ));
    }
}
