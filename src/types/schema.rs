//! Column names of the collector's CSV layout.
//!
//! The collector writes exactly these 23 columns, in this order, with a header line.

pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_REGION: &str = "region";
pub const COL_TEMP_C: &str = "temperature_celsius";
pub const COL_TEMP_F: &str = "temperature_fahrenheit";
pub const COL_HUMIDITY: &str = "humidity";
pub const COL_WIND_SPEED: &str = "wind_speed_ms";
pub const COL_WIND_DIR: &str = "wind_direction";
pub const COL_PRESSURE: &str = "barometric_pressure";
pub const COL_VISIBILITY: &str = "visibility";
pub const COL_DEW_POINT: &str = "dew_point";
pub const COL_HEAT_INDEX: &str = "heat_index";
pub const COL_WIND_CHILL: &str = "wind_chill";
pub const COL_PRESENT_WEATHER: &str = "present_weather";
pub const COL_FORECAST_TEMP: &str = "forecast_temp";
pub const COL_SHORT_FORECAST: &str = "short_forecast";
pub const COL_DETAILED_FORECAST: &str = "detailed_forecast";
pub const COL_SNOW: &str = "snow_level";
pub const COL_ICE: &str = "ice_accumulation";
pub const COL_PRECIP_PROB: &str = "precipitation_probability";
pub const COL_MAX_TEMP: &str = "max_temperature";
pub const COL_MIN_TEMP: &str = "min_temperature";
pub const COL_UV_INDEX: &str = "uv_index";
pub const COL_HAS_ALERTS: &str = "has_alerts";

/// All input columns in file order.
pub const READING_COLUMNS: [&str; 23] = [
    COL_TIMESTAMP,
    COL_REGION,
    COL_TEMP_C,
    COL_TEMP_F,
    COL_HUMIDITY,
    COL_WIND_SPEED,
    COL_WIND_DIR,
    COL_PRESSURE,
    COL_VISIBILITY,
    COL_DEW_POINT,
    COL_HEAT_INDEX,
    COL_WIND_CHILL,
    COL_PRESENT_WEATHER,
    COL_FORECAST_TEMP,
    COL_SHORT_FORECAST,
    COL_DETAILED_FORECAST,
    COL_SNOW,
    COL_ICE,
    COL_PRECIP_PROB,
    COL_MAX_TEMP,
    COL_MIN_TEMP,
    COL_UV_INDEX,
    COL_HAS_ALERTS,
];

/// Timestamp layout written by the collector.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Value of `has_alerts` that marks an upstream alert.
pub const ALERT_FLAG_YES: &str = "Yes";
