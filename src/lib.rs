mod error;
mod export;
mod forecast_views;
mod records;
mod snapshot;
mod types;
mod utils;
mod views;

pub use error::ForecastError;
pub use export::{export_rows, ExportFormat};
pub use forecast_views::*;
pub use snapshot::{ReadingSnapshot, ViewSet};

pub use records::error::RecordError;
pub use records::extractor::parse_timestamp;
pub use records::loader::{RecordLoader, DEFAULT_CACHE_MAX_AGE};
pub use records::report::{DropReason, LoadReport};

pub use types::alert_labels::*;
pub use types::reading::{NormalizedReading, WeatherReading};
pub use types::record_source::RecordSource;
pub use types::schema::*;

pub use views::active_alerts::{active_alert_type, current_active_alerts, ActiveAlert};
pub use views::base::{current_weather, forecast_view};
pub use views::error::ViewError;
pub use views::extreme::{extreme_weather_alerts, ExtremeWeatherAlert};
pub use views::frame::ToDataFrame;
pub use views::pressure_kpi::{barometric_pressure_kpi, PressureKpi};
pub use views::severity::{alert_severity_levels, severity_level, SeverityRow};
pub use views::word_cloud::{forecast_word_cloud, WordCloudEntry};
pub use views::View;
