//! Hourly barometric pressure trend over the trailing day.

use crate::types::alert_labels::PressureStatus;
use crate::types::reading::{timestamp_format, NormalizedReading};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pascals (as reported by the station observation) to inches of mercury.
pub const PA_TO_INHG: f64 = 0.0002953;
/// Standard sea-level pressure.
pub const TARGET_PRESSURE_INHG: f64 = 29.92;
pub const HIGH_PRESSURE_INHG: f64 = 30.2;
pub const LOW_PRESSURE_INHG: f64 = 29.8;

pub fn kpi_window() -> TimeDelta {
    TimeDelta::hours(24)
}

/// Rounds half away from zero to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn pressure_status(mean_inhg: f64) -> PressureStatus {
    if mean_inhg >= HIGH_PRESSURE_INHG {
        PressureStatus::High
    } else if mean_inhg <= LOW_PRESSURE_INHG {
        PressureStatus::Low
    } else {
        PressureStatus::Normal
    }
}

/// Start of the hour containing `ts`.
pub fn hour_bucket(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(ts.hour()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureKpi {
    #[serde(with = "timestamp_format")]
    pub hour_bucket: NaiveDateTime,
    pub current_pressure_inhg: f64,
    pub target_pressure_inhg: f64,
    pub reading_count: u32,
    pub pressure_status: PressureStatus,
    pub deviation_percent: f64,
}

/// Hourly mean pressure for readings at or after `as_of - 24h`, oldest bucket first.
///
/// Readings without a pressure value do not count toward a bucket; hours with no
/// qualifying reading produce no row.
pub fn barometric_pressure_kpi(
    view: &[NormalizedReading],
    as_of: NaiveDateTime,
) -> Vec<PressureKpi> {
    let since = as_of - kpi_window();

    // bucket -> (sum of inHg, count)
    let mut buckets: BTreeMap<NaiveDateTime, (f64, u32)> = BTreeMap::new();
    for reading in view.iter().filter(|r| r.timestamp >= since) {
        let Some(pressure) = reading.barometric_pressure else {
            continue;
        };
        let entry = buckets.entry(hour_bucket(reading.timestamp)).or_insert((0.0, 0));
        entry.0 += pressure * PA_TO_INHG;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(hour_bucket, (sum, count))| {
            let mean = sum / f64::from(count);
            PressureKpi {
                hour_bucket,
                current_pressure_inhg: round2(mean),
                target_pressure_inhg: TARGET_PRESSURE_INHG,
                reading_count: count,
                pressure_status: pressure_status(mean),
                deviation_percent: round2(
                    (mean - TARGET_PRESSURE_INHG) / TARGET_PRESSURE_INHG * 100.0,
                ),
            }
        })
        .collect()
}
