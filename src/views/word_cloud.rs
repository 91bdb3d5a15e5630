//! Forecast phrase frequencies per region over the trailing week.
//!
//! `word_count` counts rows carrying the same whole forecast phrase; phrases are not
//! split into words. Client-side word clouds consume the table as is.

use crate::types::reading::{NormalizedReading, WeatherReading};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Written by the collector when the upstream forecast object was missing.
const EMPTY_OBJECT_MARKER: &str = "{}";

pub fn word_cloud_window() -> TimeDelta {
    TimeDelta::days(7)
}

fn is_usable(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed != EMPTY_OBJECT_MARKER
}

/// The short forecast if usable, otherwise the detailed forecast if usable.
pub fn display_text(reading: &WeatherReading) -> Option<&str> {
    reading
        .short_forecast
        .as_deref()
        .filter(|s| is_usable(s))
        .or_else(|| reading.detailed_forecast.as_deref().filter(|s| is_usable(s)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCloudEntry {
    pub forecast_text: String,
    pub region: String,
    pub word_count: u32,
}

/// Frequency of each (phrase, region) at or after `as_of - 7 days`.
///
/// Ordered by `word_count` descending, then region, then phrase.
pub fn forecast_word_cloud(
    view: &[NormalizedReading],
    as_of: NaiveDateTime,
) -> Vec<WordCloudEntry> {
    let since = as_of - word_cloud_window();

    let mut counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    for reading in view.iter().filter(|r| r.timestamp >= since) {
        if let Some(text) = display_text(reading) {
            *counts.entry((text, reading.region.as_str())).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<WordCloudEntry> = counts
        .into_iter()
        .map(|((text, region), word_count)| WordCloudEntry {
            forecast_text: text.to_string(),
            region: region.to_string(),
            word_count,
        })
        .collect();
    entries.sort_by(|a, b| {
        (Reverse(a.word_count), &a.region, &a.forecast_text).cmp(&(
            Reverse(b.word_count),
            &b.region,
            &b.forecast_text,
        ))
    });
    entries
}
